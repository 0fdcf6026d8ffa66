//! Selector model
//!
//! Four levels, each owning the one below: a `SelectorList` is the CSS comma,
//! a `Complex` is a combinator-linked chain of compounds, a `Compound` is a
//! simple-selector conjunction and a `SimpleSelector` is a single atom.
//!
//! Equality comes in two modes. `PartialEq` on `Compound` (and everything
//! containing one) is order-independent, treating the compound as a set of
//! simples; that is what the extend engine compares with. The total order
//! given by `Ord` compares textual form and yields the order-dependent mode
//! used for sorting and cache keys (`a.cmp(b) == Equal`).

use crate::arena::StatementId;
use crate::position::SourceSpan;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// Specificity weights
pub const SPECIFICITY_UNIVERSAL: u64 = 0;
pub const SPECIFICITY_TYPE: u64 = 1;
pub const SPECIFICITY_CLASS: u64 = 1_000;
pub const SPECIFICITY_ATTR: u64 = 1_000;
pub const SPECIFICITY_PSEUDO: u64 = 1_000;
pub const SPECIFICITY_ID: u64 = 1_000_000;

/// Provenance of a compound: the rendered form of every complex selector
/// that extended into it. Used to detect extension cycles and to trim
/// redundant alternatives.
pub type SourcesSet = BTreeSet<String>;

/// Pseudo-classes that keep the CSS1/2 single-colon notation but denote
/// pseudo-elements.
fn is_pseudo_class_element(name: &str) -> bool {
    matches!(name, ":before" | ":after" | ":first-line" | ":first-letter")
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleKind {
    /// The parent reference `&`
    Parent,
    /// `%name`, extend-only
    Placeholder(String),
    /// Element name or `*`
    Type(String),
    /// `.class` or `#id`, sigil included
    Qualifier(String),
    /// `[name matcher value]`
    Attribute {
        name: String,
        matcher: String,
        value: Option<String>,
    },
    /// `:name` or `::name`, optionally with an argument
    Pseudo { name: String, arg: Option<String> },
    /// Pseudo taking a selector list argument, e.g. `:not(...)`
    Wrapped { name: String, inner: SelectorList },
}

/// One simple selector, optionally namespace-qualified. `ns` of `Some("")`
/// is the empty namespace (`|name`), `Some("*")` the universal one.
#[derive(Debug, Clone)]
pub struct SimpleSelector {
    pub span: SourceSpan,
    pub ns: Option<String>,
    pub kind: SimpleKind,
}

impl SimpleSelector {
    pub fn new(span: SourceSpan, kind: SimpleKind) -> Self {
        Self {
            span,
            ns: None,
            kind,
        }
    }

    pub fn parent(span: SourceSpan) -> Self {
        Self::new(span, SimpleKind::Parent)
    }

    pub fn placeholder(span: SourceSpan, name: &str) -> Self {
        Self::new(span, SimpleKind::Placeholder(format!("%{}", name)))
    }

    /// Type selector; a `ns|name` form is split at the pipe.
    pub fn type_selector(span: SourceSpan, name: &str) -> Self {
        let (ns, name) = split_ns(name);
        Self {
            span,
            ns,
            kind: SimpleKind::Type(name),
        }
    }

    pub fn universal(span: SourceSpan) -> Self {
        Self::new(span, SimpleKind::Type("*".to_string()))
    }

    pub fn class(span: SourceSpan, name: &str) -> Self {
        Self::new(span, SimpleKind::Qualifier(format!(".{}", name)))
    }

    pub fn id(span: SourceSpan, name: &str) -> Self {
        Self::new(span, SimpleKind::Qualifier(format!("#{}", name)))
    }

    pub fn pseudo(span: SourceSpan, name: &str) -> Self {
        Self::new(
            span,
            SimpleKind::Pseudo {
                name: name.to_string(),
                arg: None,
            },
        )
    }

    pub fn attribute(span: SourceSpan, name: &str, matcher: &str, value: Option<&str>) -> Self {
        Self::new(
            span,
            SimpleKind::Attribute {
                name: name.to_string(),
                matcher: matcher.to_string(),
                value: value.map(|v| v.to_string()),
            },
        )
    }

    pub fn wrapped(span: SourceSpan, name: &str, inner: SelectorList) -> Self {
        Self::new(
            span,
            SimpleKind::Wrapped {
                name: name.to_string(),
                inner,
            },
        )
    }

    /// Textual name without the namespace prefix.
    pub fn name(&self) -> &str {
        match &self.kind {
            SimpleKind::Parent => "&",
            SimpleKind::Placeholder(n)
            | SimpleKind::Type(n)
            | SimpleKind::Qualifier(n) => n,
            SimpleKind::Attribute { name, .. } => name,
            SimpleKind::Pseudo { name, .. } => name,
            SimpleKind::Wrapped { name, .. } => name,
        }
    }

    pub fn has_ns(&self) -> bool {
        self.ns.is_some()
    }

    pub fn is_universal_ns(&self) -> bool {
        self.ns.as_deref() == Some("*")
    }

    pub fn has_universal_ns(&self) -> bool {
        !self.has_ns() || self.is_universal_ns()
    }

    pub fn is_empty_ns(&self) -> bool {
        !self.has_ns() || self.ns.as_deref() == Some("")
    }

    pub fn has_empty_ns(&self) -> bool {
        self.ns.as_deref() == Some("")
    }

    pub fn has_qualified_ns(&self) -> bool {
        matches!(self.ns.as_deref(), Some(ns) if !ns.is_empty() && ns != "*")
    }

    pub fn is_universal(&self) -> bool {
        matches!(&self.kind, SimpleKind::Type(n) if n == "*")
    }

    pub fn is_parent_ref(&self) -> bool {
        matches!(self.kind, SimpleKind::Parent)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, SimpleKind::Placeholder(_))
    }

    /// A pseudo-class is a single colon followed by a name, except for the
    /// CSS1/2 compatibility pseudo-elements.
    pub fn is_pseudo_class(&self) -> bool {
        match &self.kind {
            SimpleKind::Pseudo { name, .. } => {
                name.starts_with(':')
                    && !name.starts_with("::")
                    && !is_pseudo_class_element(name)
            }
            _ => false,
        }
    }

    /// A pseudo-element uses the two-colon notation, or one of the
    /// single-colon names grandfathered in from CSS levels 1 and 2.
    pub fn is_pseudo_element(&self) -> bool {
        match &self.kind {
            SimpleKind::Pseudo { name, .. } => {
                name.starts_with("::") || is_pseudo_class_element(name)
            }
            _ => false,
        }
    }

    pub fn specificity(&self) -> u64 {
        match &self.kind {
            SimpleKind::Parent => 0,
            SimpleKind::Placeholder(_) => SPECIFICITY_CLASS,
            SimpleKind::Type(name) => {
                if name == "*" {
                    SPECIFICITY_UNIVERSAL
                } else {
                    SPECIFICITY_TYPE
                }
            }
            SimpleKind::Qualifier(name) => {
                if name.starts_with('#') {
                    SPECIFICITY_ID
                } else if name.starts_with('.') {
                    SPECIFICITY_CLASS
                } else {
                    SPECIFICITY_TYPE
                }
            }
            SimpleKind::Attribute { .. } => SPECIFICITY_ATTR,
            SimpleKind::Pseudo { .. } => {
                if self.is_pseudo_element() {
                    SPECIFICITY_TYPE
                } else {
                    SPECIFICITY_PSEUDO
                }
            }
            SimpleKind::Wrapped { inner, .. } => inner.specificity(),
        }
    }
}

impl PartialEq for SimpleSelector {
    fn eq(&self, other: &Self) -> bool {
        self.ns == other.ns && self.kind == other.kind
    }
}

impl Eq for SimpleSelector {}

impl Hash for SimpleSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ns.hash(state);
        self.to_string().hash(state);
    }
}

impl PartialOrd for SimpleSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimpleSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.ns {
            write!(f, "{}|", ns)?;
        }
        match &self.kind {
            SimpleKind::Parent => write!(f, "&"),
            SimpleKind::Placeholder(n)
            | SimpleKind::Type(n)
            | SimpleKind::Qualifier(n) => write!(f, "{}", n),
            SimpleKind::Attribute {
                name,
                matcher,
                value,
            } => match value {
                Some(v) => write!(f, "[{}{}{}]", name, matcher, v),
                None => write!(f, "[{}]", name),
            },
            SimpleKind::Pseudo { name, arg } => match arg {
                Some(a) => write!(f, "{}({})", name, a),
                None => write!(f, "{}", name),
            },
            SimpleKind::Wrapped { name, inner } => write!(f, "{}({})", name, inner),
        }
    }
}

fn split_ns(name: &str) -> (Option<String>, String) {
    match name.find('|') {
        Some(pos) => (
            Some(name[..pos].to_string()),
            name[pos + 1..].to_string(),
        ),
        None => (None, name.to_string()),
    }
}

/// Simple-selector sequence treated as a set-like unit.
#[derive(Debug, Clone)]
pub struct Compound {
    pub span: SourceSpan,
    simples: Vec<SimpleSelector>,
    has_parent_reference: bool,
    has_placeholder: bool,
    /// Which complex selectors extended into this compound
    pub sources: SourcesSet,
}

impl Compound {
    pub fn new(span: SourceSpan) -> Self {
        Self {
            span,
            simples: Vec::new(),
            has_parent_reference: false,
            has_placeholder: false,
            sources: SourcesSet::new(),
        }
    }

    pub fn of(span: SourceSpan, simples: Vec<SimpleSelector>) -> Self {
        let mut compound = Self::new(span);
        for simple in simples {
            compound.push(simple);
        }
        compound
    }

    pub fn push(&mut self, simple: SimpleSelector) {
        if simple.is_parent_ref() {
            self.has_parent_reference = true;
        }
        if simple.is_placeholder() {
            self.has_placeholder = true;
        }
        self.simples.push(simple);
    }

    pub fn simples(&self) -> &[SimpleSelector] {
        &self.simples
    }

    pub fn len(&self) -> usize {
        self.simples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simples.is_empty()
    }

    pub fn has_parent_reference(&self) -> bool {
        self.has_parent_reference
    }

    pub fn has_placeholder(&self) -> bool {
        self.has_placeholder
    }

    /// A lone `&` with nothing else in the compound.
    pub fn is_empty_reference(&self) -> bool {
        self.simples.len() == 1 && self.simples[0].is_parent_ref()
    }

    pub fn is_universal(&self) -> bool {
        self.simples.len() == 1 && self.simples[0].is_universal()
    }

    /// The leading type selector, if the compound has one.
    pub fn base(&self) -> Option<&SimpleSelector> {
        match self.simples.first() {
            Some(s) if matches!(s.kind, SimpleKind::Type(_)) => Some(s),
            _ => None,
        }
    }

    pub fn contains(&self, simple: &SimpleSelector) -> bool {
        self.simples.iter().any(|s| s == simple)
    }

    pub fn specificity(&self) -> u64 {
        self.simples.iter().map(|s| s.specificity()).sum()
    }

    pub fn merge_sources(&mut self, sources: &SourcesSet) {
        self.sources.extend(sources.iter().cloned());
    }

    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    /// Sorted textual forms of the simples; the set-like identity of the
    /// compound.
    pub fn sorted_texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = self.simples.iter().map(|s| s.to_string()).collect();
        texts.sort();
        texts
    }

    /// Order-dependent equality: same simples in the same order.
    pub fn eq_ordered(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl PartialEq for Compound {
    /// Order-independent, set-like comparison; sources are metadata and do
    /// not participate.
    fn eq(&self, other: &Self) -> bool {
        self.sorted_texts() == other.sorted_texts()
    }
}

impl Eq for Compound {}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_texts().hash(state);
    }
}

impl PartialOrd for Compound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Compound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simples {
            write!(f, "{}", simple)?;
        }
        Ok(())
    }
}

/// Combinator linking a compound to the rest of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `~`
    Sibling,
    /// `+`
    Adjacent,
    /// `/x/`
    Reference,
}

impl Combinator {
    pub fn symbol(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::Sibling => " ~ ",
            Combinator::Adjacent => " + ",
            Combinator::Reference => " / ",
        }
    }
}

/// Combinator-linked chain of compounds; a linked list read left to right.
/// The final link's combinator is always `Descendant`.
#[derive(Debug, Clone)]
pub struct Complex {
    pub span: SourceSpan,
    pub combinator: Combinator,
    pub head: Compound,
    pub tail: Option<Box<Complex>>,
}

impl Complex {
    pub fn unit(span: SourceSpan, head: Compound) -> Self {
        Self {
            span,
            combinator: Combinator::Descendant,
            head,
            tail: None,
        }
    }

    /// Build a chain out of `(compound, combinator-to-next)` links.
    /// Returns `None` for an empty link list.
    pub fn from_links(span: SourceSpan, links: Vec<(Compound, Combinator)>) -> Option<Self> {
        let mut result: Option<Complex> = None;
        for (compound, combinator) in links.into_iter().rev() {
            result = Some(Complex {
                span,
                combinator,
                head: compound,
                tail: result.map(Box::new),
            });
        }
        result
    }

    /// Flatten the chain into `(compound, combinator-to-next)` links.
    pub fn to_links(&self) -> Vec<(Compound, Combinator)> {
        let mut links = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            links.push((node.head.clone(), node.combinator));
            current = node.tail.as_deref();
        }
        links
    }

    pub fn length(&self) -> usize {
        1 + self.tail.as_ref().map_or(0, |t| t.length())
    }

    pub fn first(&self) -> &Complex {
        self
    }

    pub fn last(&self) -> &Complex {
        match &self.tail {
            Some(tail) => tail.last(),
            None => self,
        }
    }

    pub fn has_parent_ref(&self) -> bool {
        self.head.has_parent_reference()
            || self.tail.as_ref().map_or(false, |t| t.has_parent_ref())
    }

    pub fn contains_placeholder(&self) -> bool {
        self.head.has_placeholder()
            || self
                .tail
                .as_ref()
                .map_or(false, |t| t.contains_placeholder())
    }

    /// The head has no simples and the link is a plain descendant; parsers
    /// produce these for selectors that open with a combinator.
    pub fn is_empty_ancestor(&self) -> bool {
        self.head.is_empty() && self.combinator == Combinator::Descendant
    }

    pub fn specificity(&self) -> u64 {
        self.head.specificity() + self.tail.as_ref().map_or(0, |t| t.specificity())
    }

    /// Union of the sources sets over every compound in the chain.
    pub fn sources(&self) -> SourcesSet {
        let mut sources = self.head.sources.clone();
        if let Some(tail) = &self.tail {
            sources.extend(tail.sources());
        }
        sources
    }

    pub fn add_sources(&mut self, sources: &SourcesSet) {
        self.head.merge_sources(sources);
        if let Some(tail) = &mut self.tail {
            tail.add_sources(sources);
        }
    }

    pub fn clear_sources(&mut self) {
        self.head.clear_sources();
        if let Some(tail) = &mut self.tail {
            tail.clear_sources();
        }
    }

    /// Order-dependent equality: identical textual form.
    pub fn eq_ordered(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl PartialEq for Complex {
    /// Structural comparison with set-like compounds.
    fn eq(&self, other: &Self) -> bool {
        self.combinator == other.combinator
            && self.head == other.head
            && self.tail == other.tail
    }
}

impl Eq for Complex {}

impl Hash for Complex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.combinator.hash(state);
        self.head.hash(state);
        self.tail.hash(state);
    }
}

impl PartialOrd for Complex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Complex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if let Some(tail) = &self.tail {
            if self.head.is_empty() {
                // leading combinator, no space before it
                write!(f, "{}", self.combinator.symbol().trim_start())?;
            } else {
                write!(f, "{}", self.combinator.symbol())?;
            }
            write!(f, "{}", tail)?;
        }
        Ok(())
    }
}

/// Comma-separated selector alternatives.
#[derive(Debug, Clone)]
pub struct SelectorList {
    pub span: SourceSpan,
    pub items: Vec<Complex>,
    /// Enclosing `@media` statement, non-owning; may be null
    pub media_context: Option<StatementId>,
}

impl SelectorList {
    pub fn new(span: SourceSpan) -> Self {
        Self {
            span,
            items: Vec::new(),
            media_context: None,
        }
    }

    pub fn of(span: SourceSpan, items: Vec<Complex>) -> Self {
        Self {
            span,
            items,
            media_context: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_parent_ref(&self) -> bool {
        self.items.iter().any(|c| c.has_parent_ref())
    }

    pub fn contains_placeholder(&self) -> bool {
        self.items.iter().any(|c| c.contains_placeholder())
    }

    /// Every alternative carries a placeholder, so the whole list produces
    /// no CSS output.
    pub fn is_invisible(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|c| c.contains_placeholder())
    }

    /// Maximum over the alternatives.
    pub fn specificity(&self) -> u64 {
        self.items.iter().map(|c| c.specificity()).max().unwrap_or(0)
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for SelectorList {}

impl Hash for SelectorList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texts: Vec<String> = self.items.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", texts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::synthetic()
    }

    fn compound(simples: Vec<SimpleSelector>) -> Compound {
        Compound::of(span(), simples)
    }

    #[test]
    fn test_display_forms() {
        let s = span();
        let a = compound(vec![
            SimpleSelector::type_selector(s, "a"),
            SimpleSelector::class(s, "foo"),
        ]);
        assert_eq!(a.to_string(), "a.foo");

        let chain = Complex::from_links(
            s,
            vec![
                (compound(vec![SimpleSelector::type_selector(s, "a")]), Combinator::Child),
                (compound(vec![SimpleSelector::type_selector(s, "b")]), Combinator::Descendant),
                (compound(vec![SimpleSelector::type_selector(s, "c")]), Combinator::Descendant),
            ],
        )
        .unwrap();
        assert_eq!(chain.to_string(), "a > b c");
    }

    #[test]
    fn test_links_roundtrip() {
        let s = span();
        let links = vec![
            (compound(vec![SimpleSelector::class(s, "x")]), Combinator::Adjacent),
            (compound(vec![SimpleSelector::class(s, "y")]), Combinator::Descendant),
        ];
        let chain = Complex::from_links(s, links.clone()).unwrap();
        let roundtripped = chain.to_links();
        assert_eq!(roundtripped.len(), 2);
        assert_eq!(roundtripped[0].1, Combinator::Adjacent);
        assert_eq!(roundtripped[0].0, links[0].0);
    }

    #[test]
    fn test_specificity_weights() {
        let s = span();
        assert_eq!(SimpleSelector::universal(s).specificity(), 0);
        assert_eq!(SimpleSelector::type_selector(s, "div").specificity(), 1);
        assert_eq!(SimpleSelector::class(s, "x").specificity(), 1_000);
        assert_eq!(SimpleSelector::id(s, "x").specificity(), 1_000_000);
        assert_eq!(SimpleSelector::pseudo(s, ":hover").specificity(), 1_000);
        assert_eq!(SimpleSelector::pseudo(s, "::before").specificity(), 1);
        assert_eq!(SimpleSelector::pseudo(s, ":before").specificity(), 1);
        assert_eq!(SimpleSelector::placeholder(s, "p").specificity(), 1_000);
    }

    #[test]
    fn test_specificity_homomorphism() {
        let s = span();
        let head = compound(vec![
            SimpleSelector::type_selector(s, "a"),
            SimpleSelector::class(s, "x"),
        ]);
        let tail = compound(vec![SimpleSelector::id(s, "y")]);
        let chain = Complex::from_links(
            s,
            vec![
                (head.clone(), Combinator::Descendant),
                (tail.clone(), Combinator::Descendant),
            ],
        )
        .unwrap();
        assert_eq!(
            chain.specificity(),
            head.specificity() + tail.specificity()
        );

        let list = SelectorList::of(
            s,
            vec![
                Complex::unit(s, head.clone()),
                Complex::unit(s, tail.clone()),
            ],
        );
        assert_eq!(
            list.specificity(),
            head.specificity().max(tail.specificity())
        );
    }

    #[test]
    fn test_wrapped_specificity_is_inner_max() {
        let s = span();
        let inner = SelectorList::of(
            s,
            vec![
                Complex::unit(s, compound(vec![SimpleSelector::type_selector(s, "p")])),
                Complex::unit(s, compound(vec![SimpleSelector::id(s, "x")])),
            ],
        );
        let not = SimpleSelector::wrapped(s, ":not", inner);
        assert_eq!(not.specificity(), 1_000_000);
    }

    #[test]
    fn test_compound_equality_modes() {
        let s = span();
        let ab = compound(vec![
            SimpleSelector::class(s, "a"),
            SimpleSelector::class(s, "b"),
        ]);
        let ba = compound(vec![
            SimpleSelector::class(s, "b"),
            SimpleSelector::class(s, "a"),
        ]);
        assert_eq!(ab, ba);
        assert!(!ab.eq_ordered(&ba));
        assert!(ab.eq_ordered(&ab.clone()));
    }

    #[test]
    fn test_compound_flags_on_push() {
        let s = span();
        let mut c = Compound::new(s);
        assert!(!c.has_parent_reference());
        c.push(SimpleSelector::parent(s));
        assert!(c.has_parent_reference());
        assert!(c.is_empty_reference());
        c.push(SimpleSelector::placeholder(s, "x"));
        assert!(c.has_placeholder());
        assert!(!c.is_empty_reference());
    }

    #[test]
    fn test_namespace_helpers() {
        let s = span();
        let plain = SimpleSelector::type_selector(s, "a");
        assert!(plain.has_universal_ns());
        assert!(plain.is_empty_ns());
        assert!(!plain.has_empty_ns());

        let universal_ns = SimpleSelector::type_selector(s, "*|a");
        assert!(universal_ns.is_universal_ns());
        assert!(universal_ns.has_universal_ns());

        let empty_ns = SimpleSelector::type_selector(s, "|a");
        assert!(empty_ns.has_empty_ns());
        assert!(!empty_ns.has_qualified_ns());

        let qualified = SimpleSelector::type_selector(s, "svg|rect");
        assert!(qualified.has_qualified_ns());
        assert_eq!(qualified.to_string(), "svg|rect");
    }

    #[test]
    fn test_list_invisibility() {
        let s = span();
        let placeholder_only = SelectorList::of(
            s,
            vec![Complex::unit(
                s,
                compound(vec![SimpleSelector::placeholder(s, "p")]),
            )],
        );
        assert!(placeholder_only.is_invisible());

        let mixed = SelectorList::of(
            s,
            vec![
                Complex::unit(s, compound(vec![SimpleSelector::placeholder(s, "p")])),
                Complex::unit(s, compound(vec![SimpleSelector::class(s, "x")])),
            ],
        );
        assert!(!mixed.is_invisible());
    }

    #[test]
    fn test_pseudo_classification() {
        let s = span();
        assert!(SimpleSelector::pseudo(s, ":hover").is_pseudo_class());
        assert!(!SimpleSelector::pseudo(s, ":hover").is_pseudo_element());
        assert!(SimpleSelector::pseudo(s, "::before").is_pseudo_element());
        assert!(SimpleSelector::pseudo(s, ":before").is_pseudo_element());
        assert!(!SimpleSelector::pseudo(s, ":before").is_pseudo_class());
    }
}

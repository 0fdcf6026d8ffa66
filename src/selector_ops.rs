//! Selector algebra
//!
//! The three operations the evaluator drives: parentize (replace `&` by the
//! enclosing selector list), unify (intersection of two selectors) and the
//! superselector relation. Compound difference and naive-trim support the
//! extend engine.
//!
//! All operations are pure: they build new selector nodes and never mutate
//! their inputs.

use crate::error::{CompilerError, Result};
use crate::selector::{Combinator, Complex, Compound, SelectorList, SimpleKind, SimpleSelector};

type Link = (Compound, Combinator);

/// Merge the combinators on either side of a splice point. Descendant
/// merges with anything; identical combinators collapse; any other pair is
/// an error.
fn merge_combinators(
    a: Combinator,
    b: Combinator,
    span: crate::position::SourceSpan,
) -> Result<Combinator> {
    match (a, b) {
        (Combinator::Descendant, x) => Ok(x),
        (x, Combinator::Descendant) => Ok(x),
        (x, y) if x == y => Ok(x),
        (x, y) => Err(CompilerError::selector(
            span,
            format!(
                "incompatible combinators \"{}\" and \"{}\"",
                x.symbol().trim(),
                y.symbol().trim()
            ),
        )),
    }
}

/// Collapse empty-head links into the combinator of their predecessor.
fn normalize_links(links: Vec<Link>, span: crate::position::SourceSpan) -> Result<Vec<Link>> {
    let mut out: Vec<Link> = Vec::new();
    for (compound, combinator) in links {
        if compound.is_empty() && !out.is_empty() {
            let last = out.last_mut().unwrap();
            last.1 = merge_combinators(last.1, combinator, span)?;
        } else {
            out.push((compound, combinator));
        }
    }
    Ok(out)
}

/// Replace every `&` within a selector list by the enclosing selector list,
/// distributing over commas. With no enclosing selector, a list containing
/// `&` is an error and anything else passes through unchanged. With an
/// enclosing selector, alternatives without `&` receive the implicit
/// descendant prefix.
pub fn parentize(child: &SelectorList, parents: Option<&SelectorList>) -> Result<SelectorList> {
    let parents = match parents {
        Some(p) if !p.is_empty() => p,
        _ => {
            if child.has_parent_ref() {
                return Err(CompilerError::selector(
                    child.span,
                    "top-level parent reference: \"&\" may only be used within a nested rule",
                ));
            }
            return Ok(child.clone());
        }
    };

    let mut result = SelectorList::new(child.span);
    result.media_context = child.media_context;
    for c in &child.items {
        for p in &parents.items {
            let combined = if c.has_parent_ref() {
                substitute_parent(c, p)?
            } else {
                // implicit descendant nesting
                let mut links = p.to_links();
                links.extend(c.to_links());
                let links = normalize_links(links, c.span)?;
                Complex::from_links(c.span, links)
                    .ok_or_else(|| CompilerError::selector(c.span, "empty selector"))?
            };
            result.items.push(combined);
        }
    }
    Ok(result)
}

fn substitute_parent(child: &Complex, parent: &Complex) -> Result<Complex> {
    let parent_links = parent.to_links();
    let mut out: Vec<Link> = Vec::new();

    for (compound, combinator) in child.to_links() {
        if !compound.has_parent_reference() {
            out.push((compound, combinator));
            continue;
        }
        if compound.is_empty_reference() {
            // a lone `&` takes the parent's entire chain
            let mut spliced = parent_links.clone();
            let last = spliced.last_mut().unwrap();
            last.1 = merge_combinators(last.1, combinator, child.span)?;
            out.extend(spliced);
        } else {
            // `&` inside a compound merges the parent's last compound with
            // the remaining simples
            let mut spliced = parent_links.clone();
            let (parent_last, _) = spliced.pop().unwrap();
            let mut simples: Vec<SimpleSelector> = parent_last.simples().to_vec();
            for simple in compound.simples() {
                if !simple.is_parent_ref() {
                    simples.push(simple.clone());
                }
            }
            let mut merged = Compound::of(compound.span, simples);
            merged.sources = parent_last.sources.clone();
            merged.merge_sources(&compound.sources);
            out.extend(spliced);
            out.push((merged, combinator));
        }
    }

    let links = normalize_links(out, child.span)?;
    Complex::from_links(child.span, links)
        .ok_or_else(|| CompilerError::selector(child.span, "empty selector"))
}

/// Unify the namespaces of two simple selectors. Universal absorbs any,
/// the empty namespace unifies only with itself, anything else requires
/// equality.
fn unify_ns(a: &SimpleSelector, b: &SimpleSelector) -> Option<Option<String>> {
    if a.ns == b.ns {
        return Some(a.ns.clone());
    }
    if a.is_universal_ns() {
        return Some(b.ns.clone());
    }
    if b.is_universal_ns() {
        return Some(a.ns.clone());
    }
    if a.is_empty_ns() && b.is_empty_ns() {
        return Some(if a.has_ns() { a.ns.clone() } else { b.ns.clone() });
    }
    None
}

/// Unify two type selectors: names must agree or one must be universal.
pub fn unify_type(a: &SimpleSelector, b: &SimpleSelector) -> Option<SimpleSelector> {
    let name = if a.is_universal() {
        b.name()
    } else if b.is_universal() || a.name() == b.name() {
        a.name()
    } else {
        return None;
    };
    let ns = unify_ns(a, b)?;
    Some(SimpleSelector {
        span: a.span,
        ns,
        kind: SimpleKind::Type(name.to_string()),
    })
}

/// Add a simple selector to a compound, failing on conflicts. Qualifiers
/// and the rest unify by concatenation; type selectors fold into the base;
/// a second, different pseudo-element is a conflict.
pub fn unify_into_compound(simple: &SimpleSelector, compound: &Compound) -> Option<Compound> {
    if compound.contains(simple) {
        return Some(compound.clone());
    }
    let mut simples: Vec<SimpleSelector> = compound.simples().to_vec();
    match &simple.kind {
        SimpleKind::Type(_) => {
            if let Some(pos) = simples
                .iter()
                .position(|s| matches!(s.kind, SimpleKind::Type(_)))
            {
                let unified = unify_type(simple, &simples[pos])?;
                simples[pos] = unified;
            } else {
                simples.insert(0, simple.clone());
            }
        }
        _ => {
            if simple.is_pseudo_element()
                && simples.iter().any(|s| s.is_pseudo_element() && s != simple)
            {
                return None;
            }
            // keep pseudo-elements at the end of the compound
            let pos = simples
                .iter()
                .position(|s| s.is_pseudo_element())
                .unwrap_or(simples.len());
            simples.insert(pos, simple.clone());
        }
    }
    let mut result = Compound::of(compound.span, simples);
    result.sources = compound.sources.clone();
    Some(result)
}

/// Intersection of two compounds: `a`'s simples followed by whatever `b`
/// adds. At most one type selector survives and it leads the result; the
/// result's sources set is the union of both inputs'.
pub fn unify_compound(a: &Compound, b: &Compound) -> Option<Compound> {
    let mut result = a.clone();
    for simple in b.simples() {
        result = unify_into_compound(simple, &result)?;
    }
    result.merge_sources(&b.sources);
    Some(result)
}

/// Reduce the combinators meeting at a join point. Incompatible pairs
/// prune the branch.
fn reduce_combinators(a: Combinator, b: Combinator) -> Option<Combinator> {
    match (a, b) {
        (Combinator::Descendant, x) => Some(x),
        (x, Combinator::Descendant) => Some(x),
        (Combinator::Child, Combinator::Child) => Some(Combinator::Child),
        (Combinator::Sibling, Combinator::Adjacent) | (Combinator::Adjacent, Combinator::Sibling) => {
            Some(Combinator::Adjacent)
        }
        (x, y) if x == y => Some(x),
        _ => None,
    }
}

/// Recursive weave over two chains, aligned at the subject end. Compounds
/// merge pairwise from the right and combinators reduce at each join;
/// exhausted chains pass the remainder of the other through. The result
/// under-approximates both inputs.
fn unify_links(a: &[Link], b: &[Link]) -> Option<Vec<Link>> {
    if a.is_empty() {
        return Some(b.to_vec());
    }
    if b.is_empty() {
        return Some(a.to_vec());
    }
    let (a_last, a_init) = a.split_last().unwrap();
    let (b_last, b_init) = b.split_last().unwrap();
    let merged = unify_compound(&a_last.0, &b_last.0)?;
    let combinator = reduce_combinators(a_last.1, b_last.1)?;
    let mut result = unify_links(a_init, b_init)?;
    result.push((merged, combinator));
    Some(result)
}

/// Intersection of two complex selectors; `None` when they cannot match a
/// common element.
pub fn unify_complex(a: &Complex, b: &Complex) -> Option<Complex> {
    let links = unify_links(&a.to_links(), &b.to_links())?;
    Complex::from_links(a.span, links)
}

/// Intersection of two selector lists: pairwise over alternatives,
/// incompatible pairs dropped. Alternatives are ordered by the lexicographic
/// comparison of their textual form, duplicates removed.
pub fn unify(a: &SelectorList, b: &SelectorList) -> SelectorList {
    let mut items: Vec<Complex> = Vec::new();
    for ca in &a.items {
        for cb in &b.items {
            if let Some(unified) = unify_complex(ca, cb) {
                if !items.contains(&unified) {
                    items.push(unified);
                }
            }
        }
    }
    items.sort();
    SelectorList::of(a.span, items)
}

/// Whether `simple` (from the candidate superselector) is guaranteed by
/// compound `b`.
fn simple_satisfied_by(simple: &SimpleSelector, b: &Compound) -> bool {
    if b.contains(simple) {
        return true;
    }
    if simple.is_universal() {
        // `*` and `*|*` match everything; a qualified or empty namespace
        // must be guaranteed by b's base
        if simple.has_universal_ns() {
            return true;
        }
        return match b.base() {
            Some(base) => unify_ns(simple, base).is_some() && !base.has_universal_ns(),
            None => false,
        };
    }
    false
}

/// Compound-level superselector test: every simple in `a` must be
/// guaranteed by `b`. A `:not` in `a` holds when its inner list
/// super-selects the inner list of a corresponding negation in `b`.
pub fn compound_is_superselector(a: &Compound, b: &Compound) -> bool {
    for simple in a.simples() {
        match &simple.kind {
            SimpleKind::Wrapped { name, inner } if name == ":not" => {
                let satisfied = b.simples().iter().any(|bs| match &bs.kind {
                    SimpleKind::Wrapped {
                        name: b_name,
                        inner: b_inner,
                    } if b_name == ":not" => is_superselector(inner, b_inner),
                    _ => false,
                });
                if !satisfied {
                    return false;
                }
            }
            _ => {
                if !simple_satisfied_by(simple, b) {
                    return false;
                }
            }
        }
    }
    true
}

/// Sliding match over two chains, anchored at the last compound. A
/// descendant combinator in `a` may skip over any prefix of `b`; specific
/// combinators must match exactly.
fn links_superselector(a: &[Link], b: &[Link]) -> bool {
    if a.is_empty() {
        return true;
    }
    if b.is_empty() {
        return false;
    }
    let (a_last, a_init) = a.split_last().unwrap();
    let (b_last, b_init) = b.split_last().unwrap();
    if !compound_is_superselector(&a_last.0, &b_last.0) {
        return false;
    }
    let a_in = a_init.last().map(|l| l.1);
    let b_in = b_init.last().map(|l| l.1);
    match a_in {
        None => true,
        Some(Combinator::Descendant) => {
            // the remaining prefix of a may match ending at any earlier
            // compound of b
            (1..=b_init.len()).any(|k| links_superselector(a_init, &b_init[..k]))
        }
        Some(comb) => match b_in {
            Some(b_comb) if comb == b_comb => links_superselector(a_init, b_init),
            _ => false,
        },
    }
}

pub fn complex_is_superselector(a: &Complex, b: &Complex) -> bool {
    links_superselector(&a.to_links(), &b.to_links())
}

/// `A ⊒ B`: every element matched by `B` is matched by `A`. For lists,
/// every alternative of `B` must be covered by some alternative of `A`.
pub fn is_superselector(a: &SelectorList, b: &SelectorList) -> bool {
    b.items
        .iter()
        .all(|bb| a.items.iter().any(|aa| complex_is_superselector(aa, bb)))
}

/// Compound difference: the simples of `a` not present in `b`. Sources are
/// preserved from `a`.
pub fn compound_minus(a: &Compound, b: &Compound) -> Compound {
    let simples: Vec<SimpleSelector> = a
        .simples()
        .iter()
        .filter(|s| !b.contains(s))
        .cloned()
        .collect();
    let mut result = Compound::of(a.span, simples);
    result.sources = a.sources.clone();
    result
}

/// Remove redundant alternatives, walking back-to-front so that later
/// extensions shadow earlier ones. A candidate is skipped when an
/// already-kept alternative equals it (set-like) and subsumes its source
/// set.
pub fn naive_trim(alternatives: Vec<Complex>) -> Vec<Complex> {
    let mut kept: Vec<Complex> = Vec::new();
    for candidate in alternatives.iter().rev() {
        let redundant = kept.iter().any(|k| {
            *k == *candidate && candidate.sources().is_subset(&k.sources())
        });
        if redundant {
            log::debug!("trimmed duplicate alternative {}", candidate);
            continue;
        }
        kept.push(candidate.clone());
    }
    kept.reverse();
    kept
}

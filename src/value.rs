//! Value model
//!
//! The tagged union of evaluable things: booleans, unit-carrying numbers,
//! colors, the two string variants, lists, insertion-ordered maps, null and
//! the custom error/warning values handed back by foreign callbacks.
//!
//! Equality is structural over components and every value admits a stable
//! hash that agrees with it. Identities (allocation addresses) are never
//! hashed. Spans and evaluation-phase flags do not participate in equality
//! or hashing.

use crate::ast::Expr;
use crate::error::{CompilerError, Result};
use crate::position::SourceSpan;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Evaluation-phase flags carried by every expression and value.
/// `is_delayed` and `is_expanded` are independent flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExprFlags {
    /// Do not evaluate yet (default arguments, `!default` semantics)
    pub is_delayed: bool,
    /// Produced by the evaluator rather than the parser
    pub is_expanded: bool,
    /// Appears inside an `#{ }` context
    pub is_interpolant: bool,
}

/// Separator of a list value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    Space,
    Comma,
}

impl ListSeparator {
    pub fn sep_string(self, compressed: bool) -> &'static str {
        match self {
            ListSeparator::Comma => {
                if compressed {
                    ","
                } else {
                    ", "
                }
            }
            ListSeparator::Space => " ",
        }
    }
}

/// Quote mark of a flat string constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteMark {
    None,
    Single,
    Double,
}

impl QuoteMark {
    pub fn as_char(self) -> Option<char> {
        match self {
            QuoteMark::None => None,
            QuoteMark::Single => Some('\''),
            QuoteMark::Double => Some('"'),
        }
    }
}

/// A number with numerator and denominator unit vectors. Unitless iff both
/// vectors are empty.
#[derive(Debug, Clone)]
pub struct Number {
    pub value: f64,
    pub numerator_units: Vec<String>,
    pub denominator_units: Vec<String>,
}

impl Number {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            numerator_units: Vec::new(),
            denominator_units: Vec::new(),
        }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let mut numerator_units = Vec::new();
        if !unit.is_empty() {
            numerator_units.push(unit);
        }
        Self {
            value,
            numerator_units,
            denominator_units: Vec::new(),
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.numerator_units.is_empty() && self.denominator_units.is_empty()
    }

    /// Textual unit, e.g. "px", "px*em/s".
    pub fn unit(&self) -> String {
        let mut result = self.numerator_units.join("*");
        if !self.denominator_units.is_empty() {
            result.push('/');
            result.push_str(&self.denominator_units.join("*"));
        }
        result
    }

    /// Sorted unit multisets with shared units cancelled. Two numbers are
    /// unit-compatible for equality when their canonical forms match.
    pub fn canonical_units(&self) -> (Vec<String>, Vec<String>) {
        let mut num = self.numerator_units.clone();
        let mut den = self.denominator_units.clone();
        num.sort();
        den.sort();
        let mut i = 0;
        while i < num.len() {
            if let Some(j) = den.iter().position(|u| *u == num[i]) {
                num.remove(i);
                den.remove(j);
            } else {
                i += 1;
            }
        }
        (num, den)
    }

    /// Sort and cancel units in place.
    pub fn normalize(&mut self) {
        let (num, den) = self.canonical_units();
        self.numerator_units = num;
        self.denominator_units = den;
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.canonical_units() == other.canonical_units()
    }
}

/// RGBA color. `disp` preserves the display form the author wrote (a named
/// color or original hex casing); `sixtuplet` records whether a hex literal
/// used six digits.
#[derive(Debug, Clone)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
    pub sixtuplet: bool,
    pub disp: String,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a,
            sixtuplet: true,
            disp: String::new(),
        }
    }

    pub fn with_disp(r: f64, g: f64, b: f64, a: f64, disp: impl Into<String>) -> Self {
        Self {
            r,
            g,
            b,
            a,
            sixtuplet: true,
            disp: disp.into(),
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b && self.a == other.a
    }
}

/// Flat or interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum StringValue {
    Constant {
        text: String,
        quote_mark: QuoteMark,
        compress_whitespace: bool,
    },
    /// Interpolated; reduced to a flat string during evaluation
    Schema {
        parts: Vec<Expr>,
        has_interpolants: bool,
    },
}

impl StringValue {
    pub fn constant(text: impl Into<String>) -> Self {
        StringValue::Constant {
            text: text.into(),
            quote_mark: QuoteMark::None,
            compress_whitespace: false,
        }
    }

    pub fn quoted(text: impl Into<String>, quote_mark: QuoteMark) -> Self {
        StringValue::Constant {
            text: text.into(),
            quote_mark,
            compress_whitespace: false,
        }
    }

    pub fn to_css_string(&self, compressed: bool, precision: usize) -> String {
        match self {
            StringValue::Constant {
                text, quote_mark, ..
            } => match quote_mark.as_char() {
                None => text.clone(),
                Some(q) => format!("{}{}{}", q, text, q),
            },
            StringValue::Schema { parts, .. } => {
                let mut out = String::new();
                for part in parts {
                    out.push_str(&part.to_css_string(compressed, precision));
                }
                out
            }
        }
    }
}

/// Insertion-ordered map of values. Duplicate keys keep the first key
/// position, take the last value, and record the first duplicated key so
/// the evaluator can warn.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
    duplicate_key: Option<Box<Value>>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            if self.duplicate_key.is_none() {
                self.duplicate_key = Some(Box::new(key));
            }
            self.entries[pos].1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn has(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn has_duplicate_key(&self) -> bool {
        self.duplicate_key.is_some()
    }

    pub fn duplicate_key(&self) -> Option<&Value> {
        self.duplicate_key.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Fatal form of the duplicate-key observation, raised by the
    /// evaluator once construction is complete.
    pub fn check_duplicate_key(&self, span: SourceSpan) -> Result<()> {
        match self.duplicate_key() {
            Some(key) => Err(CompilerError::map(
                span,
                format!("duplicate key {} in map", key.to_css_string(false, 5)),
            )),
            None => Ok(()),
        }
    }

    /// Merge another map into this one. The duplicate-key marker is reset,
    /// matching construction-time semantics only.
    pub fn merge(&mut self, other: &ValueMap) {
        if self.is_empty() {
            self.entries = other.entries.clone();
        } else {
            for (k, v) in other.iter() {
                self.insert(k.clone(), v.clone());
            }
        }
        self.duplicate_key = None;
    }
}

impl PartialEq for ValueMap {
    /// Set equality of entries, ignoring insertion order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| ov == v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Bool(bool),
    Number(Number),
    Color(Color),
    String(StringValue),
    List {
        items: Vec<Value>,
        separator: ListSeparator,
        is_arglist: bool,
    },
    Map(ValueMap),
    Null,
    CustomError(String),
    CustomWarning(String),
}

#[derive(Debug, Clone)]
pub struct Value {
    pub span: SourceSpan,
    pub flags: ExprFlags,
    pub kind: ValueKind,
}

impl Value {
    pub fn new(span: SourceSpan, kind: ValueKind) -> Self {
        Self {
            span,
            flags: ExprFlags::default(),
            kind,
        }
    }

    pub fn bool_(span: SourceSpan, value: bool) -> Self {
        Self::new(span, ValueKind::Bool(value))
    }

    pub fn number(span: SourceSpan, value: f64) -> Self {
        Self::new(span, ValueKind::Number(Number::new(value)))
    }

    pub fn dimension(span: SourceSpan, value: f64, unit: &str) -> Self {
        Self::new(span, ValueKind::Number(Number::with_unit(value, unit)))
    }

    pub fn color(span: SourceSpan, r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::new(span, ValueKind::Color(Color::new(r, g, b, a)))
    }

    pub fn string(span: SourceSpan, text: impl Into<String>) -> Self {
        Self::new(span, ValueKind::String(StringValue::constant(text)))
    }

    pub fn list(span: SourceSpan, items: Vec<Value>, separator: ListSeparator) -> Self {
        Self::new(
            span,
            ValueKind::List {
                items,
                separator,
                is_arglist: false,
            },
        )
    }

    pub fn map(span: SourceSpan, map: ValueMap) -> Self {
        Self::new(span, ValueKind::Map(map))
    }

    pub fn null(span: SourceSpan) -> Self {
        Self::new(span, ValueKind::Null)
    }

    /// Invisible values are suppressed during CSS emission.
    pub fn is_invisible(&self) -> bool {
        match &self.kind {
            ValueKind::Null => true,
            ValueKind::List { items, .. } => items.is_empty(),
            ValueKind::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Falsiness for control directives: `null` and `false` only.
    pub fn is_false(&self) -> bool {
        matches!(self.kind, ValueKind::Null | ValueKind::Bool(false))
    }

    /// Set the delayed flag; containers propagate it to their elements.
    pub fn set_delayed(&mut self, delayed: bool) {
        self.flags.is_delayed = delayed;
        match &mut self.kind {
            ValueKind::List { items, .. } => {
                for item in items {
                    item.set_delayed(delayed);
                }
            }
            ValueKind::Map(map) => {
                for (k, v) in &mut map.entries {
                    k.set_delayed(delayed);
                    v.set_delayed(delayed);
                }
            }
            _ => {}
        }
    }

    /// Canonical textual form used by the evaluator inside interpolations.
    pub fn to_css_string(&self, compressed: bool, precision: usize) -> String {
        match &self.kind {
            ValueKind::Bool(b) => b.to_string(),
            ValueKind::Number(n) => {
                let mut text = format_double(n.value, precision);
                if compressed {
                    text = strip_leading_zero(&text);
                }
                text.push_str(&n.unit());
                text
            }
            ValueKind::Color(c) => color_to_css(c, compressed, precision),
            ValueKind::String(s) => s.to_css_string(compressed, precision),
            ValueKind::List {
                items, separator, ..
            } => {
                let sep = separator.sep_string(compressed);
                items
                    .iter()
                    .filter(|item| !item.is_invisible())
                    .map(|item| item.to_css_string(compressed, precision))
                    .collect::<Vec<_>>()
                    .join(sep)
            }
            ValueKind::Map(map) => {
                let entries = map
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}: {}",
                            k.to_css_string(compressed, precision),
                            v.to_css_string(compressed, precision)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({})", entries)
            }
            ValueKind::Null => String::new(),
            ValueKind::CustomError(msg) | ValueKind::CustomWarning(msg) => msg.clone(),
        }
    }

}

impl PartialEq for Value {
    /// Structural equality over components; spans and flags are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.kind {
            ValueKind::Bool(b) => {
                state.write_u8(0);
                b.hash(state);
            }
            ValueKind::Number(n) => {
                state.write_u8(1);
                hash_f64(n.value, state);
                n.canonical_units().hash(state);
            }
            ValueKind::Color(c) => {
                state.write_u8(2);
                hash_f64(c.r, state);
                hash_f64(c.g, state);
                hash_f64(c.b, state);
                hash_f64(c.a, state);
            }
            ValueKind::String(s) => {
                state.write_u8(3);
                match s {
                    StringValue::Constant {
                        text, quote_mark, ..
                    } => {
                        text.hash(state);
                        quote_mark.hash(state);
                    }
                    StringValue::Schema { parts, .. } => {
                        for part in parts {
                            part.hash(state);
                        }
                    }
                }
            }
            ValueKind::List {
                items, separator, ..
            } => {
                state.write_u8(4);
                separator.hash(state);
                for item in items {
                    item.hash(state);
                }
            }
            ValueKind::Map(map) => {
                state.write_u8(5);
                // order-insensitive fold so the hash agrees with set equality
                let mut acc: u64 = 0;
                for (k, v) in map.iter() {
                    let mut entry = DefaultHasher::new();
                    k.hash(&mut entry);
                    v.hash(&mut entry);
                    acc = acc.wrapping_add(entry.finish());
                }
                state.write_u64(acc);
            }
            ValueKind::Null => state.write_u8(6),
            ValueKind::CustomError(msg) => {
                state.write_u8(7);
                msg.hash(state);
            }
            ValueKind::CustomWarning(msg) => {
                state.write_u8(8);
                msg.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css_string(false, 5))
    }
}

fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    // normalize -0.0 so equal values hash equally
    let bits = if value == 0.0 { 0 } else { value.to_bits() };
    state.write_u64(bits);
}

/// Format a double with at most `precision` fractional digits, trimming
/// trailing zeros.
pub(crate) fn format_double(value: f64, precision: usize) -> String {
    let mut text = format!("{:.*}", precision, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

fn strip_leading_zero(text: &str) -> String {
    if let Some(rest) = text.strip_prefix("0.") {
        format!(".{}", rest)
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{}", rest)
    } else {
        text.to_string()
    }
}

fn color_to_css(c: &Color, compressed: bool, precision: usize) -> String {
    if c.a < 1.0 {
        let sep = if compressed { "," } else { ", " };
        return format!(
            "rgba({}{sep}{}{sep}{}{sep}{})",
            c.r.round() as i64,
            c.g.round() as i64,
            c.b.round() as i64,
            format_double(c.a, precision),
        );
    }
    if !c.disp.is_empty() && !compressed {
        return c.disp.clone();
    }
    let (r, g, b) = (
        (c.r.round() as i64).clamp(0, 255) as u8,
        (c.g.round() as i64).clamp(0, 255) as u8,
        (c.b.round() as i64).clamp(0, 255) as u8,
    );
    let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
    if compressed && !c.sixtuplet {
        let bytes = hex.as_bytes();
        if bytes[1] == bytes[2] && bytes[3] == bytes[4] && bytes[5] == bytes[6] {
            return format!(
                "#{}{}{}",
                bytes[1] as char, bytes[3] as char, bytes[5] as char
            );
        }
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::synthetic()
    }

    fn stable_hash(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_number_unitless() {
        assert!(Number::new(4.0).is_unitless());
        assert!(!Number::with_unit(4.0, "px").is_unitless());
    }

    #[test]
    fn test_number_unit_text() {
        let mut n = Number::with_unit(3.0, "px");
        n.numerator_units.push("em".to_string());
        n.denominator_units.push("s".to_string());
        assert_eq!(n.unit(), "px*em/s");
    }

    #[test]
    fn test_number_equality_ignores_unit_order() {
        let mut a = Number::new(2.0);
        a.numerator_units = vec!["px".to_string(), "em".to_string()];
        let mut b = Number::new(2.0);
        b.numerator_units = vec!["em".to_string(), "px".to_string()];
        assert_eq!(a, b);
    }

    #[test]
    fn test_number_equality_cancels_shared_units() {
        let mut a = Number::new(2.0);
        a.numerator_units = vec!["px".to_string(), "s".to_string()];
        a.denominator_units = vec!["s".to_string()];
        let b = Number::with_unit(2.0, "px");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let mut a = Value::dimension(span(), 2.0, "px");
        if let ValueKind::Number(n) = &mut a.kind {
            n.numerator_units.push("em".to_string());
        }
        let mut b = Value::dimension(span(), 2.0, "em");
        if let ValueKind::Number(n) = &mut b.kind {
            n.numerator_units.push("px".to_string());
        }
        assert_eq!(a, b);
        assert_eq!(stable_hash(&a), stable_hash(&b));
    }

    #[test]
    fn test_map_ignores_insertion_order() {
        let mut m1 = ValueMap::new();
        m1.insert(Value::string(span(), "a"), Value::number(span(), 1.0));
        m1.insert(Value::string(span(), "b"), Value::number(span(), 2.0));
        let mut m2 = ValueMap::new();
        m2.insert(Value::string(span(), "b"), Value::number(span(), 2.0));
        m2.insert(Value::string(span(), "a"), Value::number(span(), 1.0));
        let v1 = Value::map(span(), m1);
        let v2 = Value::map(span(), m2);
        assert_eq!(v1, v2);
        assert_eq!(stable_hash(&v1), stable_hash(&v2));
    }

    #[test]
    fn test_map_duplicate_key_last_wins_first_position() {
        let mut m = ValueMap::new();
        m.insert(Value::string(span(), "k"), Value::number(span(), 1.0));
        m.insert(Value::string(span(), "other"), Value::number(span(), 9.0));
        m.insert(Value::string(span(), "k"), Value::number(span(), 2.0));
        assert!(m.has_duplicate_key());
        assert_eq!(m.len(), 2);
        let first_key = m.keys().next().unwrap();
        assert_eq!(first_key, &Value::string(span(), "k"));
        assert_eq!(
            m.get(&Value::string(span(), "k")),
            Some(&Value::number(span(), 2.0))
        );
    }

    #[test]
    fn test_duplicate_key_check() {
        let mut m = ValueMap::new();
        m.insert(Value::string(span(), "k"), Value::number(span(), 1.0));
        assert!(m.check_duplicate_key(span()).is_ok());
        m.insert(Value::string(span(), "k"), Value::number(span(), 2.0));
        let err = m.check_duplicate_key(span());
        assert!(matches!(err, Err(CompilerError::Map { .. })));
    }

    #[test]
    fn test_invisible_values() {
        assert!(Value::null(span()).is_invisible());
        assert!(Value::list(span(), vec![], ListSeparator::Space).is_invisible());
        assert!(Value::map(span(), ValueMap::new()).is_invisible());
        assert!(!Value::number(span(), 0.0).is_invisible());
    }

    #[test]
    fn test_set_delayed_propagates() {
        let mut list = Value::list(
            span(),
            vec![Value::number(span(), 1.0), Value::number(span(), 2.0)],
            ListSeparator::Comma,
        );
        list.set_delayed(true);
        if let ValueKind::List { items, .. } = &list.kind {
            assert!(items.iter().all(|i| i.flags.is_delayed));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_number_css_text() {
        assert_eq!(Value::dimension(span(), 12.5, "px").to_css_string(false, 5), "12.5px");
        assert_eq!(Value::number(span(), 3.0).to_css_string(false, 5), "3");
        assert_eq!(Value::number(span(), 0.5).to_css_string(true, 5), ".5");
        assert_eq!(
            Value::number(span(), 1.0 / 3.0).to_css_string(false, 5),
            "0.33333"
        );
    }

    #[test]
    fn test_color_css_text() {
        assert_eq!(
            Value::color(span(), 255.0, 0.0, 0.0, 1.0).to_css_string(false, 5),
            "#ff0000"
        );
        assert_eq!(
            Value::color(span(), 255.0, 0.0, 0.0, 0.5).to_css_string(false, 5),
            "rgba(255, 0, 0, 0.5)"
        );
        let named = Value::new(
            span(),
            ValueKind::Color(Color::with_disp(255.0, 0.0, 0.0, 1.0, "red")),
        );
        assert_eq!(named.to_css_string(false, 5), "red");
    }

    #[test]
    fn test_list_css_text_skips_invisible() {
        let list = Value::list(
            span(),
            vec![
                Value::string(span(), "a"),
                Value::null(span()),
                Value::string(span(), "b"),
            ],
            ListSeparator::Comma,
        );
        assert_eq!(list.to_css_string(false, 5), "a, b");
        assert_eq!(list.to_css_string(true, 5), "a,b");
    }

    #[test]
    fn test_map_css_text() {
        let mut m = ValueMap::new();
        m.insert(Value::string(span(), "a"), Value::number(span(), 1.0));
        assert_eq!(Value::map(span(), m).to_css_string(false, 5), "(a: 1)");
    }
}

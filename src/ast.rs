//! Abstract syntax tree for the stylc semantic core
//!
//! Statements live in the compilation's `StatementArena` and reference each
//! other by `StatementId` handles; blocks are ordered handle sequences with
//! cumulative hoisting flags. Expressions and values are owned sum types.
//! An external parser produces this tree and must uphold the span and flag
//! invariants; an external evaluator reduces the expressions.

use crate::arena::{EnvId, StatementArena, StatementId};
use crate::context::Context;
use crate::error::{CompilerError, Result};
use crate::position::SourceSpan;
use crate::selector::SelectorList;
use crate::value::{ExprFlags, ListSeparator, StringValue, Value};
use std::hash::{Hash, Hasher};

/// Binary operators of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

/// Unevaluated numeric data; the evaluator turns these into numbers or
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextualKind {
    Number,
    Percentage,
    Dimension,
    Hex,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    Variable(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    FunctionCall {
        name: String,
        arguments: ArgumentList,
    },
    Textual {
        kind: TextualKind,
        text: String,
    },
    ListLiteral {
        items: Vec<Expr>,
        separator: ListSeparator,
        is_arglist: bool,
    },
    MapLiteral {
        entries: Vec<(Expr, Expr)>,
    },
}

/// An expression node. Spans and evaluation-phase flags do not participate
/// in equality or hashing.
#[derive(Debug, Clone)]
pub struct Expr {
    pub span: SourceSpan,
    pub flags: ExprFlags,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(span: SourceSpan, kind: ExprKind) -> Self {
        Self {
            span,
            flags: ExprFlags::default(),
            kind,
        }
    }

    pub fn literal(value: Value) -> Self {
        Self {
            span: value.span,
            flags: value.flags,
            kind: ExprKind::Literal(value),
        }
    }

    pub fn variable(span: SourceSpan, name: impl Into<String>) -> Self {
        Self::new(span, ExprKind::Variable(name.into()))
    }

    /// Textual numeric data is born delayed; the evaluator decides when to
    /// reduce it.
    pub fn textual(span: SourceSpan, kind: TextualKind, text: impl Into<String>) -> Self {
        let mut expr = Self::new(
            span,
            ExprKind::Textual {
                kind,
                text: text.into(),
            },
        );
        expr.flags.is_delayed = true;
        expr
    }

    /// Set the delayed flag; containers and operator nodes propagate it.
    pub fn set_delayed(&mut self, delayed: bool) {
        self.flags.is_delayed = delayed;
        match &mut self.kind {
            ExprKind::Literal(value) => value.set_delayed(delayed),
            ExprKind::Binary { left, right, .. } => {
                left.set_delayed(delayed);
                right.set_delayed(delayed);
            }
            ExprKind::Unary { operand, .. } => operand.set_delayed(delayed),
            ExprKind::ListLiteral { items, .. } => {
                for item in items {
                    item.set_delayed(delayed);
                }
            }
            ExprKind::MapLiteral { entries } => {
                for (k, v) in entries {
                    k.set_delayed(delayed);
                    v.set_delayed(delayed);
                }
            }
            _ => {}
        }
    }

    pub fn is_invisible(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(value) => value.is_invisible(),
            _ => false,
        }
    }

    /// Canonical textual form used inside interpolations.
    pub fn to_css_string(&self, compressed: bool, precision: usize) -> String {
        match &self.kind {
            ExprKind::Literal(value) => value.to_css_string(compressed, precision),
            ExprKind::Variable(name) => format!("${}", name),
            ExprKind::Binary { op, left, right } => format!(
                "{} {} {}",
                left.to_css_string(compressed, precision),
                op.symbol(),
                right.to_css_string(compressed, precision)
            ),
            ExprKind::Unary { op, operand } => {
                let operand = operand.to_css_string(compressed, precision);
                match op {
                    UnaryOp::Plus => format!("+{}", operand),
                    UnaryOp::Minus => format!("-{}", operand),
                    UnaryOp::Not => format!("not {}", operand),
                }
            }
            ExprKind::FunctionCall { name, arguments } => {
                let args = arguments
                    .args()
                    .iter()
                    .map(|a| a.to_css_string(compressed, precision))
                    .collect::<Vec<_>>()
                    .join(if compressed { "," } else { ", " });
                format!("{}({})", name, args)
            }
            ExprKind::Textual { text, .. } => text.clone(),
            ExprKind::ListLiteral {
                items, separator, ..
            } => items
                .iter()
                .filter(|i| !i.is_invisible())
                .map(|i| i.to_css_string(compressed, precision))
                .collect::<Vec<_>>()
                .join(separator.sep_string(compressed)),
            ExprKind::MapLiteral { entries } => {
                let body = entries
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
                format!("({})", body)
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.kind {
            ExprKind::Literal(value) => {
                state.write_u8(0);
                value.hash(state);
            }
            ExprKind::Variable(name) => {
                state.write_u8(1);
                name.hash(state);
            }
            ExprKind::Binary { op, left, right } => {
                state.write_u8(2);
                op.hash(state);
                left.hash(state);
                right.hash(state);
            }
            ExprKind::Unary { op, operand } => {
                state.write_u8(3);
                op.hash(state);
                operand.hash(state);
            }
            ExprKind::FunctionCall { name, arguments } => {
                state.write_u8(4);
                name.hash(state);
                for arg in arguments.args() {
                    arg.hash(state);
                }
            }
            ExprKind::Textual { kind, text } => {
                state.write_u8(5);
                kind.hash(state);
                text.hash(state);
            }
            ExprKind::ListLiteral {
                items, separator, ..
            } => {
                state.write_u8(6);
                separator.hash(state);
                for item in items {
                    item.hash(state);
                }
            }
            ExprKind::MapLiteral { entries } => {
                state.write_u8(7);
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

/// One argument of a mixin or function call.
#[derive(Debug, Clone)]
pub struct Argument {
    pub span: SourceSpan,
    pub value: Expr,
    pub name: Option<String>,
    pub is_rest: bool,
    pub is_keyword: bool,
}

impl Argument {
    pub fn new(
        span: SourceSpan,
        value: Expr,
        name: Option<String>,
        is_rest: bool,
        is_keyword: bool,
    ) -> Result<Self> {
        if name.is_some() && is_rest {
            return Err(CompilerError::argument(
                span,
                "variable-length argument may not be passed by name",
            ));
        }
        Ok(Self {
            span,
            value,
            name,
            is_rest,
            is_keyword,
        })
    }

    pub fn positional(span: SourceSpan, value: Expr) -> Self {
        Self {
            span,
            value,
            name: None,
            is_rest: false,
            is_keyword: false,
        }
    }

    fn to_css_string(&self, compressed: bool, precision: usize) -> String {
        match &self.name {
            Some(name) => format!(
                "${}: {}",
                name,
                self.value.to_css_string(compressed, precision)
            ),
            None => self.value.to_css_string(compressed, precision),
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for Argument {}

impl Hash for Argument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
    }
}

/// Argument list with cumulative flags maintained on push.
#[derive(Debug, Clone)]
pub struct ArgumentList {
    pub span: SourceSpan,
    args: Vec<Argument>,
    has_named: bool,
    has_rest: bool,
    has_keyword: bool,
}

impl PartialEq for ArgumentList {
    fn eq(&self, other: &Self) -> bool {
        self.args == other.args
    }
}

impl Eq for ArgumentList {}

impl ArgumentList {
    pub fn new(span: SourceSpan) -> Self {
        Self {
            span,
            args: Vec::new(),
            has_named: false,
            has_rest: false,
            has_keyword: false,
        }
    }

    pub fn push(&mut self, argument: Argument) {
        if argument.name.is_some() {
            self.has_named = true;
        }
        if argument.is_rest {
            self.has_rest = true;
        }
        if argument.is_keyword {
            self.has_keyword = true;
        }
        self.args.push(argument);
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn has_named(&self) -> bool {
        self.has_named
    }

    pub fn has_rest(&self) -> bool {
        self.has_rest
    }

    pub fn has_keyword(&self) -> bool {
        self.has_keyword
    }
}

/// One declared parameter of a mixin or function.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub span: SourceSpan,
    pub name: String,
    pub default_value: Option<Expr>,
    pub is_rest: bool,
}

impl Parameter {
    pub fn new(
        span: SourceSpan,
        name: impl Into<String>,
        default_value: Option<Expr>,
        is_rest: bool,
    ) -> Result<Self> {
        if default_value.is_some() && is_rest {
            return Err(CompilerError::argument(
                span,
                "variable-length parameter may not have a default value",
            ));
        }
        Ok(Self {
            span,
            name: name.into(),
            default_value,
            is_rest,
        })
    }

    pub fn required(span: SourceSpan, name: impl Into<String>) -> Self {
        Self {
            span,
            name: name.into(),
            default_value: None,
            is_rest: false,
        }
    }
}

/// Parameter list enforcing declaration-order rules as elements are
/// appended: required before optional, optional incompatible with a rest
/// parameter, at most one rest parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterList {
    params: Vec<Parameter>,
    has_optional: bool,
    has_rest: bool,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parameter: Parameter) -> Result<()> {
        if parameter.default_value.is_some() {
            if self.has_rest {
                return Err(CompilerError::argument(
                    parameter.span,
                    "optional parameters may not be combined with variable-length parameters",
                ));
            }
            self.has_optional = true;
        } else if parameter.is_rest {
            if self.has_rest {
                return Err(CompilerError::argument(
                    parameter.span,
                    "functions and mixins cannot have more than one variable-length parameter",
                ));
            }
            self.has_rest = true;
        } else {
            if self.has_rest {
                return Err(CompilerError::argument(
                    parameter.span,
                    "required parameters must precede variable-length parameters",
                ));
            }
            if self.has_optional {
                return Err(CompilerError::argument(
                    parameter.span,
                    "required parameters must precede optional parameters",
                ));
            }
        }
        self.params.push(parameter);
        Ok(())
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn has_optional(&self) -> bool {
        self.has_optional
    }

    pub fn has_rest(&self) -> bool {
        self.has_rest
    }
}

/// Ordered statement handles with cumulative hoisting flags.
#[derive(Debug, Clone, Default)]
pub struct Block {
    statements: Vec<StatementId>,
    pub is_root: bool,
    has_hoistable: bool,
    has_non_hoistable: bool,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root() -> Self {
        Self {
            is_root: true,
            ..Self::default()
        }
    }

    /// Append a statement, folding its hoistability into the block flags.
    pub fn push(&mut self, arena: &StatementArena, id: StatementId) {
        if arena.get(id).is_hoistable() {
            self.has_hoistable = true;
        } else {
            self.has_non_hoistable = true;
        }
        self.statements.push(id);
    }

    pub fn statements(&self) -> &[StatementId] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn has_hoistable(&self) -> bool {
        self.has_hoistable
    }

    pub fn has_non_hoistable(&self) -> bool {
        self.has_non_hoistable
    }
}

/// Media query of a `@media` block.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    pub span: SourceSpan,
    pub media_type: Option<String>,
    pub is_negated: bool,
    pub is_restricted: bool,
    pub expressions: Vec<MediaQueryExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaQueryExpr {
    pub span: SourceSpan,
    pub feature: Expr,
    pub value: Option<Expr>,
    pub is_interpolated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportsOperand {
    None,
    And,
    Or,
    Not,
}

/// Condition tree of a `@supports` block.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportsCondition {
    pub span: SourceSpan,
    pub feature: Option<StringValue>,
    pub value: Option<Expr>,
    pub operand: SupportsOperand,
    pub children: Vec<SupportsCondition>,
    pub is_root: bool,
}

/// The `(with: ...)` / `(without: ...)` expression of an `@at-root`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRootExpr {
    pub span: SourceSpan,
    /// "with" or "without"; absent means a bare `@at-root`
    pub feature: Option<String>,
    /// Directive kinds listed in the expression
    pub kinds: Vec<String>,
    pub is_interpolated: bool,
}

impl AtRootExpr {
    pub fn bare(span: SourceSpan) -> Self {
        Self {
            span,
            feature: None,
            kinds: Vec::new(),
            is_interpolated: false,
        }
    }

    pub fn with(span: SourceSpan, kinds: Vec<String>) -> Self {
        Self {
            span,
            feature: Some("with".to_string()),
            kinds,
            is_interpolated: false,
        }
    }

    pub fn without(span: SourceSpan, kinds: Vec<String>) -> Self {
        Self {
            span,
            feature: Some("without".to_string()),
            kinds,
            is_interpolated: false,
        }
    }

    /// Whether the at-root content escapes a wrapper of the given kind.
    /// Under "with" only the listed kinds (or `all`) are kept; otherwise
    /// only the listed kinds (or `all`) are escaped; a bare `@at-root`
    /// escapes rules alone.
    pub fn exclude(&self, kind: &str) -> bool {
        let listed = self.kinds.iter().any(|v| v == "all" || v == kind);
        if self.feature.as_deref() == Some("with") {
            if self.kinds.is_empty() {
                return kind != "rule";
            }
            !listed
        } else {
            if self.kinds.is_empty() {
                return kind == "rule";
            }
            listed
        }
    }

    /// Decide for an enclosing wrapper statement whether it is stripped.
    pub fn exclude_statement(&self, statement: &Statement) -> bool {
        match &statement.kind {
            StatementKind::AtRule { keyword, .. } => {
                if is_keyframes_keyword(keyword) {
                    self.exclude("keyframes")
                } else if is_media_keyword(keyword) {
                    self.exclude("media")
                } else {
                    self.exclude(keyword.trim_start_matches('@'))
                }
            }
            StatementKind::MediaBlock { .. } => self.exclude("media"),
            StatementKind::Ruleset { .. } => self.exclude("rule"),
            StatementKind::SupportsBlock { .. } => self.exclude("supports"),
            _ => false,
        }
    }
}

/// `@media` including vendor-prefixed spellings.
pub fn is_media_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        "@media" | "@-webkit-media" | "@-moz-media" | "@-o-media"
    )
}

/// `@keyframes` including vendor-prefixed spellings.
pub fn is_keyframes_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        "@keyframes" | "@-webkit-keyframes" | "@-moz-keyframes" | "@-o-keyframes"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Mixin,
    Function,
}

/// Host-provided implementation of a built-in function.
pub type NativeFunction = fn(&mut Context, &ArgumentList, SourceSpan) -> Result<Value>;

/// A mixin or function definition. `environment` is a non-owning handle to
/// the defining lexical scope, resolved by the evaluator.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub parameters: ParameterList,
    pub body: Option<Block>,
    pub environment: Option<EnvId>,
    pub native_fn: Option<NativeFunction>,
    /// Foreign (plugin) callback entry, opaque to the core
    pub c_fn: Option<NativeFunction>,
    pub is_overload_stub: bool,
    pub signature: Option<String>,
}

impl Definition {
    pub fn new(
        name: impl Into<String>,
        kind: DefinitionKind,
        parameters: ParameterList,
        body: Block,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            parameters,
            body: Some(body),
            environment: None,
            native_fn: None,
            c_fn: None,
            is_overload_stub: false,
            signature: None,
        }
    }

    pub fn native(
        name: impl Into<String>,
        signature: impl Into<String>,
        parameters: ParameterList,
        native_fn: NativeFunction,
        is_overload_stub: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DefinitionKind::Function,
            parameters,
            body: None,
            environment: None,
            native_fn: Some(native_fn),
            c_fn: None,
            is_overload_stub,
            signature: Some(signature.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum StatementKind {
    /// Styles headed by a selector list
    Ruleset {
        selector: SelectorList,
        body: Block,
    },
    /// `@media`
    MediaBlock {
        queries: Vec<MediaQuery>,
        body: Block,
    },
    /// `@supports`
    SupportsBlock {
        query: SupportsCondition,
        body: Block,
    },
    /// Arbitrary `@`-directive with optional selector, value and body
    AtRule {
        keyword: String,
        selector: Option<SelectorList>,
        value: Option<Expr>,
        body: Option<Block>,
    },
    /// Child block of a `@keyframes`
    KeyframeRule {
        selector: Option<SelectorList>,
        body: Block,
    },
    Declaration {
        property: StringValue,
        value: Expr,
        is_important: bool,
        is_indented: bool,
    },
    /// Nested namespaced properties (`font: { family: ... }`)
    PropertySet {
        property: StringValue,
        body: Block,
    },
    Assignment {
        variable: String,
        value: Expr,
        is_default: bool,
        is_global: bool,
    },
    Import {
        files: Vec<String>,
        urls: Vec<Expr>,
        media_queries: Vec<MediaQuery>,
    },
    ImportStub {
        file: String,
    },
    Warning {
        message: Expr,
    },
    Error {
        message: Expr,
    },
    Debug {
        value: Expr,
    },
    Comment {
        text: StringValue,
        is_important: bool,
    },
    If {
        predicate: Expr,
        consequent: Block,
        alternative: Option<Block>,
    },
    For {
        variable: String,
        lower: Expr,
        upper: Expr,
        is_inclusive: bool,
        body: Block,
    },
    Each {
        variables: Vec<String>,
        list: Expr,
        body: Block,
    },
    While {
        predicate: Expr,
        body: Block,
    },
    Return {
        value: Expr,
    },
    /// An `@extend` target
    Extension {
        selector: SelectorList,
    },
    Definition(Definition),
    /// `@include`
    MixinCall {
        name: String,
        arguments: ArgumentList,
        content: Option<Block>,
    },
    /// `@content` inside a mixin body
    Content,
    AtRootBlock {
        expression: Option<AtRootExpr>,
        body: Block,
    },
    /// Wrapper emitted when a nested hoistable floats outward
    Bubble {
        node: StatementId,
    },
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub span: SourceSpan,
    /// Indentation depth, used only by the emitter
    pub tabs: usize,
    /// Separates adjacent rule groups in the output
    pub group_end: bool,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(span: SourceSpan, kind: StatementKind) -> Self {
        Self {
            span,
            tabs: 0,
            group_end: false,
            kind,
        }
    }

    /// Hoistable statements float past non-hoistable siblings during
    /// emission.
    pub fn is_hoistable(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::Ruleset { .. }
                | StatementKind::MediaBlock { .. }
                | StatementKind::SupportsBlock { .. }
                | StatementKind::AtRootBlock { .. }
        )
    }

    /// Bubbling statements float out through their enclosing rulesets.
    pub fn bubbles(&self) -> bool {
        match &self.kind {
            StatementKind::MediaBlock { .. }
            | StatementKind::SupportsBlock { .. }
            | StatementKind::Bubble { .. } => true,
            StatementKind::AtRule { keyword, .. } => {
                is_media_keyword(keyword) || is_keyframes_keyword(keyword)
            }
            _ => false,
        }
    }

    /// Whether the statement contributes nothing to the CSS output.
    pub fn is_invisible(&self, arena: &StatementArena) -> bool {
        match &self.kind {
            StatementKind::Ruleset { selector, .. } => selector.is_invisible(),
            StatementKind::MediaBlock { body, .. } => body
                .statements()
                .iter()
                .all(|id| arena.get(*id).is_invisible(arena)),
            _ => false,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        match &self.kind {
            StatementKind::Ruleset { body, .. }
            | StatementKind::MediaBlock { body, .. }
            | StatementKind::SupportsBlock { body, .. }
            | StatementKind::KeyframeRule { body, .. }
            | StatementKind::PropertySet { body, .. }
            | StatementKind::For { body, .. }
            | StatementKind::Each { body, .. }
            | StatementKind::While { body, .. }
            | StatementKind::AtRootBlock { body, .. } => Some(body),
            StatementKind::If { consequent, .. } => Some(consequent),
            StatementKind::AtRule { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Complex, Compound, SimpleSelector};

    fn span() -> SourceSpan {
        SourceSpan::synthetic()
    }

    fn ruleset(arena: &mut StatementArena, class: &str) -> StatementId {
        let s = span();
        let selector = SelectorList::of(
            s,
            vec![Complex::unit(
                s,
                Compound::of(s, vec![SimpleSelector::class(s, class)]),
            )],
        );
        arena.alloc(Statement::new(
            s,
            StatementKind::Ruleset {
                selector,
                body: Block::new(),
            },
        ))
    }

    #[test]
    fn test_block_flags_accumulate() {
        let mut arena = StatementArena::new();
        let rule = ruleset(&mut arena, "a");
        let decl = arena.alloc(Statement::new(span(), StatementKind::Content));

        let mut block = Block::new();
        assert!(!block.has_hoistable() && !block.has_non_hoistable());
        block.push(&arena, rule);
        assert!(block.has_hoistable() && !block.has_non_hoistable());
        block.push(&arena, decl);
        assert!(block.has_hoistable() && block.has_non_hoistable());
    }

    #[test]
    fn test_bubbling_statements() {
        let s = span();
        let media = Statement::new(
            s,
            StatementKind::AtRule {
                keyword: "@-webkit-media".to_string(),
                selector: None,
                value: None,
                body: None,
            },
        );
        assert!(media.bubbles());
        let charset = Statement::new(
            s,
            StatementKind::AtRule {
                keyword: "@charset".to_string(),
                selector: None,
                value: None,
                body: None,
            },
        );
        assert!(!charset.bubbles());
    }

    #[test]
    fn test_placeholder_ruleset_is_invisible() {
        let s = span();
        let arena = StatementArena::new();
        let selector = SelectorList::of(
            s,
            vec![Complex::unit(
                s,
                Compound::of(s, vec![SimpleSelector::placeholder(s, "p")]),
            )],
        );
        let rule = Statement::new(
            s,
            StatementKind::Ruleset {
                selector,
                body: Block::new(),
            },
        );
        assert!(rule.is_invisible(&arena));
    }

    #[test]
    fn test_at_root_exclude_truth_table() {
        let s = span();
        let bare = AtRootExpr::bare(s);
        assert!(bare.exclude("rule"));
        assert!(!bare.exclude("media"));

        let with_media = AtRootExpr::with(s, vec!["media".to_string()]);
        assert!(!with_media.exclude("media"));
        assert!(with_media.exclude("rule"));
        assert!(with_media.exclude("supports"));

        let without_media = AtRootExpr::without(s, vec!["media".to_string()]);
        assert!(without_media.exclude("media"));
        assert!(!without_media.exclude("rule"));

        let without_all = AtRootExpr::without(s, vec!["all".to_string()]);
        assert!(without_all.exclude("media"));
        assert!(without_all.exclude("rule"));
        assert!(without_all.exclude("supports"));

        let with_empty = AtRootExpr::with(s, vec![]);
        assert!(!with_empty.exclude("rule"));
        assert!(with_empty.exclude("media"));
    }

    #[test]
    fn test_at_root_keyframes_grouping() {
        let s = span();
        let without_keyframes = AtRootExpr::without(s, vec!["keyframes".to_string()]);
        let vendor = Statement::new(
            s,
            StatementKind::AtRule {
                keyword: "@-moz-keyframes".to_string(),
                selector: None,
                value: None,
                body: None,
            },
        );
        assert!(without_keyframes.exclude_statement(&vendor));
    }

    #[test]
    fn test_named_rest_argument_rejected() {
        let s = span();
        let result = Argument::new(
            s,
            Expr::variable(s, "rest"),
            Some("args".to_string()),
            true,
            false,
        );
        assert!(matches!(result, Err(CompilerError::Argument { .. })));
    }

    #[test]
    fn test_parameter_order_rules() {
        let s = span();
        let mut params = ParameterList::new();
        params.push(Parameter::required(s, "a")).unwrap();
        params
            .push(Parameter::new(s, "b", Some(Expr::variable(s, "x")), false).unwrap())
            .unwrap();
        // required after optional
        let err = params.push(Parameter::required(s, "c"));
        assert!(matches!(err, Err(CompilerError::Argument { .. })));

        // default on a rest parameter
        let bad = Parameter::new(s, "rest", Some(Expr::variable(s, "x")), true);
        assert!(bad.is_err());

        // two rest parameters
        let mut params = ParameterList::new();
        params
            .push(Parameter::new(s, "rest", None, true).unwrap())
            .unwrap();
        let err = params.push(Parameter::new(s, "more", None, true).unwrap());
        assert!(matches!(err, Err(CompilerError::Argument { .. })));
    }

    #[test]
    fn test_textual_born_delayed() {
        let expr = Expr::textual(span(), TextualKind::Dimension, "10px");
        assert!(expr.flags.is_delayed);
        assert!(!expr.flags.is_expanded);
    }

    #[test]
    fn test_set_delayed_propagates_through_binary() {
        let s = span();
        let mut expr = Expr::new(
            s,
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::variable(s, "a")),
                right: Box::new(Expr::variable(s, "b")),
            },
        );
        expr.set_delayed(true);
        if let ExprKind::Binary { left, right, .. } = &expr.kind {
            assert!(left.flags.is_delayed);
            assert!(right.flags.is_delayed);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_expr_css_text() {
        let s = span();
        let call = Expr::new(
            s,
            ExprKind::FunctionCall {
                name: "rgba".to_string(),
                arguments: {
                    let mut args = ArgumentList::new(s);
                    args.push(Argument::positional(
                        s,
                        Expr::literal(Value::number(s, 0.0)),
                    ));
                    args.push(Argument::positional(
                        s,
                        Expr::literal(Value::number(s, 0.5)),
                    ));
                    args
                },
            },
        );
        assert_eq!(call.to_css_string(false, 5), "rgba(0, 0.5)");
        assert_eq!(call.to_css_string(true, 5), "rgba(0,.5)");
    }
}

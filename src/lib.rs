//! stylc — semantic core of the styl stylesheet compiler
//!
//! The styl language is a CSS superset with variables, nested rules,
//! mixins, functions, control directives and selector inheritance via
//! `@extend`. This crate is the semantic core shared by the frontends:
//! the abstract syntax representation and the algorithms that operate on
//! it end-to-end.
//!
//! # Features
//!
//! - Arena-backed statement tree with typed handles and span tracking
//! - Value model with structural equality and stable hashing
//! - Selector model with specificity and two equality modes
//! - Selector algebra: parentize, unify, superselector
//! - `@extend` propagation over a subset map with cycle provenance
//! - V3 source-map construction with Base64-VLQ mappings
//!
//! The lexer/parser, the expression evaluator and the CSS pretty-printer
//! are external collaborators: the parser produces this AST, the evaluator
//! reduces expressions to values, and the emitter walks the resolved tree
//! pushing mappings into an [`source_map::OutputBuffer`].
//!
//! # Example
//!
//! ```
//! use stylc::position::SourceSpan;
//! use stylc::selector::{Complex, Compound, SelectorList, SimpleSelector};
//! use stylc::selector_ops::parentize;
//!
//! let span = SourceSpan::synthetic();
//! let parent = SelectorList::of(
//!     span,
//!     vec![Complex::unit(
//!         span,
//!         Compound::of(span, vec![SimpleSelector::type_selector(span, "a")]),
//!     )],
//! );
//! let child = SelectorList::of(
//!     span,
//!     vec![Complex::unit(
//!         span,
//!         Compound::of(span, vec![SimpleSelector::type_selector(span, "b")]),
//!     )],
//! );
//! let nested = parentize(&child, Some(&parent)).unwrap();
//! assert_eq!(nested.to_string(), "a b");
//! ```
//!
//! # Processing pipeline
//!
//! 1. The parser allocates statements into a [`arena::StatementArena`]
//! 2. The evaluator reduces expressions, collecting `@extend` pairs
//! 3. [`extend::extend`] augments rule selector lists and drops
//!    placeholder-only alternatives
//! 4. The emitter writes CSS through [`source_map::OutputBuffer`], which
//!    accumulates the V3 source map

pub mod arena;
pub mod ast;
pub mod context;
pub mod error;
pub mod extend;
pub mod position;
pub mod selector;
pub mod selector_ops;
pub mod source_map;
pub mod value;

// Re-export commonly used types and functions
pub use arena::{EnvId, StatementArena, StatementId};
pub use ast::{
    Argument, ArgumentList, AtRootExpr, Block, Definition, DefinitionKind, Expr, ExprKind,
    Parameter, ParameterList, Statement, StatementKind,
};
pub use context::{CompilerOptions, Context, Diagnostic, DiagnosticKind, SourceFile};
pub use error::{CompilerError, Result};
pub use extend::{extend, Extender, Extension, SubsetMap};
pub use position::{Offset, Position, SourceSpan};
pub use selector::{Combinator, Complex, Compound, SelectorList, SimpleKind, SimpleSelector};
pub use selector_ops::{
    complex_is_superselector, compound_minus, is_superselector, naive_trim, parentize, unify,
    unify_complex, unify_compound,
};
pub use source_map::{Mapping, OutputBuffer, SourceMap};
pub use value::{
    Color, ExprFlags, ListSeparator, Number, QuoteMark, StringValue, Value, ValueKind, ValueMap,
};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_metadata() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "stylc");
        assert!(!DESCRIPTION.is_empty());
    }
}

//! Error types for the stylc semantic core

use crate::position::SourceSpan;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CompilerError {
    #[error("Selector error at {span}: {message}")]
    Selector { span: SourceSpan, message: String },

    #[error("Extend error at {span}: {message}")]
    Extend { span: SourceSpan, message: String },

    #[error("Argument error at {span}: {message}")]
    Argument { span: SourceSpan, message: String },

    #[error("Map error at {span}: {message}")]
    Map { span: SourceSpan, message: String },

    #[error("Value error at {span}: {message}")]
    Value { span: SourceSpan, message: String },

    #[error("Source map error: {message}")]
    SourceMap { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn selector(span: SourceSpan, message: impl Into<String>) -> Self {
        Self::Selector {
            span,
            message: message.into(),
        }
    }

    pub fn extend(span: SourceSpan, message: impl Into<String>) -> Self {
        Self::Extend {
            span,
            message: message.into(),
        }
    }

    pub fn argument(span: SourceSpan, message: impl Into<String>) -> Self {
        Self::Argument {
            span,
            message: message.into(),
        }
    }

    pub fn map(span: SourceSpan, message: impl Into<String>) -> Self {
        Self::Map {
            span,
            message: message.into(),
        }
    }

    pub fn value(span: SourceSpan, message: impl Into<String>) -> Self {
        Self::Value {
            span,
            message: message.into(),
        }
    }

    pub fn source_map(message: impl Into<String>) -> Self {
        Self::SourceMap {
            message: message.into(),
        }
    }

    /// Span the error originated from, when it carries one.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::Selector { span, .. }
            | Self::Extend { span, .. }
            | Self::Argument { span, .. }
            | Self::Map { span, .. }
            | Self::Value { span, .. } => Some(*span),
            Self::SourceMap { .. } => None,
        }
    }
}

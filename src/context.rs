//! Compilation context
//!
//! One `Context` exists per compilation. It owns the include table that file
//! indices point into, the compiler options, and the buffered diagnostics
//! produced while evaluating `@warn`/`@debug` statements and custom warning
//! values. There are no globals; every operation that allocates or consults
//! the include table receives the context explicitly.

use crate::position::SourceSpan;

/// One entry of the include table.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

/// Compilation options and settings.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Number of fractional digits kept when stringifying numbers
    pub precision: usize,

    /// Emit compressed output (affects canonical value text)
    pub compressed: bool,

    /// Embed full source contents into the source map
    pub source_map_contents: bool,

    /// Pass-through `sourceRoot` for the source map, empty to omit
    pub source_map_root: String,

    /// Value of the source map's `file` key
    pub source_map_file: String,

    /// Treat an `@extend` that matches no rule as a fatal error
    /// instead of a warning
    pub strict_extend: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            precision: 5,
            compressed: false,
            source_map_contents: false,
            source_map_root: String::new(),
            source_map_file: "stdin".to_string(),
            strict_extend: false,
        }
    }
}

/// Severity of a buffered diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Warning,
    Debug,
}

/// A diagnostic buffered for the host's sink.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: SourceSpan,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Context {
    pub options: CompilerOptions,
    files: Vec<SourceFile>,
    diagnostics: Vec<Diagnostic>,
}

impl Context {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Register a source file and return its index in the include table.
    pub fn add_file(&mut self, path: impl Into<String>, contents: impl Into<String>) -> usize {
        let index = self.files.len();
        self.files.push(SourceFile {
            path: path.into(),
            contents: contents.into(),
        });
        index
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn file_path(&self, index: usize) -> Option<&str> {
        self.files.get(index).map(|f| f.path.as_str())
    }

    pub fn file_contents(&self, index: usize) -> Option<&str> {
        self.files.get(index).map(|f| f.contents.as_str())
    }

    /// Buffer a warning for the host and mirror it to the log facade.
    pub fn warn(&mut self, span: SourceSpan, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", span.position, message);
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::Warning,
            span,
            message,
        });
    }

    /// Buffer a `@debug` message for the host.
    pub fn debug(&mut self, span: SourceSpan, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}: {}", span.position, message);
        self.diagnostics.push(Diagnostic {
            kind: DiagnosticKind::Debug,
            span,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Hand the buffered diagnostics to the host, clearing the buffer.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

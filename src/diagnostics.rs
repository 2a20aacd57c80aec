//! Recoverable problems found while loading or querying a [`Document`](crate::Document).
//!
//! The document never logs directly. It hands every event to a [`Diagnostics`] sink, which by
//! default is [`TracingDiagnostics`]. Any `Fn(&Diagnostic)` closure is also a sink.

use std::fmt;

/// A single warning, with the file and line it came from when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub(crate) fn at_line(file: &str, line: usize, kind: DiagnosticKind) -> Self {
        Self {
            file: Some(file.to_owned()),
            line: Some(line),
            kind,
        }
    }

    pub(crate) fn detached(kind: DiagnosticKind) -> Self {
        Self {
            file: None,
            line: None,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}: {}", self.kind),
            (Some(file), None) => write!(f, "{file}: {}", self.kind),
            _ => fmt::Display::fmt(&self.kind, f),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticKind {
    #[error("section header is missing `]`")]
    MissingCloseBracket,
    #[error("key-value line is missing `=`")]
    MissingEquals,
    #[error("duplicate section [{name}] ignored")]
    DuplicateSection { name: String },
    #[error("duplicate key {key:?} in section [{section}] ignored")]
    DuplicateKey { section: String, key: String },
    #[error("key appears before any section")]
    KeyBeforeSection,
    #[error("no value for {section}.{key}")]
    MissingValue { section: String, key: String },
}

/// Receives warnings from a document.
pub trait Diagnostics {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> Diagnostics for F
where
    F: Fn(&Diagnostic),
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            file = diagnostic.file.as_deref(),
            line = diagnostic.line,
            "{}",
            diagnostic.kind
        );
    }
}

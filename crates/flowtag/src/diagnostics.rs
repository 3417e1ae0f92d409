//! Row-level diagnostics.
//!
//! Malformed lines are skipped, never fatal. Each skipped line produces a
//! [`Diagnostic`] that is handed to a caller-supplied [`DiagnosticSink`]:
//! the binary logs them via [`TracingSink`], tests collect them in a `Vec`.

use std::fmt;
use tracing::warn;

/// Which input a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    LookupTable,
    FlowLog,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::LookupTable => write!(f, "lookup table"),
            InputKind::FlowLog => write!(f, "flow log"),
        }
    }
}

/// Why a line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Fewer fields than the input layout requires.
    TooFewFields { found: usize, expected: usize },
    /// The destination port field is not a valid port number.
    InvalidPort { value: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::TooFewFields { found, expected } => {
                write!(f, "expected at least {} fields, found {}", expected, found)
            }
            DiagnosticKind::InvalidPort { value } => write!(f, "invalid port '{}'", value),
        }
    }
}

/// One skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub input: InputKind,
    /// 1-based line number in the input, header included.
    pub line_number: usize,
    pub kind: DiagnosticKind,
    /// The offending line, trimmed.
    pub line: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping malformed {} line {}: {} ({})",
            self.input, self.line_number, self.line, self.kind
        )
    }
}

/// Receives diagnostics for skipped lines.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Logs every diagnostic at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(
            input = %diagnostic.input,
            line = diagnostic.line_number,
            "{}",
            diagnostic
        );
    }
}

/// Discards diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

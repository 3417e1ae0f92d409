//! Error types for flowtag operations.
//!
//! Only resource-level failures are represented here. Malformed input rows
//! are never errors; they are reported through a
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) and skipped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flowtag operations.
pub type Result<T> = std::result::Result<T, FlowTagError>;

/// Fatal errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum FlowTagError {
    /// An input or output file could not be opened.
    #[error("Could not open {}: {source}", .path.display())]
    Open {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Reading from an input stream failed part way through.
    #[error("Error reading {input}: {source}")]
    Read {
        /// Human readable name of the input (file path or stream name).
        input: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Writing the report failed.
    #[error("Error writing results to {output}: {source}")]
    Write {
        /// Human readable name of the output (file path or stream name).
        output: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FlowTagError {
    /// Creates an open error for `path`.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a read error for `input`.
    pub fn read(input: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            input: input.into(),
            source,
        }
    }

    /// Creates a write error for `output`.
    pub fn write(output: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            output: output.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if the error was caused by a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            FlowTagError::Open { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

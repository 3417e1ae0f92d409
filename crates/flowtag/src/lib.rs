//! flowtag - flow log tagging and aggregation
//!
//! flowtag matches each flow log record's destination port and protocol
//! against a lookup table of `(port, protocol) -> tag` rules and reports how
//! many records fell under each tag and each port/protocol pair.
//!
//! Key features:
//! - Case-insensitive protocol matching, IANA number to name resolution
//! - Many tags per rule; a record counts once for every matched tag
//! - Malformed rows are skipped and reported, never fatal
//! - Deterministic, sorted report output
//!
//! # Example
//!
//! ```ignore
//! use flowtag::{FlowLogAnalyzer, FlowTagConfig, TracingSink};
//!
//! let mut sink = TracingSink;
//! let analyzer = FlowLogAnalyzer::from_lookup_file("lookup.csv", FlowTagConfig::default(), &mut sink)?;
//! let result = analyzer.analyze_file("flow.log", &mut sink)?;
//! analyzer.write_results("output.txt", &result)?;
//! ```

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod protocol;
pub mod report;
pub mod rule_index;
pub mod tables;
pub mod types;

pub use analyzer::FlowLogAnalyzer;
pub use classifier::Classifier;
pub use config::{FlowLogLayout, FlowTagConfig};
pub use diagnostics::{
    Diagnostic, DiagnosticKind, DiagnosticSink, InputKind, NullSink, TracingSink,
};
pub use error::{FlowTagError, Result};
pub use protocol::resolve_protocol;
pub use report::Report;
pub use rule_index::{build_index, load_index, RuleIndex};
pub use types::{
    Classification, ClassificationStats, PortProtocolCounts, RuleKey, TagCounts, TagOutcome,
    TagSet,
};

//! Flow log classification.
//!
//! A flow log record is a whitespace separated line, e.g. a VPC flow log v2
//! record:
//!
//! ```text
//! 2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000 1620140761 1620140821 ACCEPT OK
//! ```
//!
//! The destination port and protocol positions come from [`FlowLogLayout`].
//! Each record is counted once per (port, protocol) pair and once per
//! matched tag, or once as untagged.

use crate::config::FlowLogLayout;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, InputKind};
use crate::error::{FlowTagError, Result};
use crate::protocol::resolve_protocol;
use crate::rule_index::RuleIndex;
use crate::types::{Classification, Port, RuleKey};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Streams flow log records against a rule index.
#[derive(Debug)]
pub struct Classifier<'a> {
    index: &'a RuleIndex,
    layout: FlowLogLayout,
}

impl<'a> Classifier<'a> {
    pub fn new(index: &'a RuleIndex) -> Self {
        Self::with_layout(index, FlowLogLayout::default())
    }

    pub fn with_layout(index: &'a RuleIndex, layout: FlowLogLayout) -> Self {
        Self { index, layout }
    }

    /// Classify a flow log file.
    pub fn classify_file(
        &self,
        path: impl AsRef<Path>,
        has_header: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Classification> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FlowTagError::open(path, e))?;
        info!("Processing flow log: {}", path.display());
        self.classify(
            BufReader::new(file),
            &path.display().to_string(),
            has_header,
            sink,
        )
    }

    /// Classify every record read from `reader`.
    ///
    /// When `has_header` is set the first line is discarded. Malformed lines
    /// are reported to `sink` and contribute to no count.
    pub fn classify<R: BufRead>(
        &self,
        reader: R,
        input: &str,
        has_header: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Classification> {
        let mut result = Classification::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| FlowTagError::read(input, e))?;
            if has_header && idx == 0 {
                continue;
            }
            result.stats.lines_read += 1;

            let key = match self.parse_record(&line) {
                Ok(key) => key,
                Err(kind) => {
                    result.stats.skipped += 1;
                    sink.report(Diagnostic {
                        input: InputKind::FlowLog,
                        line_number: idx + 1,
                        kind,
                        line: line.trim().to_string(),
                    });
                    continue;
                }
            };

            result.tag_counts.record(self.index.lookup(&key));
            result.port_protocol_counts.increment(key);
            result.stats.records += 1;
        }

        info!(
            "Processed flow log {}: {} records, {} skipped, {} port/protocol pairs",
            input,
            result.stats.records,
            result.stats.skipped,
            result.port_protocol_counts.len()
        );

        Ok(result)
    }

    /// Extract the normalized (port, protocol) key from one record.
    fn parse_record(&self, line: &str) -> std::result::Result<RuleKey, DiagnosticKind> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < self.layout.min_fields {
            return Err(DiagnosticKind::TooFewFields {
                found: fields.len(),
                expected: self.layout.min_fields,
            });
        }

        let raw_port = field_at(&fields, self.layout.dst_port_field)?;
        let port: Port = raw_port.parse().map_err(|_| DiagnosticKind::InvalidPort {
            value: raw_port.to_string(),
        })?;

        let protocol = resolve_protocol(field_at(&fields, self.layout.protocol_field)?);
        Ok(RuleKey { port, protocol })
    }
}

/// Field at a 0-based position, or a short-record diagnostic.
fn field_at<'l>(
    fields: &[&'l str],
    position: usize,
) -> std::result::Result<&'l str, DiagnosticKind> {
    fields
        .get(position)
        .copied()
        .ok_or(DiagnosticKind::TooFewFields {
            found: fields.len(),
            expected: position + 1,
        })
}

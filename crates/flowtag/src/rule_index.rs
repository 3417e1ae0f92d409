//! Lookup table parser and rule index.
//!
//! File format (comma separated, header optional):
//!
//! ```text
//! dstport,protocol,tag
//! 25,tcp,sv_P1
//! 443,TCP,sv_P2
//! 443,tcp,web
//! ```
//!
//! Protocol names are matched case-insensitively. Rows that share a
//! (port, protocol) key contribute to one tag set.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, InputKind};
use crate::error::{FlowTagError, Result};
use crate::tables::{lookup_fields, LOOKUP_DELIMITER, LOOKUP_MIN_FIELDS};
use crate::types::{Port, RuleKey, TagOutcome, TagSet};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// (port, protocol) → tags, built once from a lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleIndex {
    rules: HashMap<RuleKey, TagSet>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` to the set for `key`, creating the set on first use.
    pub fn insert(&mut self, key: RuleKey, tag: impl Into<String>) {
        self.rules.entry(key).or_default().insert(tag.into());
    }

    /// Tags for a port and protocol name (any case).
    pub fn get(&self, port: Port, protocol: &str) -> Option<&TagSet> {
        self.rules.get(&RuleKey::new(port, protocol))
    }

    /// Classifies a normalized key.
    pub fn lookup(&self, key: &RuleKey) -> TagOutcome<'_> {
        match self.rules.get(key) {
            Some(tags) if !tags.is_empty() => TagOutcome::Tagged(tags),
            _ => TagOutcome::Untagged,
        }
    }

    pub fn contains_key(&self, port: Port, protocol: &str) -> bool {
        self.get(port, protocol).is_some()
    }

    /// Number of distinct (port, protocol) keys.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &TagSet)> {
        self.rules.iter()
    }
}

/// Build a rule index from a lookup table file.
pub fn load_index(
    path: impl AsRef<Path>,
    has_header: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<RuleIndex> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FlowTagError::open(path, e))?;
    info!("Loading lookup table: {}", path.display());
    build_index(
        BufReader::new(file),
        &path.display().to_string(),
        has_header,
        sink,
    )
}

/// Build a rule index from any buffered reader.
///
/// When `has_header` is set the first line is discarded without inspection.
/// Malformed rows are reported to `sink` and skipped; only a failing reader
/// aborts the build.
pub fn build_index<R: BufRead>(
    reader: R,
    input: &str,
    has_header: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<RuleIndex> {
    let mut index = RuleIndex::new();
    let mut rows = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FlowTagError::read(input, e))?;
        if has_header && idx == 0 {
            continue;
        }

        match parse_rule(&line) {
            Ok((key, tag)) => {
                debug!("Loaded rule {}/{} -> {}", key.port, key.protocol, tag);
                index.insert(key, tag);
                rows += 1;
            }
            Err(kind) => sink.report(Diagnostic {
                input: InputKind::LookupTable,
                line_number: idx + 1,
                kind,
                line: line.trim().to_string(),
            }),
        }
    }

    info!(
        "Parsed lookup table {}: {} rules, {} port/protocol keys",
        input,
        rows,
        index.len()
    );

    Ok(index)
}

/// Parse one lookup table row into its key and tag.
fn parse_rule(line: &str) -> std::result::Result<(RuleKey, String), DiagnosticKind> {
    let fields: Vec<&str> = line
        .trim()
        .split(LOOKUP_DELIMITER)
        .map(str::trim)
        .collect();

    if fields.len() < LOOKUP_MIN_FIELDS {
        return Err(DiagnosticKind::TooFewFields {
            found: fields.len(),
            expected: LOOKUP_MIN_FIELDS,
        });
    }

    let raw_port = fields[lookup_fields::DST_PORT];
    let port: Port = raw_port.parse().map_err(|_| DiagnosticKind::InvalidPort {
        value: raw_port.to_string(),
    })?;

    let key = RuleKey::new(port, fields[lookup_fields::PROTOCOL]);
    Ok((key, fields[lookup_fields::TAG].to_string()))
}

//! Report rendering.
//!
//! Output format:
//!
//! ```text
//! Tag Counts:
//! Tag,Count
//! Untagged,9
//! sv_P2,1
//!
//! Port/Protocol Combination Counts:
//! Port,Protocol,Count
//! 23,tcp,1
//! 25,tcp,1
//! ```
//!
//! Tag rows are sorted by label, port/protocol rows by numeric port with
//! ties kept in first-seen order.

use crate::error::{FlowTagError, Result};
use crate::tables::{
    PORT_PROTOCOL_SECTION_HEADER, PORT_PROTOCOL_SECTION_TITLE, TAG_SECTION_HEADER,
    TAG_SECTION_TITLE,
};
use crate::types::{Classification, PortProtocolCounts, TagCounts};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Tag rows as (label, count), sorted by label.
///
/// The untagged bucket appears under `untagged_label` only when non-zero. If
/// a real tag carries the same label, the real tag row comes first.
pub fn tag_rows<'a>(counts: &'a TagCounts, untagged_label: &'a str) -> Vec<(&'a str, u64)> {
    let mut rows: Vec<(&str, u64)> = counts.tagged().collect();
    if counts.untagged() > 0 {
        let pos = rows.partition_point(|(tag, _)| *tag <= untagged_label);
        rows.insert(pos, (untagged_label, counts.untagged()));
    }
    rows
}

/// Both report sections, formatted through `Display`.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub tag_counts: &'a TagCounts,
    pub port_protocol_counts: &'a PortProtocolCounts,
    pub untagged_label: &'a str,
}

impl<'a> Report<'a> {
    pub fn new(classification: &'a Classification, untagged_label: &'a str) -> Self {
        Self {
            tag_counts: &classification.tag_counts,
            port_protocol_counts: &classification.port_protocol_counts,
            untagged_label,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TAG_SECTION_TITLE)?;
        writeln!(f, "{}", TAG_SECTION_HEADER)?;
        for (tag, count) in tag_rows(self.tag_counts, self.untagged_label) {
            writeln!(f, "{},{}", tag, count)?;
        }

        writeln!(f)?;

        writeln!(f, "{}", PORT_PROTOCOL_SECTION_TITLE)?;
        writeln!(f, "{}", PORT_PROTOCOL_SECTION_HEADER)?;
        for (key, count) in self.port_protocol_counts.sorted_by_port() {
            writeln!(f, "{},{},{}", key.port, key.protocol, count)?;
        }

        Ok(())
    }
}

/// Writes the two report sections to `writer`.
pub fn write_report<W: Write>(writer: &mut W, report: &Report<'_>) -> io::Result<()> {
    write!(writer, "{}", report)?;
    writer.flush()
}

/// Renders the report into a string.
pub fn render(classification: &Classification, untagged_label: &str) -> String {
    Report::new(classification, untagged_label).to_string()
}

/// Writes the report to a file, replacing any existing content.
pub fn write_report_file(
    path: impl AsRef<Path>,
    classification: &Classification,
    untagged_label: &str,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FlowTagError::open(path, e))?;
    let mut writer = BufWriter::new(file);

    write_report(&mut writer, &Report::new(classification, untagged_label))
        .map_err(|e| FlowTagError::write(path.display().to_string(), e))?;

    info!("Results written to {}", path.display());
    Ok(())
}

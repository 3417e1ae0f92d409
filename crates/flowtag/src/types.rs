//! Flowtag type definitions

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Destination port as found in flow logs and lookup tables.
pub type Port = u16;

/// Set of tags attached to one (port, protocol) rule.
pub type TagSet = BTreeSet<String>;

/// Matching key: destination port plus normalized (lowercase) protocol name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    pub port: Port,
    pub protocol: String,
}

impl RuleKey {
    /// Creates a key, lowercasing the protocol.
    pub fn new(port: Port, protocol: impl AsRef<str>) -> Self {
        Self {
            port,
            protocol: protocol.as_ref().to_lowercase(),
        }
    }
}

/// Outcome of matching one flow-log record against the rule index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome<'a> {
    /// At least one rule matched; every tag in the set applies.
    Tagged(&'a TagSet),
    /// No rule (or an empty rule) for this port/protocol.
    Untagged,
}

/// Per-tag record counts.
///
/// Untagged records are kept in their own counter so a real tag named
/// `"Untagged"` never merges with the sentinel bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCounts {
    tagged: BTreeMap<String, u64>,
    untagged: u64,
}

impl TagCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one record's outcome, fanning out to every matched tag.
    pub fn record(&mut self, outcome: TagOutcome<'_>) {
        match outcome {
            TagOutcome::Tagged(tags) => {
                for tag in tags {
                    *self.tagged.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            TagOutcome::Untagged => self.untagged += 1,
        }
    }

    /// Count for a real tag.
    pub fn get(&self, tag: &str) -> u64 {
        self.tagged.get(tag).copied().unwrap_or(0)
    }

    pub fn untagged(&self) -> u64 {
        self.untagged
    }

    /// Real tags in ascending lexical order.
    pub fn tagged(&self) -> impl Iterator<Item = (&str, u64)> {
        self.tagged.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.tagged.is_empty() && self.untagged == 0
    }
}

/// Record counts per (port, protocol) pair.
///
/// Pairs remember the order in which they were first seen so that the report
/// can break ties between equal ports deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortProtocolCounts {
    positions: HashMap<RuleKey, usize>,
    entries: Vec<(RuleKey, u64)>,
}

impl PortProtocolCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: RuleKey) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn get(&self, port: Port, protocol: &str) -> u64 {
        self.positions
            .get(&RuleKey::new(port, protocol))
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Pairs sorted by ascending port; equal ports keep first-seen order.
    pub fn sorted_by_port(&self) -> Vec<(&RuleKey, u64)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by_key(|(key, _)| key.port);
        rows
    }
}

/// Line accounting for one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Data lines read, excluding a skipped header.
    pub lines_read: u64,
    /// Records that were counted.
    pub records: u64,
    /// Lines dropped as malformed.
    pub skipped: u64,
}

/// Aggregated result of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub tag_counts: TagCounts,
    pub port_protocol_counts: PortProtocolCounts,
    pub stats: ClassificationStats,
}

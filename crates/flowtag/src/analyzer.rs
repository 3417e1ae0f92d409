//! Flow log analyzer.
//!
//! Owns the rule index for one run. The lookup table is loaded at
//! construction; each `analyze_*` call is an independent classification pass
//! against it.

use crate::classifier::Classifier;
use crate::config::FlowTagConfig;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::report;
use crate::rule_index::{build_index, load_index, RuleIndex};
use crate::types::Classification;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug)]
pub struct FlowLogAnalyzer {
    config: FlowTagConfig,
    index: RuleIndex,
}

impl FlowLogAnalyzer {
    /// Loads the lookup table at `path`.
    pub fn from_lookup_file(
        path: impl AsRef<Path>,
        config: FlowTagConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self> {
        config.validate()?;
        let index = load_index(path, config.has_headers, sink)?;
        Ok(Self { config, index })
    }

    /// Loads the lookup table from an already opened reader.
    pub fn from_lookup_reader<R: BufRead>(
        reader: R,
        config: FlowTagConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self> {
        config.validate()?;
        let index = build_index(reader, "lookup table", config.has_headers, sink)?;
        Ok(Self { config, index })
    }

    /// Uses a prebuilt index.
    pub fn with_index(index: RuleIndex, config: FlowTagConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, index })
    }

    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    pub fn config(&self) -> &FlowTagConfig {
        &self.config
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier::with_layout(&self.index, self.config.flow_log.clone())
    }

    /// Classifies the flow log at `path`.
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Classification> {
        self.classifier()
            .classify_file(path, self.config.has_headers, sink)
    }

    /// Classifies a flow log read from `reader`.
    pub fn analyze_reader<R: BufRead>(
        &self,
        reader: R,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Classification> {
        self.classifier()
            .classify(reader, "flow log", self.config.has_headers, sink)
    }

    /// Renders a classification with the configured untagged label.
    pub fn render(&self, classification: &Classification) -> String {
        report::render(classification, &self.config.untagged_label)
    }

    /// Writes a classification report to `path`.
    pub fn write_results(
        &self,
        path: impl AsRef<Path>,
        classification: &Classification,
    ) -> Result<()> {
        report::write_report_file(path, classification, &self.config.untagged_label)
    }
}

//! Configuration file support for flowtag
//!
//! Loads and validates flowtag configuration from TOML files.
//! Default location: /etc/flowtag/flowtag.toml

use crate::error::{FlowTagError, Result};
use crate::tables::{flow_log_fields, DEFAULT_CONFIG_FILE, FLOW_LOG_MIN_FIELDS, UNTAGGED_LABEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Flow log record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowLogLayout {
    /// Minimum number of whitespace separated fields in a record
    #[serde(default = "default_min_fields")]
    pub min_fields: usize,

    /// 0-based position of the destination port
    #[serde(default = "default_dst_port_field")]
    pub dst_port_field: usize,

    /// 0-based position of the protocol number or name
    #[serde(default = "default_protocol_field")]
    pub protocol_field: usize,
}

/// Complete flowtag configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTagConfig {
    /// Skip the first line of both the lookup table and the flow log
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,

    /// Report label for records with no matching rule
    #[serde(default = "default_untagged_label")]
    pub untagged_label: String,

    /// Flow log record layout
    #[serde(default)]
    pub flow_log: FlowLogLayout,
}

// Default functions
fn default_has_headers() -> bool {
    true
}

fn default_untagged_label() -> String {
    UNTAGGED_LABEL.to_string()
}

fn default_min_fields() -> usize {
    FLOW_LOG_MIN_FIELDS
}

fn default_dst_port_field() -> usize {
    flow_log_fields::DST_PORT
}

fn default_protocol_field() -> usize {
    flow_log_fields::PROTOCOL
}

impl Default for FlowLogLayout {
    fn default() -> Self {
        Self {
            min_fields: default_min_fields(),
            dst_port_field: default_dst_port_field(),
            protocol_field: default_protocol_field(),
        }
    }
}

impl Default for FlowTagConfig {
    fn default() -> Self {
        Self {
            has_headers: default_has_headers(),
            untagged_label: default_untagged_label(),
            flow_log: FlowLogLayout::default(),
        }
    }
}

impl FlowTagConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).map_err(|e| {
                FlowTagError::configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(FlowTagError::read(path.display().to_string(), e)),
        }
    }

    /// Load an explicitly requested file; a missing file is an error
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| FlowTagError::open(path.to_path_buf(), e))?;
        Self::from_toml(&content).map_err(|e| {
            FlowTagError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load from default location or defaults
    pub fn load_default() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_FILE)
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Builder-style override of the header flag
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.untagged_label.trim().is_empty() {
            return Err(FlowTagError::configuration(
                "untagged_label must not be empty",
            ));
        }

        let layout = &self.flow_log;
        if layout.dst_port_field >= layout.min_fields {
            return Err(FlowTagError::configuration(format!(
                "dst_port_field ({}) must be below min_fields ({})",
                layout.dst_port_field, layout.min_fields
            )));
        }

        if layout.protocol_field >= layout.min_fields {
            return Err(FlowTagError::configuration(format!(
                "protocol_field ({}) must be below min_fields ({})",
                layout.protocol_field, layout.min_fields
            )));
        }

        if layout.dst_port_field == layout.protocol_field {
            return Err(FlowTagError::configuration(
                "dst_port_field and protocol_field must differ",
            ));
        }

        Ok(())
    }
}

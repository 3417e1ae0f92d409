//! Input layout and report constants

// Lookup table layout (comma separated)
pub const LOOKUP_DELIMITER: char = ',';
pub const LOOKUP_MIN_FIELDS: usize = 3;

pub mod lookup_fields {
    pub const DST_PORT: usize = 0;
    pub const PROTOCOL: usize = 1;
    pub const TAG: usize = 2;
}

// Flow log layout (whitespace separated, 0-based positions)
pub const FLOW_LOG_MIN_FIELDS: usize = 14;

pub mod flow_log_fields {
    pub const DST_PORT: usize = 6;
    pub const PROTOCOL: usize = 7;
}

// Report sections
pub const TAG_SECTION_TITLE: &str = "Tag Counts:";
pub const TAG_SECTION_HEADER: &str = "Tag,Count";
pub const PORT_PROTOCOL_SECTION_TITLE: &str = "Port/Protocol Combination Counts:";
pub const PORT_PROTOCOL_SECTION_HEADER: &str = "Port,Protocol,Count";

// Sentinel label for records without a matching rule
pub const UNTAGGED_LABEL: &str = "Untagged";

// Default configuration file path
pub const DEFAULT_CONFIG_FILE: &str = "/etc/flowtag/flowtag.toml";

//! End-to-end tests: lookup table and flow log files on disk through to the
//! written report.

use flowtag::{
    Diagnostic, DiagnosticKind, FlowLogAnalyzer, FlowTagConfig, FlowTagError, InputKind,
    NullSink,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const LOOKUP_TABLE: &str = "\
dstport,protocol,tag
25,tcp,sv_P1
68,udp,sv_P2
23,tcp,sv_P1
31,udp,SV_P3
443,tcp,sv_P2
22,tcp,sv_P4
3389,tcp,sv_P5
0,icmp,sv_P5
110,tcp,email
993,tcp,email
143,tcp,email
";

const FLOW_LOG: &str = "\
version account-id interface-id srcaddr dstaddr srcport dstport protocol packets bytes start end action log-status
2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-4d3c2b1a 192.168.1.100 203.0.113.101 23 49154 6 15 12000 1620140761 1620140821 REJECT OK
2 123456789012 eni-5e6f7g8h 192.168.1.101 198.51.100.3 25 49155 6 10 8000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-9h8g7f6e 172.16.0.100 203.0.113.102 110 110 6 12 9000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-7i8j9k0l 172.16.0.101 192.0.2.203 993 993 6 8 5000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-6m7n8o9p 10.0.2.200 198.51.100.4 143 143 6 18 14000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-1a2b3c4d 192.168.0.1 203.0.113.12 1024 80 6 10 5000 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-4h5i6j7k 172.16.0.2 192.0.2.146 49153 25 6 20 10000 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-1a2b3c4d 192.168.0.1 203.0.113.12 1024 25 17 10 5000 1620140661 1620140721 ACCEPT OK
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn analyze(
    lookup: &str,
    log: &str,
    config: FlowTagConfig,
) -> (FlowLogAnalyzer, flowtag::Classification, Vec<Diagnostic>) {
    let fx = Fixture::new();
    let lookup_path = fx.file("lookup_table.csv", lookup);
    let log_path = fx.file("flow_logs.txt", log);

    let mut diags: Vec<Diagnostic> = Vec::new();
    let analyzer = FlowLogAnalyzer::from_lookup_file(&lookup_path, config, &mut diags).unwrap();
    let result = analyzer.analyze_file(&log_path, &mut diags).unwrap();
    (analyzer, result, diags)
}

#[test]
fn test_full_report_written_to_file() {
    let fx = Fixture::new();
    let lookup_path = fx.file("lookup_table.csv", LOOKUP_TABLE);
    let log_path = fx.file("flow_logs.txt", FLOW_LOG);
    let output_path = fx.path("output.txt");

    let analyzer =
        FlowLogAnalyzer::from_lookup_file(&lookup_path, FlowTagConfig::default(), &mut NullSink)
            .unwrap();
    let result = analyzer.analyze_file(&log_path, &mut NullSink).unwrap();
    analyzer.write_results(&output_path, &result).unwrap();

    let expected = "\
Tag Counts:
Tag,Count
Untagged,5
email,3
sv_P1,1

Port/Protocol Combination Counts:
Port,Protocol,Count
25,tcp,1
25,udp,1
80,tcp,1
110,tcp,1
143,tcp,1
993,tcp,1
49153,tcp,1
49154,tcp,1
49155,tcp,1
";
    assert_eq!(fs::read_to_string(&output_path).unwrap(), expected);
    assert_eq!(result.stats.records, 9);
    assert_eq!(result.stats.skipped, 0);
}

#[test]
fn test_lookup_table_round_trip() {
    let fx = Fixture::new();
    let lookup_path = fx.file(
        "lookup_table.csv",
        "dstport,protocol,tag\n80,TCP,web\n443,tcp,ssl\n22,TcP,ssh",
    );
    let analyzer =
        FlowLogAnalyzer::from_lookup_file(&lookup_path, FlowTagConfig::default(), &mut NullSink)
            .unwrap();

    let mut keys: Vec<(u16, String, Vec<String>)> = analyzer
        .index()
        .iter()
        .map(|(key, tags)| (key.port, key.protocol.clone(), tags.iter().cloned().collect()))
        .collect();
    keys.sort();

    assert_eq!(
        keys,
        vec![
            (22, "tcp".to_string(), vec!["ssh".to_string()]),
            (80, "tcp".to_string(), vec!["web".to_string()]),
            (443, "tcp".to_string(), vec!["ssl".to_string()]),
        ]
    );
}

#[test]
fn test_case_insensitive_tag_matching() {
    let lookup = "dstport,protocol,tag\n80,TCP,web\n443,tcp,ssl\n22,TcP,ssh";
    let log = "\
header
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 80 6 10 5000 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 443 TCP 10 5000 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 22 tcp 10 5000 1620140661 1620140721 ACCEPT OK
";
    let (_, result, diags) = analyze(lookup, log, FlowTagConfig::default());

    assert!(diags.is_empty());
    assert_eq!(result.tag_counts.get("web"), 1);
    assert_eq!(result.tag_counts.get("ssl"), 1);
    assert_eq!(result.tag_counts.get("ssh"), 1);
    assert_eq!(result.tag_counts.untagged(), 0);
}

#[test]
fn test_untagged_scenario() {
    let lookup = "dstport,protocol,tag\n80,TCP,web\n443,tcp,ssl\n22,TcP,ssh";
    let log = "\
header
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 8080 17 10 5000 1620140661 1620140721 ACCEPT OK
";
    let (analyzer, result, _) = analyze(lookup, log, FlowTagConfig::default());

    assert_eq!(result.tag_counts.untagged(), 1);
    assert_eq!(result.tag_counts.tagged().count(), 0);
    assert_eq!(result.port_protocol_counts.get(8080, "udp"), 1);
    assert_eq!(result.port_protocol_counts.len(), 1);
    assert!(analyzer.render(&result).contains("Untagged,1\n"));
    assert!(analyzer.render(&result).contains("8080,udp,1\n"));
}

#[test]
fn test_multiple_tags_same_port_protocol() {
    let lookup = "dstport,protocol,tag\n80,tcp,web\n80,tcp,http\n80,TCP,frontend";
    let log = "\
header
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 80 6 10 5000 1620140661 1620140721 ACCEPT OK
";
    let (analyzer, result, _) = analyze(lookup, log, FlowTagConfig::default());

    assert_eq!(analyzer.index().get(80, "tcp").map(|t| t.len()), Some(3));
    assert_eq!(
        result.tag_counts.tagged().collect::<Vec<_>>(),
        vec![("frontend", 1), ("http", 1), ("web", 1)]
    );
    assert_eq!(result.tag_counts.untagged(), 0);
    assert_eq!(result.port_protocol_counts.get(80, "tcp"), 1);
}

#[test]
fn test_no_headers() {
    let lookup = "80,tcp,web\n";
    let log = "2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 80 6 10 5000 1620140661 1620140721 ACCEPT OK\n";
    let config = FlowTagConfig::default().with_headers(false);
    let (_, result, diags) = analyze(lookup, log, config);

    assert!(diags.is_empty());
    assert_eq!(result.tag_counts.get("web"), 1);
}

#[test]
fn test_malformed_lines_in_both_inputs() {
    let lookup = "dstport,protocol,tag\n80,tcp,web\nbad line\nssh,tcp,ssh\n22,tcp,ssh\n";
    let log = "\
header
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 80 6 10 5000 1620140661 1620140721 ACCEPT OK
truncated record
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 x 6 10 5000 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 22 6 10 5000 1620140661 1620140721 ACCEPT OK
";
    let (_, result, diags) = analyze(lookup, log, FlowTagConfig::default());

    assert_eq!(result.tag_counts.get("web"), 1);
    assert_eq!(result.tag_counts.get("ssh"), 1);
    assert_eq!(result.tag_counts.untagged(), 0);
    assert_eq!(result.port_protocol_counts.len(), 2);

    let summary: Vec<(InputKind, usize)> =
        diags.iter().map(|d| (d.input, d.line_number)).collect();
    assert_eq!(
        summary,
        vec![
            (InputKind::LookupTable, 3),
            (InputKind::LookupTable, 4),
            (InputKind::FlowLog, 3),
            (InputKind::FlowLog, 4),
        ]
    );
    assert_eq!(
        diags[3].kind,
        DiagnosticKind::InvalidPort {
            value: "x".to_string()
        }
    );
}

#[test]
fn test_missing_lookup_table_is_fatal() {
    let err = FlowLogAnalyzer::from_lookup_file(
        "/nonexistent/lookup_table.csv",
        FlowTagConfig::default(),
        &mut NullSink,
    )
    .unwrap_err();
    assert!(matches!(err, FlowTagError::Open { .. }));
    assert!(err.is_not_found());
}

#[test]
fn test_missing_flow_log_is_fatal() {
    let fx = Fixture::new();
    let lookup_path = fx.file("lookup_table.csv", LOOKUP_TABLE);
    let analyzer =
        FlowLogAnalyzer::from_lookup_file(&lookup_path, FlowTagConfig::default(), &mut NullSink)
            .unwrap();

    let err = analyzer
        .analyze_file(fx.path("missing.log"), &mut NullSink)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_unwritable_output_is_fatal() {
    let fx = Fixture::new();
    let lookup_path = fx.file("lookup_table.csv", LOOKUP_TABLE);
    let analyzer =
        FlowLogAnalyzer::from_lookup_file(&lookup_path, FlowTagConfig::default(), &mut NullSink)
            .unwrap();
    let result = analyzer
        .analyze_reader(FLOW_LOG.as_bytes(), &mut NullSink)
        .unwrap();

    // A directory cannot be opened as the output file
    let err = analyzer
        .write_results(fx.dir.path(), &result)
        .unwrap_err();
    assert!(matches!(err, FlowTagError::Open { .. }));
}

#[test]
fn test_config_file_drives_analysis() {
    let fx = Fixture::new();
    let config_path = fx.file(
        "flowtag.toml",
        "has_headers = false\nuntagged_label = \"unmatched\"\n",
    );
    let config = FlowTagConfig::load(&config_path).unwrap();

    let (analyzer, result, _) = analyze(
        "80,tcp,web\n",
        "2 123456789012 eni-1 10.0.0.1 10.0.0.2 1234 53 17 10 5000 1620140661 1620140721 ACCEPT OK\n",
        config,
    );
    assert_eq!(result.tag_counts.untagged(), 1);
    assert!(analyzer.render(&result).contains("unmatched,1\n"));
}

use latplot_report::data::Percentile;
use latplot_report::{parse, LatencyReport, ParseError, ReportError};
use std::io::Write;

const HEY_OUTPUT: &str = "
Summary:
  Total: 1000 requests in 10.0s
  Slowest:      0.1502 secs
  Fastest:      0.0021 secs

Latency distribution:
  50% 12.3
  90% 45.6
  95% 78.9
  99% 150.2

Requests/sec: 100.0
";

fn ranks(report: &LatencyReport) -> Vec<(f64, f64)> {
    report
        .percentiles()
        .iter()
        .map(|p| (p.rank(), p.latency_ms()))
        .collect()
}

#[test]
fn test_well_formed_report() {
    let report = parse(HEY_OUTPUT).unwrap();
    assert_eq!(
        ranks(&report),
        vec![(50.0, 12.3), (90.0, 45.6), (95.0, 78.9), (99.0, 150.2)]
    );
    assert_eq!(report.total_requests(), 1000);
    assert_eq!(report.duration_seconds(), 10.0);
    assert_eq!(report.requests_per_second(), 100.0);
}

#[test]
fn test_missing_section_is_fatal() {
    let text = "Summary:\n  Total: 1000 requests in 10.0s\nRequests/sec: 100.0\n";
    assert_eq!(parse(text), Err(ParseError::SectionNotFound));
}

#[test]
fn test_section_without_percent_lines_is_empty() {
    let text = "Latency distribution:\n  no entries\n\nRequests/sec: 5.0\n";
    let report = parse(text).unwrap();
    assert!(report.percentiles().is_empty());
    assert_eq!(report.requests_per_second(), 5.0);
}

#[test]
fn test_malformed_line_skipped() {
    let text = "Latency distribution:\n  50% abc\n  90% 45.6\nRequests/sec: 1\n";
    let report = parse(text).unwrap();
    assert_eq!(ranks(&report), vec![(90.0, 45.6)]);
}

#[test]
fn test_summary_defaults_to_zero() {
    let text = "Latency distribution:\n  50% 1.5\nRequests/sec:";
    let report = parse(text).unwrap();
    assert_eq!(report.total_requests(), 0);
    assert_eq!(report.duration_seconds(), 0.0);
    assert_eq!(report.requests_per_second(), 0.0);
}

#[test]
fn test_duplicate_rank_last_occurrence_wins() {
    let text = "Latency distribution:\n  50% 1.0\n  50% 2.0\nRequests/sec: 1\n";
    let report = parse(text).unwrap();
    assert_eq!(ranks(&report), vec![(50.0, 2.0)]);
}

#[test]
fn test_fractional_ranks_sorted() {
    // Out-of-order source lines come back in ascending rank order.
    let text = "Latency distribution:\n  99.9% 300\n  10% 2\n  99% 150\nRequests/sec: 1\n";
    let report = parse(text).unwrap();
    assert_eq!(ranks(&report), vec![(10.0, 2.0), (99.0, 150.0), (99.9, 300.0)]);
}

#[test]
fn test_summary_fields_scanned_outside_section() {
    // Requests/sec closes the section, and is also read as the throughput.
    let text = "Total: 42 requests\nLatency distribution:\n  50% 1\nRequests/sec: 8.5\nDone in 5.25s\n";
    let report = parse(text).unwrap();
    assert_eq!(report.total_requests(), 42);
    assert_eq!(report.duration_seconds(), 5.25);
    assert_eq!(report.requests_per_second(), 8.5);
}

#[test]
fn test_canonical_latency_defaults() {
    let text = "Latency distribution:\n  50% 12.3\nRequests/sec: 1\n";
    let report = parse(text).unwrap();
    assert_eq!(report.canonical_latency(50.0), 12.3);
    assert_eq!(report.canonical_latency(99.0), 0.0);
    let canonical: Vec<Percentile> = report.percentiles().canonical().collect();
    assert_eq!(canonical, vec![Percentile::new(50.0, 12.3)]);
}

#[test]
fn test_summary_lines() {
    let report = parse(HEY_OUTPUT).unwrap();
    assert_eq!(
        report.summary_lines(),
        vec![
            "Load Test Summary",
            "Total Requests: 1,000",
            "Duration: 10.0s",
            "Requests/sec: 100.0",
            "",
            "Key Latencies:",
            "P50: 12.3ms",
            "P90: 45.6ms",
            "P95: 78.9ms",
            "P99: 150.2ms",
        ]
    );
}

#[test]
fn test_display() {
    let report = parse(HEY_OUTPUT).unwrap();
    assert_eq!(
        report.to_string(),
        "1,000 requests in 10.0s (100.0 req/s), 4 percentiles \
         P50: 12.3ms P90: 45.6ms P95: 78.9ms P99: 150.2ms"
    );
}

#[test]
fn test_from_path() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(HEY_OUTPUT.as_bytes()).unwrap();
    let report = LatencyReport::from_path(f.path()).unwrap();
    assert_eq!(report.total_requests(), 1000);
}

#[test]
fn test_from_path_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = LatencyReport::from_path(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[test]
fn test_from_path_without_section() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"no report here").unwrap();
    let err = LatencyReport::from_path(f.path()).unwrap_err();
    assert!(matches!(err, ReportError::Parse(ParseError::SectionNotFound)));
}

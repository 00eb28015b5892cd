use crate::percentiles::Percentiles;
use crate::report::LatencyReport;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

const SECTION_START: &str = "Latency distribution:";
const SECTION_END: &str = "Requests/sec:";

static TOTAL_REQUESTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total:\s+(\d+)\s+requests").unwrap());
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"in\s+([\d.]+)s").unwrap());
static REQUESTS_PER_SEC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Requests/sec:\s+([\d.]+)").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Could not find latency distribution in output")]
    SectionNotFound,
}

/// Summary counters found anywhere in the report. Absent fields stay `None`
/// until the report is assembled.
#[derive(Debug, Default, PartialEq)]
struct SummaryFields {
    total_requests: Option<u64>,
    duration_seconds: Option<f64>,
    requests_per_second: Option<f64>,
}

/// Parses a load-test report.
///
/// Only a missing latency distribution section is fatal. Malformed percentile
/// lines are skipped and missing summary counters default to zero.
pub fn parse(text: &str) -> Result<LatencyReport, ParseError> {
    let section = latency_section(text).ok_or(ParseError::SectionNotFound)?;
    let percentiles = parse_percentiles(section);
    let summary = scan_summary(text);
    Ok(LatencyReport::new(
        summary.total_requests.unwrap_or(0),
        summary.duration_seconds.unwrap_or(0.0),
        summary.requests_per_second.unwrap_or(0.0),
        percentiles,
    ))
}

fn latency_section(text: &str) -> Option<&str> {
    let start = text.find(SECTION_START)? + SECTION_START.len();
    let rest = &text[start..];
    let end = rest.find(SECTION_END)?;
    Some(&rest[..end])
}

fn parse_percentiles(section: &str) -> Percentiles {
    let mut percentiles = Percentiles::new();
    for line in section.lines().filter(|l| l.contains('%')) {
        if let Some((rank, latency)) = parse_percentile_line(line) {
            percentiles.insert(rank, latency);
        }
    }
    percentiles
}

fn parse_percentile_line(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split_whitespace();
    let rank = parts.next()?.trim_end_matches('%');
    let latency = parts.next()?;
    let rank = rank.parse::<f64>().ok()?;
    let latency = latency.parse::<f64>().ok()?;
    if rank.is_finite() && latency.is_finite() {
        Some((rank, latency))
    } else {
        None
    }
}

fn scan_summary(text: &str) -> SummaryFields {
    SummaryFields {
        total_requests: capture(&TOTAL_REQUESTS, text),
        duration_seconds: capture(&DURATION, text),
        requests_per_second: capture(&REQUESTS_PER_SEC, text),
    }
}

/// First match of `re`, converted. A match that does not convert counts as absent.
fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_is_bounded_by_headers() {
        let text = "head\nLatency distribution:\n  50% 1.0\nRequests/sec: 3.0\ntail";
        assert_eq!(latency_section(text), Some("\n  50% 1.0\n"));
    }

    #[test]
    fn section_requires_terminator_after_start() {
        assert_eq!(latency_section("Requests/sec: 1\nLatency distribution:\n50% 1"), None);
        assert_eq!(latency_section("50% 1\nRequests/sec: 1"), None);
    }

    #[test]
    fn percentile_line_tokens() {
        assert_eq!(parse_percentile_line("  99% 150.2"), Some((99.0, 150.2)));
        assert_eq!(parse_percentile_line("99.9%\t7 extra"), Some((99.9, 7.0)));
        assert_eq!(parse_percentile_line("50% abc"), None);
        assert_eq!(parse_percentile_line("x% 1.0"), None);
        assert_eq!(parse_percentile_line("50%"), None);
        assert_eq!(parse_percentile_line("50% inf"), None);
    }

    #[test]
    fn summary_fields_absent() {
        assert_eq!(scan_summary("nothing here"), SummaryFields::default());
    }

    #[test]
    fn summary_field_that_does_not_convert_is_absent() {
        let s = scan_summary("Requests/sec: 1.2.3");
        assert_eq!(s.requests_per_second, None);
    }
}

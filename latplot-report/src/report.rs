use crate::format::{fmt_latency, fmt_thousands};
use crate::parser::{self, ParseError};
use crate::percentiles::{Percentiles, CANONICAL_RANKS};
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Summary of one load-test run, as extracted from the tool's text output.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyReport {
    total_requests: u64,
    duration_seconds: f64,
    requests_per_second: f64,
    percentiles: Percentiles,
}

impl LatencyReport {
    pub fn new(
        total_requests: u64,
        duration_seconds: f64,
        requests_per_second: f64,
        percentiles: Percentiles,
    ) -> LatencyReport {
        LatencyReport {
            total_requests,
            duration_seconds,
            requests_per_second,
            percentiles,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LatencyReport, ReportError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| ReportError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Ok(parser::parse(&contents)?)
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn requests_per_second(&self) -> f64 {
        self.requests_per_second
    }

    pub fn percentiles(&self) -> &Percentiles {
        &self.percentiles
    }

    /// Latency at a canonical rank, `0.0` when the report does not list it.
    pub fn canonical_latency(&self, rank: f64) -> f64 {
        self.percentiles.get(rank).unwrap_or(0.0)
    }

    /// Lines of the summary panel.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Load Test Summary".to_string(),
            format!("Total Requests: {}", fmt_thousands(self.total_requests)),
            format!("Duration: {:.1}s", self.duration_seconds),
            format!("Requests/sec: {:.1}", self.requests_per_second),
            String::new(),
            "Key Latencies:".to_string(),
        ];
        for &rank in CANONICAL_RANKS.iter() {
            lines.push(format!(
                "P{}: {}",
                rank,
                fmt_latency(self.canonical_latency(rank))
            ));
        }
        lines
    }
}

impl Display for LatencyReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} requests in {:.1}s ({:.1} req/s), {} percentiles",
            fmt_thousands(self.total_requests),
            self.duration_seconds,
            self.requests_per_second,
            self.percentiles.len()
        )?;
        for p in self.percentiles.canonical() {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

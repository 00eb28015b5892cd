mod format;
mod parser;
mod percentiles;
mod report;

pub use self::parser::{parse, ParseError};
pub use self::report::{LatencyReport, ReportError};
pub mod data {
    pub use crate::percentiles::{Percentile, Percentiles, CANONICAL_RANKS};
}
pub mod fmt {
    pub use crate::format::{fmt_latency, fmt_thousands};
}

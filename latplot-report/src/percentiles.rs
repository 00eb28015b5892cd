use std::fmt::{self, Display};

/// Ranks singled out for reference lines and the summary panel.
pub const CANONICAL_RANKS: [f64; 4] = [50.0, 90.0, 95.0, 99.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentile {
    rank: f64,
    latency_ms: f64,
}

impl Percentile {
    pub fn new(rank: f64, latency_ms: f64) -> Percentile {
        Percentile { rank, latency_ms }
    }

    pub fn rank(&self) -> f64 {
        self.rank
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    /// `P50`, `P99.9`, ...
    pub fn label(&self) -> String {
        format!("P{}", self.rank)
    }
}

impl Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:.1}ms", self.label(), self.latency_ms)
    }
}

/// Rank to latency table, kept sorted by ascending rank with unique ranks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Percentiles {
    entries: Vec<Percentile>,
}

impl Percentiles {
    pub fn new() -> Percentiles {
        Percentiles {
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, replacing any existing entry with the same rank.
    /// NaN ranks cannot be ordered and are ignored.
    pub(crate) fn insert(&mut self, rank: f64, latency_ms: f64) {
        if rank.is_nan() {
            return;
        }
        let entry = Percentile::new(rank, latency_ms);
        match self
            .entries
            .binary_search_by(|p| p.rank.partial_cmp(&rank).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    pub fn get(&self, rank: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.latency_ms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = &Percentile> {
        self.entries.iter()
    }

    /// Canonical ranks that are present in the table.
    pub fn canonical(&self) -> impl Iterator<Item = Percentile> + '_ {
        CANONICAL_RANKS
            .iter()
            .filter_map(move |&r| self.get(r).map(|v| Percentile::new(r, v)))
    }
}

impl<'a> IntoIterator for &'a Percentiles {
    type Item = &'a Percentile;
    type IntoIter = std::slice::Iter<'a, Percentile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

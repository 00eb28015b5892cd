//! Axis scales mapping data values onto pixel ranges.

const MAX_TICKS: usize = 20;
const MAX_DECIMALS: f64 = 12.0;

/// Linear axis with "nice" 1/2/5 tick steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    min: f64,
    max: f64,
    px_start: f32,
    px_end: f32,
}

impl LinearScale {
    /// Covers `lo..=hi` with a 5% margin on each side. A span too narrow to
    /// resolve at the values' magnitude, or too wide to represent, is
    /// replaced by a margin of 5% of the magnitude (at least 1).
    pub fn padded(lo: f64, hi: f64, px_start: f32, px_end: f32) -> LinearScale {
        let span = hi - lo;
        let magnitude = lo.abs().max(hi.abs());
        let (min, max) = if span.is_finite() && span > magnitude * 1e-9 {
            let pad = span * 0.05;
            (lo - pad, hi + pad)
        } else {
            let pad = (magnitude * 0.05).max(1.0);
            (lo - pad, hi + pad)
        };
        LinearScale {
            min,
            max,
            px_start,
            px_end,
        }
    }

    pub fn map(&self, v: f64) -> f32 {
        let t = (v / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0);
        self.px_start + (t as f32) * (self.px_end - self.px_start)
    }

    /// Tick positions and labels; empty when the range has no usable step.
    pub fn ticks(&self) -> Vec<(f64, String)> {
        let step = nice_step((self.max / 2.0 - self.min / 2.0) / 3.0);
        if !(step.is_finite() && step > 0.0) {
            return Vec::new();
        }
        let decimals = (-step.log10().floor()).max(0.0).min(MAX_DECIMALS) as usize;
        let mut ticks = Vec::new();
        let mut i = (self.min / step).ceil() as i64;
        while ticks.len() < MAX_TICKS {
            let mut v = i as f64 * step;
            if v > self.max + step * 1e-9 {
                break;
            }
            if v.abs() < step * 1e-9 {
                v = 0.0;
            }
            ticks.push((v, format!("{:.*}", decimals, v)));
            i += 1;
        }
        ticks
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Base-10 logarithmic axis spanning whole decades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    lo_exp: i32,
    hi_exp: i32,
    px_start: f32,
    px_end: f32,
}

impl LogScale {
    /// Smallest decade range containing `lo..=hi`. Both bounds must be positive.
    pub fn covering(lo: f64, hi: f64, px_start: f32, px_end: f32) -> LogScale {
        let lo_exp = lo.log10().floor() as i32;
        let mut hi_exp = hi.log10().ceil() as i32;
        if hi_exp <= lo_exp {
            hi_exp = lo_exp + 1;
        }
        LogScale {
            lo_exp,
            hi_exp,
            px_start,
            px_end,
        }
    }

    pub fn map(&self, v: f64) -> f32 {
        let t = (v.log10() - self.lo_exp as f64) / (self.hi_exp - self.lo_exp) as f64;
        self.px_start + (t as f32) * (self.px_end - self.px_start)
    }

    /// One tick per decade, thinned to at most `MAX_TICKS`.
    pub fn ticks(&self) -> Vec<(f64, String)> {
        let decades = (self.hi_exp - self.lo_exp) as usize;
        let stride = decades / MAX_TICKS + 1;
        (self.lo_exp..=self.hi_exp)
            .step_by(stride)
            .map(|e| (10f64.powi(e), fmt_decade(e)))
            .collect()
    }
}

fn fmt_decade(exp: i32) -> String {
    match exp {
        0..=15 => format!("{}", 10u64.pow(exp as u32)),
        -6..=-1 => format!("{:.*}", (-exp) as usize, 10f64.powi(exp)),
        _ => format!("1e{}", exp),
    }
}

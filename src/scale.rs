//! Scales mapping traffic figures to visual encodings.

/// Square-root scale from `[0, domain_max]` onto `range`.
///
/// Circle area then grows linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain_max: f64,
    range: (f64, f64),
}

impl SqrtScale {
    /// A zero `domain_max` falls back to 1 so an empty view still scales.
    pub fn new(domain_max: u32, range: (f64, f64)) -> Self {
        Self {
            domain_max: domain_max.max(1) as f64,
            range,
        }
    }

    pub fn apply(&self, value: u32) -> f64 {
        let (lo, hi) = self.range;
        lo + (hi - lo) * (value as f64 / self.domain_max).sqrt()
    }
}

/// Buckets a departure ratio into `0` (mostly arrivals), `0.5` (balanced) or
/// `1` (mostly departures), splitting `[0, 1]` into equal thirds.
pub fn quantize_flow(ratio: f64) -> f64 {
    const BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];
    let ratio = ratio.clamp(0.0, 1.0);
    let idx = ((ratio * BUCKETS.len() as f64) as usize).min(BUCKETS.len() - 1);
    BUCKETS[idx]
}

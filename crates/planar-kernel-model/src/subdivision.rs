//! Mesh subdivision attributes of a segment.

/// How a segment is divided when its patch is meshed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSubdivision {
    /// Number of intervals along the segment.
    pub count: usize,
    /// Length of the last interval relative to the first.
    pub ratio: f64,
}

impl Default for SegmentSubdivision {
    fn default() -> Self {
        Self {
            count: 1,
            ratio: 1.0,
        }
    }
}

impl SegmentSubdivision {
    /// Create a subdivision; a zero count is raised to one and a
    /// non-positive ratio falls back to uniform spacing.
    pub fn new(count: usize, ratio: f64) -> Self {
        Self {
            count: count.max(1),
            ratio: if ratio > 0.0 && ratio.is_finite() { ratio } else { 1.0 },
        }
    }

    /// `count + 1` ascending length fractions from 0 to 1.
    ///
    /// Interval lengths grow linearly so that the last interval is `ratio`
    /// times the first.
    pub fn fractions(&self) -> Vec<f64> {
        let n = self.count.max(1);
        if n == 1 {
            return vec![0.0, 1.0];
        }
        let r = 1.0 / self.ratio;
        let a = 2.0 * r / ((r + 1.0) * n as f64);
        let b = a * (1.0 - r) / (2.0 * r * (n - 1) as f64);
        let mut out: Vec<f64> = (0..=n)
            .map(|i| {
                let i = i as f64;
                (a * i + b * i * (i - 1.0)).clamp(0.0, 1.0)
            })
            .collect();
        out[n] = 1.0;
        out
    }
}

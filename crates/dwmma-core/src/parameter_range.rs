//! Range mapping between plain and normalized parameter values.
//!
//! Hosts automate parameters in `[0.0, 1.0]`; DSP code wants natural units.
//! A [`RangeMapper`] converts between the two and clamps at both ends, which
//! is what keeps every position parameter inside the room.

use std::ops::RangeInclusive;

/// Conversion between plain values and normalized `[0.0, 1.0]` values.
pub trait RangeMapper: Send + Sync {
    /// Convert a plain value to normalized (0.0-1.0).
    ///
    /// Values outside the range are clamped.
    fn normalize(&self, plain: f64) -> f64;

    /// Convert a normalized value (0.0-1.0) to plain.
    ///
    /// Values outside 0.0-1.0 are clamped.
    fn denormalize(&self, normalized: f64) -> f64;

    /// Get the plain value range as (min, max).
    fn range(&self) -> (f64, f64);
}

/// Linear range mapping.
///
/// ```
/// use dwmma_core::{LinearMapper, RangeMapper};
///
/// let mapper = LinearMapper::new(0.0..=4.0);
/// assert_eq!(mapper.denormalize(0.5), 2.0);
/// assert_eq!(mapper.normalize(9.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    min: f64,
    max: f64,
}

impl LinearMapper {
    /// Create a new linear mapper with the given range.
    pub fn new(range: RangeInclusive<f64>) -> Self {
        Self {
            min: *range.start(),
            max: *range.end(),
        }
    }
}

impl RangeMapper for LinearMapper {
    fn normalize(&self, plain: f64) -> f64 {
        if (self.max - self.min).abs() < f64::EPSILON {
            return 0.5;
        }
        ((plain - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        let normalized = normalized.clamp(0.0, 1.0);
        self.min + normalized * (self.max - self.min)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

//! Per-block processing context.
//!
//! The host reports its current sample rate alongside every block. Plugins that
//! run at a fixed operating point compare it against their requirement each
//! block rather than trusting the value they were prepared with.

/// Processing context for a single audio block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessContext {
    /// Current sample rate reported by the host, in Hz.
    pub sample_rate: f64,
    /// Number of samples in this block.
    pub num_samples: usize,
}

impl ProcessContext {
    /// Create a context for one block.
    #[inline]
    pub const fn new(sample_rate: f64, num_samples: usize) -> Self {
        Self {
            sample_rate,
            num_samples,
        }
    }
}


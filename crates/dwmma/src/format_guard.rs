//! Host format validation.

use dwmma_core::{Buffer, ProcessContext};

use crate::config::SimulatorConfig;
use crate::error::{FormatField, FormatMismatch};

/// The format a host block arrives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostFormat {
    pub sample_rate: f64,
    pub block_size: usize,
    pub input_channels: usize,
    pub output_channels: usize,
}

impl HostFormat {
    /// Format of the block the host just delivered.
    pub fn of_block(buffer: &Buffer<'_>, context: &ProcessContext) -> Self {
        Self {
            sample_rate: context.sample_rate,
            block_size: buffer.num_samples(),
            input_channels: buffer.num_input_channels(),
            output_channels: buffer.num_output_channels(),
        }
    }
}

/// Result of a format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCheck {
    Valid,
    Invalid(FormatMismatch),
}

impl FormatCheck {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Compares host blocks against the fixed operating point.
///
/// Fields are checked in order: sample rate, block size, input channels,
/// output channels. The first mismatch is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatGuard {
    sample_rate: usize,
    block_size: usize,
    input_channels: usize,
    output_channels: usize,
}

impl FormatGuard {
    pub fn new(config: &SimulatorConfig) -> Self {
        let op = &config.operating_point;
        Self {
            sample_rate: op.sample_rate as usize,
            block_size: op.block_size,
            input_channels: op.input_channels,
            output_channels: config.required_output_channels(),
        }
    }

    pub fn check(&self, format: &HostFormat) -> FormatCheck {
        // Hosts report rates like 47999.99; compare whole Hz. NaN maps to 0.
        let sample_rate = format.sample_rate.round().max(0.0) as usize;

        let checks = [
            (FormatField::SampleRate, self.sample_rate, sample_rate),
            (FormatField::BlockSize, self.block_size, format.block_size),
            (FormatField::InputChannels, self.input_channels, format.input_channels),
            (FormatField::OutputChannels, self.output_channels, format.output_channels),
        ];

        checks
            .into_iter()
            .find(|(_, expected, actual)| expected != actual)
            .map_or(FormatCheck::Valid, |(field, expected, actual)| {
                FormatCheck::Invalid(FormatMismatch::new(field, expected, actual))
            })
    }
}

//! Error types for the simulator.
//!
//! Both types are `Copy` and carry only static strings, so the real-time
//! callback can build and return them without touching the heap.

use std::fmt;

use crate::engine::EngineTopology;

/// A failure reported by the engine or one of the binaural tail stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be set up for the topology.
    InitFailed {
        topology: EngineTopology,
        reason: &'static str,
    },
    /// The engine failed while simulating a block.
    ProcessFailed(&'static str),
    /// The spherical-harmonic encoder failed.
    EncoderFailed(&'static str),
    /// The binaural decoder failed.
    DecoderFailed(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed { topology, reason } => {
                write!(f, "engine init failed for {:?}: {}", topology, reason)
            }
            Self::ProcessFailed(reason) => write!(f, "engine processing failed: {}", reason),
            Self::EncoderFailed(reason) => write!(f, "encoder failed: {}", reason),
            Self::DecoderFailed(reason) => write!(f, "decoder failed: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Host format property checked against the operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatField {
    SampleRate,
    BlockSize,
    InputChannels,
    OutputChannels,
}

impl fmt::Display for FormatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SampleRate => "sample rate",
            Self::BlockSize => "block size",
            Self::InputChannels => "input channel count",
            Self::OutputChannels => "output channel count",
        })
    }
}

/// The first host format property that differs from the operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMismatch {
    pub field: FormatField,
    pub expected: usize,
    pub actual: usize,
}

impl FormatMismatch {
    pub const fn new(field: FormatField, expected: usize, actual: usize) -> Self {
        Self {
            field,
            expected,
            actual,
        }
    }
}

impl fmt::Display for FormatMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl std::error::Error for FormatMismatch {}

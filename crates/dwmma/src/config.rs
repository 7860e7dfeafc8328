//! Plugin metadata and the fixed operating point.
//!
//! The mesh solver is compiled for one sample rate, one block size and one
//! input width. Anything else the host offers is rejected block by block by
//! the [`FormatGuard`](crate::format_guard::FormatGuard).

use dwmma_core::PluginConfig;

use crate::topology::MAX_TOPOLOGY_CHANNELS;

/// Number of source input slots.
pub const MAX_INPUTS: usize = 6;

/// Shared plugin metadata.
pub static CONFIG: PluginConfig = PluginConfig::new("DWM Mic Array Simulator")
    .with_vendor("dwmma")
    .with_version(env!("CARGO_PKG_VERSION"))
    .with_sub_categories("Fx|Spatial");

// =============================================================================
// RoomSize
// =============================================================================

/// Mesh bounds in metres per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomSize {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RoomSize {
    /// The room the solver ships with.
    pub const DEFAULT: Self = Self::new(4.0, 3.0, 5.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Centre of the room.
    pub fn midpoint(&self) -> [f64; 3] {
        [self.x / 2.0, self.y / 2.0, self.z / 2.0]
    }
}

impl Default for RoomSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// OperatingPoint
// =============================================================================

/// The host format the engine accepts.
///
/// ```
/// use dwmma::OperatingPoint;
///
/// let op = OperatingPoint::new().with_block_size(256);
/// assert_eq!(op.sample_rate, 48_000);
/// assert_eq!(op.block_size, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Sample rate in whole Hz.
    pub sample_rate: u32,
    /// Samples per block.
    pub block_size: usize,
    /// Width of the main input bus.
    pub input_channels: usize,
    /// Mesh bounds.
    pub room: RoomSize,
}

impl OperatingPoint {
    pub const fn new() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 512,
            input_channels: MAX_INPUTS,
            room: RoomSize::DEFAULT,
        }
    }

    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the input bus width. Values above [`MAX_INPUTS`] are capped.
    pub const fn with_input_channels(mut self, input_channels: usize) -> Self {
        self.input_channels = if input_channels > MAX_INPUTS {
            MAX_INPUTS
        } else {
            input_channels
        };
        self
    }

    pub const fn with_room(mut self, room: RoomSize) -> Self {
        self.room = room;
        self
    }
}

impl Default for OperatingPoint {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// OutputMode / SimulatorConfig
// =============================================================================

/// What the processor writes to the host output bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Raw microphone signals, one output per array channel.
    #[default]
    Direct,
    /// Array signals encoded to spherical harmonics and decoded to two ears.
    Binaural,
}

impl OutputMode {
    /// Output bus width for this mode.
    pub const fn output_channels(self) -> usize {
        match self {
            Self::Direct => MAX_TOPOLOGY_CHANNELS,
            Self::Binaural => 2,
        }
    }
}

/// Everything the processor is built around besides the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulatorConfig {
    pub operating_point: OperatingPoint,
    pub output_mode: OutputMode,
}

impl SimulatorConfig {
    pub const fn new() -> Self {
        Self {
            operating_point: OperatingPoint::new(),
            output_mode: OutputMode::Direct,
        }
    }

    pub const fn with_operating_point(mut self, operating_point: OperatingPoint) -> Self {
        self.operating_point = operating_point;
        self
    }

    pub const fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Output bus width the host must provide.
    pub const fn required_output_channels(&self) -> usize {
        self.output_mode.output_channels()
    }
}

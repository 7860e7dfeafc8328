//! Core plugin trait definitions.
//!
//! Two-phase lifecycle:
//!
//! - **[`Plugin`]** (unprepared state): holds parameters, created before the
//!   audio configuration is known. Turns into a processor via
//!   [`Plugin::prepare()`] once the host reports its setup.
//!
//! - **[`AudioProcessor`]** (prepared state): owns everything needed on the
//!   audio thread, sized for the real configuration. Returns to the
//!   unprepared state via [`AudioProcessor::unprepare()`] when the host
//!   changes its setup.
//!
//! ```text
//! Plugin::default() -> Plugin (unprepared, holds parameters)
//!                      |
//!                      v  Plugin::prepare(setup)
//!                AudioProcessor (prepared, ready for audio)
//!                      |
//!                      v  AudioProcessor::unprepare()
//!                 Plugin (unprepared, parameters preserved)
//! ```

use crate::buffer::Buffer;
use crate::error::PluginResult;
use crate::parameter_types::Parameters;
use crate::process_context::ProcessContext;

// =============================================================================
// HasParameters Trait (Shared Parameter Access)
// =============================================================================

/// Types that hold a parameter collection.
///
/// Shared supertrait of [`Plugin`] and [`AudioProcessor`], so a host binding
/// can reach the parameters in either state.
pub trait HasParameters: Send + 'static {
    /// The parameter collection type.
    type Parameters: Parameters;

    /// Returns a reference to the parameters.
    fn parameters(&self) -> &Self::Parameters;
}

// =============================================================================
// Audio Setup
// =============================================================================

/// Audio configuration reported by the host when processing starts.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSetup {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Maximum number of samples per process() call
    pub max_buffer_size: usize,
    /// Negotiated bus layout
    pub layout: BusLayout,
}

/// Bus layout information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BusLayout {
    /// Number of channels on the main input bus
    pub main_input_channels: u32,
    /// Number of channels on the main output bus
    pub main_output_channels: u32,
}

impl BusLayout {
    /// Layout with the given main bus widths.
    pub const fn new(main_input_channels: u32, main_output_channels: u32) -> Self {
        Self {
            main_input_channels,
            main_output_channels,
        }
    }

    /// Layout a plugin declares for its main buses.
    ///
    /// Missing bus declarations count as zero channels.
    pub fn from_plugin<P: Plugin>(plugin: &P) -> Self {
        Self {
            main_input_channels: plugin.input_bus_info(0).map_or(0, |b| b.channel_count),
            main_output_channels: plugin.output_bus_info(0).map_or(0, |b| b.channel_count),
        }
    }
}

/// Information about an audio bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusInfo {
    /// Display name for the bus (e.g., "Sources", "Array").
    pub name: &'static str,
    /// Number of channels in this bus.
    pub channel_count: u32,
    /// Whether the bus is active by default.
    pub is_default_active: bool,
}

impl BusInfo {
    /// Create an active main bus with `channel_count` channels.
    pub const fn main(name: &'static str, channel_count: u32) -> Self {
        Self {
            name,
            channel_count,
            is_default_active: true,
        }
    }
}

// =============================================================================
// AudioProcessor Trait
// =============================================================================

/// The prepared processor, ready for audio processing.
///
/// # Thread Safety
///
/// `process` is called on the audio thread and must be real-time safe:
/// no allocations, no locks, no syscalls, no unbounded loops.
pub trait AudioProcessor: HasParameters {
    /// The unprepared plugin type that created this processor.
    type Plugin: Plugin<Processor = Self, Parameters = Self::Parameters>;

    /// Process one block of audio.
    fn process(&mut self, buffer: &mut Buffer, context: &ProcessContext);

    /// Return to the unprepared plugin state, keeping parameter values.
    fn unprepare(self) -> Self::Plugin
    where
        Self: Sized;

    /// Serialize plugin state. Defaults to the parameter state.
    fn save_state(&self) -> PluginResult<Vec<u8>> {
        Ok(self.parameters().save_state())
    }

    /// Restore plugin state. Defaults to the parameter state.
    fn load_state(&mut self, data: &[u8]) -> PluginResult<()> {
        self.parameters()
            .load_state(data)
            .map(|_| ())
            .map_err(crate::error::PluginError::StateError)
    }
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// The unprepared plugin: parameters and bus declarations.
pub trait Plugin: HasParameters + Default {
    /// Processor produced by [`prepare`](Self::prepare).
    type Processor: AudioProcessor<Plugin = Self, Parameters = Self::Parameters>;

    /// Build the processor for the host's configuration.
    fn prepare(self, setup: AudioSetup) -> Self::Processor;

    /// Input bus description.
    fn input_bus_info(&self, index: usize) -> Option<BusInfo> {
        (index == 0).then(|| BusInfo::main("Input", 2))
    }

    /// Output bus description.
    fn output_bus_info(&self, index: usize) -> Option<BusInfo> {
        (index == 0).then(|| BusInfo::main("Output", 2))
    }

    /// Whether the host's proposed layout can be used.
    ///
    /// Defaults to an exact match with the declared main buses.
    fn is_layout_supported(&self, layout: &BusLayout) -> bool {
        *layout == BusLayout::from_plugin(self)
    }
}

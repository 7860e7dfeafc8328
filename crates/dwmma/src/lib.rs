//! # dwmma
//!
//! Real-time callback of a digital waveguide mesh (DWM) microphone-array
//! simulator.
//!
//! The mesh solver, the spherical-harmonic encoder and the binaural decoder
//! are supplied by the caller through [`SimulationEngine`],
//! [`SpatialEncoder`] and [`BinauralDecoder`]. This crate owns what sits
//! around them on the audio thread: host format checks, topology switching,
//! input routing and output muting.
//!
//! ```text
//! host block -> FormatGuard -> ConfigSwitch -> ActiveInputs -> engine
//!                                                              |
//!                    host outputs <- mute unused <- OutputStage
//! ```
//!
//! [`SimulatorPlugin`] and [`SimulatorProcessor`] implement the two-phase
//! lifecycle from `dwmma-core`.

pub mod channel_buffer;
pub mod config;
pub mod config_switch;
pub mod engine;
pub mod error;
pub mod format_guard;
pub mod output;
pub mod parameters;
pub mod plugin;
pub mod processor;
pub mod routing;
pub mod topology;

pub use channel_buffer::ChannelBuffer;
pub use config::{OperatingPoint, OutputMode, RoomSize, SimulatorConfig, CONFIG, MAX_INPUTS};
pub use config_switch::{ConfigSwitch, SwitchState};
pub use engine::{
    BinauralDecoder, EngineBlock, EngineSetup, EngineTopology, Position, SilentEngine,
    SimulationEngine, SpatialEncoder,
};
pub use error::{EngineError, EngineResult, FormatField, FormatMismatch};
pub use format_guard::{FormatCheck, FormatGuard, HostFormat};
pub use output::{BinauralTail, OutputStage};
pub use parameters::{default_position, InputParameters, InputSlot, SimulatorParameters};
pub use plugin::SimulatorPlugin;
pub use processor::{BlockOutcome, SimulatorProcessor};
pub use routing::ActiveInputs;
pub use topology::{AmbisonicOrder, MicDirection, MicLayout, Topology, MAX_TOPOLOGY_CHANNELS};

pub use dwmma_core::{
    AudioProcessor, AudioSetup, Buffer, BusInfo, BusLayout, ChoiceValue, HasParameters,
    ParameterRef, Parameters, Plugin, PluginError, PluginResult, ProcessContext,
};

//! # dwmma-core
//!
//! Host-facing abstractions for the mic-array simulator plugin.
//!
//! This crate defines the plugin lifecycle and the pieces a host binding
//! needs to drive it. It has no external dependencies.
//!
//! ## Main Traits
//!
//! - [`Plugin`] - unprepared plugin holding parameters and bus declarations
//! - [`AudioProcessor`] - prepared processor running on the audio thread
//! - [`Parameters`] - parameter collection with state serialization
//! - [`ChoiceValue`] - enums usable as choice parameters
//!
//! ## Types
//!
//! - [`Buffer`] - main audio I/O buffer
//! - [`ProcessContext`] - per-block host information
//! - [`AudioSetup`], [`BusLayout`], [`BusInfo`] - audio configuration
//! - [`FloatParameter`], [`BoolParameter`], [`ChoiceParameter`] - atomic parameters
//! - [`PluginConfig`] - plugin metadata
//! - [`PluginError`] - error types

pub mod buffer;
pub mod config;
pub mod error;
pub mod parameter_format;
pub mod parameter_info;
pub mod parameter_range;
pub mod parameter_types;
pub mod plugin;
pub mod process_context;
pub mod types;

pub use buffer::Buffer;
pub use config::PluginConfig;
pub use error::{PluginError, PluginResult};
pub use parameter_format::Formatter;
pub use parameter_info::{ParameterFlags, ParameterInfo};
pub use parameter_range::{LinearMapper, RangeMapper};
pub use parameter_types::{
    BoolParameter, ChoiceParameter, ChoiceValue, FloatParameter, ParameterRef, Parameters,
};
pub use plugin::{AudioProcessor, AudioSetup, BusInfo, BusLayout, HasParameters, Plugin};
pub use process_context::ProcessContext;
pub use types::{parameter_id, ParameterId, ParameterValue, MAX_CHANNELS};

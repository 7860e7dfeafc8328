//! Contracts for the simulation engine and the binaural tail.
//!
//! The mesh solver, the spherical-harmonic encoder and the binaural decoder
//! live outside this crate. The processor owns one value of each and drives
//! them through the traits below:
//!
//! - [`SimulationEngine::init`] on every (re)initialization, then one
//!   [`SimulationEngine::process_interpolated`] call per block
//! - [`SpatialEncoder::configure`] and [`BinauralDecoder::configure`] on every
//!   (re)initialization, then one `process` call each per block
//!
//! All `process` methods run on the audio thread and must not allocate.

use crate::channel_buffer::ChannelBuffer;
use crate::config::{OperatingPoint, RoomSize};
use crate::error::EngineResult;
use crate::topology::{AmbisonicOrder, MicLayout, Topology};

/// The engine's own topology enumeration.
///
/// `Mono` and `Stereo` come first and have no host preset; see
/// [`Topology::engine_topology`] for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTopology {
    Mono,
    Stereo,
    Octahedron1,
    Octahedron3,
    Sphere30,
}

impl EngineTopology {
    /// Number of array signals the engine produces.
    pub const fn channel_count(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Octahedron1 | Self::Octahedron3 => 6,
            Self::Sphere30 => 30,
        }
    }
}

/// A point in the room, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x as f32, y as f32, z as f32)
    }
}

/// Everything the engine needs to build its mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSetup {
    pub sample_rate: u32,
    pub block_size: usize,
    /// Upper bound on active sources per block.
    pub max_sources: usize,
    pub room: RoomSize,
    pub topology: EngineTopology,
    /// Capsule distance from the array centre, in mesh junctions.
    pub junction_distance: u32,
}

impl EngineSetup {
    /// Setup for `topology` at the operating point.
    pub fn new(operating_point: &OperatingPoint, topology: Topology) -> Self {
        Self {
            sample_rate: operating_point.sample_rate,
            block_size: operating_point.block_size,
            max_sources: operating_point.input_channels,
            room: operating_point.room,
            topology: topology.engine_topology(),
            junction_distance: topology.junction_distance(),
        }
    }
}

/// One block of work for the engine.
///
/// `inputs` and `positions` are dense and parallel: entry `i` of both
/// belongs to the same enabled source.
#[derive(Debug, Clone, Copy)]
pub struct EngineBlock<'a> {
    pub inputs: &'a [&'a [f32]],
    pub positions: &'a [Position],
    pub topology: EngineTopology,
    /// Fraction of the block over which source positions are interpolated.
    pub interpolation: f32,
    pub array_position: Position,
}

impl EngineBlock<'_> {
    /// Number of active sources.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.inputs.len()
    }
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// A waveguide mesh solver.
///
/// Construction and `Drop` cover the engine's lifetime; `init` may be
/// called any number of times on the same value.
pub trait SimulationEngine: Send + 'static {
    /// (Re)build the mesh for `setup`.
    ///
    /// Discards everything carried from earlier blocks: junction pressures,
    /// boundary filter history and any other per-block accumulation. Only
    /// the most recent successful `init` is live; state from earlier ones
    /// must not leak into the next block.
    fn init(&mut self, setup: &EngineSetup) -> EngineResult<()>;

    /// Simulate one block, writing one row per array channel to `output`.
    ///
    /// `output` has exactly `block.topology.channel_count()` channels in use.
    fn process_interpolated(
        &mut self,
        block: &EngineBlock<'_>,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()>;
}

/// Array signals to spherical harmonics.
pub trait SpatialEncoder: Send + 'static {
    /// Prepare for a capsule layout and target order.
    ///
    /// Drops any filter history from the previous configuration.
    fn configure(&mut self, layout: &MicLayout, order: AmbisonicOrder) -> EngineResult<()>;

    /// Encode one block. `output` has `order.channel_count()` channels in use.
    fn process(&mut self, array: &ChannelBuffer, output: &mut ChannelBuffer) -> EngineResult<()>;
}

/// Spherical harmonics to two ear signals.
pub trait BinauralDecoder: Send + 'static {
    /// Prepare for an input order at the given sample rate.
    ///
    /// Drops any convolution or filter history from the previous
    /// configuration.
    fn configure(&mut self, order: AmbisonicOrder, sample_rate: u32) -> EngineResult<()>;

    /// Decode one block. `output` has two channels in use: left, right.
    fn process(
        &mut self,
        harmonics: &ChannelBuffer,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()>;
}

// =============================================================================
// SilentEngine
// =============================================================================

/// Engine stand-in that produces silence.
///
/// Lets the plugin load and pass audio-thread checks when no solver is
/// linked in.
#[derive(Debug, Default)]
pub struct SilentEngine {
    setup: Option<EngineSetup>,
}

impl SilentEngine {
    /// Setup from the last successful `init`.
    pub fn setup(&self) -> Option<&EngineSetup> {
        self.setup.as_ref()
    }
}

impl SimulationEngine for SilentEngine {
    fn init(&mut self, setup: &EngineSetup) -> EngineResult<()> {
        self.setup = Some(*setup);
        Ok(())
    }

    fn process_interpolated(
        &mut self,
        _block: &EngineBlock<'_>,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()> {
        output.clear();
        Ok(())
    }
}

//! Microphone array presets and the geometry derived from them.
//!
//! A [`Topology`] fixes the number of array channels, where the capsules sit
//! and which ambisonic order the binaural tail re-encodes to.

use std::f32::consts::PI;

use dwmma_core::ChoiceValue;
use dwmma_macros::Choice;

use crate::engine::EngineTopology;

/// Widest array any preset produces.
pub const MAX_TOPOLOGY_CHANNELS: usize = 30;

/// Array layout preset, in the order the host lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Choice)]
pub enum Topology {
    #[default]
    #[name = "6 Points, 1 junction distance"]
    SixPointsNear,
    #[name = "6 Points, 3 junctions distance"]
    SixPointsFar,
    #[name = "30 Points, 3 junctions distance"]
    ThirtyPoints,
}

/// Engine topology for each preset, indexed by preset position.
///
/// The engine enumeration starts with `Mono` and `Stereo`, which have no
/// preset. This table has to be updated by hand whenever either enumeration
/// is reordered.
const ENGINE_TOPOLOGIES: [EngineTopology; Topology::COUNT] = [
    EngineTopology::Octahedron1,
    EngineTopology::Octahedron3,
    EngineTopology::Sphere30,
];

impl Topology {
    /// All presets in host order.
    pub const ALL: [Topology; Topology::COUNT] = [
        Topology::SixPointsNear,
        Topology::SixPointsFar,
        Topology::ThirtyPoints,
    ];

    /// Number of array channels.
    pub const fn channel_count(self) -> usize {
        match self {
            Self::SixPointsNear | Self::SixPointsFar => 6,
            Self::ThirtyPoints => MAX_TOPOLOGY_CHANNELS,
        }
    }

    /// Capsule distance from the array centre, in mesh junctions.
    pub const fn junction_distance(self) -> u32 {
        match self {
            Self::SixPointsNear => 1,
            Self::SixPointsFar | Self::ThirtyPoints => 3,
        }
    }

    /// The engine's name for this layout.
    pub fn engine_topology(self) -> EngineTopology {
        ENGINE_TOPOLOGIES[self.to_index()]
    }

    /// Order used when re-encoding this array to spherical harmonics.
    pub const fn ambisonic_order(self) -> AmbisonicOrder {
        AmbisonicOrder::for_channel_count(self.channel_count())
    }

    /// Capsule directions as seen from the array centre.
    pub fn mic_layout(self) -> MicLayout {
        match self {
            Self::SixPointsNear | Self::SixPointsFar => MicLayout::octahedron(),
            Self::ThirtyPoints => MicLayout::fibonacci_sphere(MAX_TOPOLOGY_CHANNELS),
        }
    }
}

// =============================================================================
// AmbisonicOrder
// =============================================================================

/// Spherical-harmonic truncation order.
///
/// The number of channels is `(order + 1)²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AmbisonicOrder {
    /// 4 channels.
    First,
    /// 9 channels.
    Second,
    /// 16 channels.
    Third,
    /// 25 channels.
    Fourth,
}

impl AmbisonicOrder {
    /// Highest order an array of `channels` capsules can resolve.
    ///
    /// Arrays with fewer than 9 channels still get first order.
    pub const fn for_channel_count(channels: usize) -> Self {
        if channels >= 25 {
            Self::Fourth
        } else if channels >= 16 {
            Self::Third
        } else if channels >= 9 {
            Self::Second
        } else {
            Self::First
        }
    }

    /// Numeric order (1 to 4).
    pub const fn numeric_order(self) -> usize {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        }
    }

    /// Number of spherical-harmonic channels.
    pub const fn channel_count(self) -> usize {
        let order = self.numeric_order();
        (order + 1) * (order + 1)
    }
}

// =============================================================================
// MicLayout
// =============================================================================

/// Direction of one capsule, in degrees.
///
/// Azimuth is counter-clockwise from the front, elevation is positive upward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MicDirection {
    pub azimuth: f32,
    pub elevation: f32,
}

impl MicDirection {
    pub const fn new(azimuth: f32, elevation: f32) -> Self {
        Self { azimuth, elevation }
    }
}

/// Capsule directions for one preset, stored inline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicLayout {
    directions: [MicDirection; MAX_TOPOLOGY_CHANNELS],
    len: usize,
}

impl MicLayout {
    /// Front, left, back, right, up, down.
    pub fn octahedron() -> Self {
        Self::from_slice(&[
            MicDirection::new(0.0, 0.0),
            MicDirection::new(90.0, 0.0),
            MicDirection::new(180.0, 0.0),
            MicDirection::new(-90.0, 0.0),
            MicDirection::new(0.0, 90.0),
            MicDirection::new(0.0, -90.0),
        ])
    }

    /// `count` points spread over the sphere along a golden-angle spiral.
    ///
    /// Deterministic; the first point is nearest the north pole.
    pub fn fibonacci_sphere(count: usize) -> Self {
        let count = count.min(MAX_TOPOLOGY_CHANNELS);
        let golden_angle = PI * (3.0 - 5.0f32.sqrt());
        let mut layout = Self::empty();
        for i in 0..count {
            let height = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let elevation = height.asin().to_degrees();
            let mut azimuth = (i as f32 * golden_angle).to_degrees() % 360.0;
            if azimuth > 180.0 {
                azimuth -= 360.0;
            }
            layout.directions[i] = MicDirection::new(azimuth, elevation);
        }
        layout.len = count;
        layout
    }

    fn empty() -> Self {
        Self {
            directions: [MicDirection::default(); MAX_TOPOLOGY_CHANNELS],
            len: 0,
        }
    }

    fn from_slice(directions: &[MicDirection]) -> Self {
        let mut layout = Self::empty();
        let len = directions.len().min(MAX_TOPOLOGY_CHANNELS);
        layout.directions[..len].copy_from_slice(&directions[..len]);
        layout.len = len;
        layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[MicDirection] {
        &self.directions[..self.len]
    }
}

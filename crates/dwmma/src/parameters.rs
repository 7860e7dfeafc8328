//! The simulator's parameter surface.
//!
//! One topology choice, the array reference point, and per input slot an
//! enable flag plus a position. Every value is an atomic owned by a
//! [`SimulatorParameters`] shared through an `Arc`, so the audio thread reads
//! while host and UI threads write.

use std::f64::consts::TAU;

use dwmma_core::{BoolParameter, ChoiceParameter, FloatParameter, ParameterRef, Parameters};

use crate::config::{RoomSize, MAX_INPUTS};
use crate::engine::Position;
use crate::topology::Topology;

/// Default position for input `slot` of `slot_count`, or the array when
/// `slot` is `None`.
///
/// Inputs sit on a horizontal ring around the room centre with a radius of
/// a quarter of the room on each axis. The array sits at the centre.
///
/// ```
/// use dwmma::{default_position, RoomSize};
///
/// let room = RoomSize::new(4.0, 3.0, 5.0);
/// assert_eq!(default_position(Some(0), 6, &room), [3.0, 1.5, 2.5]);
/// assert_eq!(default_position(None, 6, &room), [2.0, 1.5, 2.5]);
/// ```
pub fn default_position(slot: Option<usize>, slot_count: usize, room: &RoomSize) -> [f64; 3] {
    let centre = room.midpoint();
    let Some(slot) = slot else {
        return centre;
    };
    let angle = TAU * slot as f64 / slot_count.max(1) as f64;
    [
        centre[0] + angle.cos() * room.x / 4.0,
        centre[1],
        centre[2] + angle.sin() * room.z / 4.0,
    ]
}

/// A read-out of one input slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSlot {
    pub enabled: bool,
    pub position: Position,
}

/// Enable flag and position of one source input.
pub struct InputParameters {
    pub enabled: BoolParameter,
    pub pos_x: FloatParameter,
    pub pos_y: FloatParameter,
    pub pos_z: FloatParameter,
}

impl InputParameters {
    fn new(slot: usize, room: &RoomSize) -> Self {
        let [x, y, z] = default_position(Some(slot), MAX_INPUTS, room);
        Self {
            enabled: BoolParameter::new(
                format!("input_{slot}_enabled"),
                format!("Input {slot} enabled"),
                false,
            ),
            pos_x: FloatParameter::meters(
                format!("input_{slot}_pos_x"),
                format!("Input {slot} position x"),
                x,
                0.0..=room.x,
            ),
            pos_y: FloatParameter::meters(
                format!("input_{slot}_pos_y"),
                format!("Input {slot} position y"),
                y,
                0.0..=room.y,
            ),
            pos_z: FloatParameter::meters(
                format!("input_{slot}_pos_z"),
                format!("Input {slot} position z"),
                z,
                0.0..=room.z,
            ),
        }
    }

    /// Position in metres.
    pub fn position(&self) -> [f64; 3] {
        [self.pos_x.get(), self.pos_y.get(), self.pos_z.get()]
    }

    pub fn set_position(&self, [x, y, z]: [f64; 3]) {
        self.pos_x.set(x);
        self.pos_y.set(y);
        self.pos_z.set(z);
    }

    fn as_refs(&self) -> [&dyn ParameterRef; 4] {
        [&self.enabled, &self.pos_x, &self.pos_y, &self.pos_z]
    }
}

/// All simulator parameters.
pub struct SimulatorParameters {
    pub topology: ChoiceParameter<Topology>,
    pub array_x: FloatParameter,
    pub array_y: FloatParameter,
    pub array_z: FloatParameter,
    pub inputs: [InputParameters; MAX_INPUTS],
    room: RoomSize,
}

impl SimulatorParameters {
    /// Parameters with position ranges bounded by `room`.
    pub fn new(room: RoomSize) -> Self {
        let [x, y, z] = default_position(None, MAX_INPUTS, &room);
        Self {
            topology: ChoiceParameter::new("ma_config", "Mic Array configuration"),
            array_x: FloatParameter::meters("ma_pos_x", "Mic Array position x", x, 0.0..=room.x),
            array_y: FloatParameter::meters("ma_pos_y", "Mic Array position y", y, 0.0..=room.y),
            array_z: FloatParameter::meters("ma_pos_z", "Mic Array position z", z, 0.0..=room.z),
            inputs: std::array::from_fn(|slot| InputParameters::new(slot, &room)),
            room,
        }
    }

    pub fn room(&self) -> RoomSize {
        self.room
    }

    /// Selected array preset.
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology.get()
    }

    /// Position of the selected preset in the host's list.
    #[inline]
    pub fn topology_index(&self) -> usize {
        self.topology.index()
    }

    /// Whether input `slot` feeds the engine. Slots past the end are off.
    pub fn input_enabled(&self, slot: usize) -> bool {
        self.inputs.get(slot).is_some_and(|input| input.enabled.get())
    }

    /// Position of input `slot` in metres.
    pub fn input_position(&self, slot: usize) -> Option<[f64; 3]> {
        self.inputs.get(slot).map(InputParameters::position)
    }

    /// Array reference point in metres.
    pub fn array_position(&self) -> [f64; 3] {
        [self.array_x.get(), self.array_y.get(), self.array_z.get()]
    }

    pub fn set_array_position(&self, [x, y, z]: [f64; 3]) {
        self.array_x.set(x);
        self.array_y.set(y);
        self.array_z.set(z);
    }

    /// Snapshot of every input slot, in slot order.
    pub fn input_slots(&self) -> [InputSlot; MAX_INPUTS] {
        std::array::from_fn(|slot| {
            let input = &self.inputs[slot];
            InputSlot {
                enabled: input.enabled.get(),
                position: Position::from(input.position()),
            }
        })
    }

    /// Number of enabled inputs.
    pub fn enabled_count(&self) -> usize {
        self.inputs.iter().filter(|i| i.enabled.get()).count()
    }
}

impl Default for SimulatorParameters {
    fn default() -> Self {
        Self::new(RoomSize::DEFAULT)
    }
}

impl Parameters for SimulatorParameters {
    fn count(&self) -> usize {
        4 + 4 * MAX_INPUTS
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_> {
        let array: [&dyn ParameterRef; 4] =
            [&self.topology, &self.array_x, &self.array_y, &self.array_z];
        Box::new(
            array
                .into_iter()
                .chain(self.inputs.iter().flat_map(InputParameters::as_refs)),
        )
    }
}

//! Dense packing of enabled inputs for the engine.

use dwmma_core::Buffer;

use crate::config::MAX_INPUTS;
use crate::engine::Position;
use crate::parameters::InputSlot;

/// The enabled inputs of one block, in slot order without gaps.
///
/// Signal `i` and position `i` belong to the same source. Disabled slots
/// contribute neither, and neither do enabled slots the host bus does not
/// carry.
#[derive(Debug, Clone, Copy)]
pub struct ActiveInputs<'a> {
    signals: [&'a [f32]; MAX_INPUTS],
    positions: [Position; MAX_INPUTS],
    slots: [usize; MAX_INPUTS],
    len: usize,
}

impl<'a> ActiveInputs<'a> {
    /// Pack the enabled slots of `buffer`'s main input.
    ///
    /// Input channel `i` carries slot `i`.
    pub fn pack(slots: &[InputSlot; MAX_INPUTS], buffer: &Buffer<'a>) -> Self {
        Self::pack_with(slots, buffer.num_input_channels(), |slot| buffer.input(slot))
    }

    /// Pack the enabled slots below `available`, reading each slot's signal
    /// from `signal`.
    pub fn pack_with(
        slots: &[InputSlot; MAX_INPUTS],
        available: usize,
        mut signal: impl FnMut(usize) -> &'a [f32],
    ) -> Self {
        let mut active = Self {
            signals: [&[]; MAX_INPUTS],
            positions: [Position::default(); MAX_INPUTS],
            slots: [0; MAX_INPUTS],
            len: 0,
        };
        let carried = slots.iter().enumerate().take(available);
        for (slot, input) in carried.filter(|(_, s)| s.enabled) {
            let i = active.len;
            active.signals[i] = signal(slot);
            active.positions[i] = input.position;
            active.slots[i] = slot;
            active.len += 1;
        }
        active
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
    pub fn signals(&self) -> &[&'a [f32]] {
        &self.signals[..self.len]
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions[..self.len]
    }

    /// Slot index each active input came from.
    #[inline]
    pub fn slots(&self) -> &[usize] {
        &self.slots[..self.len]
    }
}

//! Topology change and reset tracking.
//!
//! ```text
//!  Uninitialized --init ok--> Ready(T)
//!        |                      |  reset armed, or topology != T
//!        | init failed          v
//!        +----------------> PendingReinit --reinit ok--> Ready(T')
//!                               ^     |
//!                               +-----+ reinit failed (reset stays armed)
//! ```

use crate::topology::Topology;

/// Where the downstream chain stands relative to the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Nothing has been initialized yet.
    Uninitialized,
    /// Engine and tail are built for this topology.
    Ready(Topology),
    /// The chain must be rebuilt before the next engine call.
    PendingReinit,
}

/// Decides when the engine and tail must be rebuilt.
#[derive(Debug, Clone)]
pub struct ConfigSwitch {
    state: SwitchState,
    previous: Option<Topology>,
    reset_armed: bool,
    faulted: bool,
    reinit_count: u64,
}

impl ConfigSwitch {
    pub fn new() -> Self {
        Self {
            state: SwitchState::Uninitialized,
            previous: None,
            reset_armed: false,
            faulted: false,
            reinit_count: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Topology of the last successful initialization.
    #[inline]
    pub fn previous(&self) -> Option<Topology> {
        self.previous
    }

    #[inline]
    pub fn is_reset_armed(&self) -> bool {
        self.reset_armed
    }

    /// Whether an engine fault has occurred since the last good block.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Rebuilds completed out of [`SwitchState::PendingReinit`].
    #[inline]
    pub fn reinit_count(&self) -> u64 {
        self.reinit_count
    }

    /// Force a rebuild before the next engine call.
    ///
    /// Returns `true` if the reset was not already armed.
    pub fn arm_reset(&mut self) -> bool {
        let newly_armed = !self.reset_armed;
        self.reset_armed = true;
        if matches!(self.state, SwitchState::Ready(_)) {
            self.state = SwitchState::PendingReinit;
        }
        newly_armed
    }

    /// Whether the chain must be (re)built for `current` before processing.
    pub fn needs_init(&mut self, current: Topology) -> bool {
        match self.state {
            SwitchState::Ready(active) if active == current && !self.reset_armed => false,
            SwitchState::Ready(_) => {
                self.state = SwitchState::PendingReinit;
                true
            }
            SwitchState::Uninitialized | SwitchState::PendingReinit => true,
        }
    }

    /// Record a successful (re)initialization for `topology`.
    pub fn complete(&mut self, topology: Topology) {
        if self.state == SwitchState::PendingReinit {
            self.reinit_count += 1;
        }
        self.state = SwitchState::Ready(topology);
        self.previous = Some(topology);
        self.reset_armed = false;
    }

    /// Record a failed (re)initialization; the next block retries.
    ///
    /// Returns `true` on the transition into the faulted state.
    pub fn fail(&mut self) -> bool {
        self.state = SwitchState::PendingReinit;
        self.reset_armed = true;
        self.enter_fault()
    }

    /// Record an engine failure while processing; the next block rebuilds.
    ///
    /// Returns `true` on the transition into the faulted state.
    pub fn record_fault(&mut self) -> bool {
        self.arm_reset();
        self.enter_fault()
    }

    /// Record a block that ran the whole chain without error.
    pub fn mark_healthy(&mut self) {
        self.faulted = false;
    }

    fn enter_fault(&mut self) -> bool {
        let newly_faulted = !self.faulted;
        self.faulted = true;
        newly_faulted
    }
}

impl Default for ConfigSwitch {
    fn default() -> Self {
        Self::new()
    }
}

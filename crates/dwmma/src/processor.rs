//! The prepared processor and its per-block state machine.
//!
//! Every block runs the same sequence:
//!
//! 1. Check the host format. On mismatch, mute, arm a reset and stop.
//! 2. Rebuild engine and tail if the topology changed or a reset is armed.
//! 3. Pack the enabled inputs densely and make one engine call.
//! 4. Run the output stage, then mute every host channel it did not write.
//!
//! Failures are reported as a [`BlockOutcome`]; nothing on this path panics
//! or allocates.

use std::sync::Arc;

use dwmma_core::{
    AudioProcessor, AudioSetup, Buffer, HasParameters, Parameters, PluginError, PluginResult,
    ProcessContext,
};
use log::{debug, error, info, warn};

use crate::channel_buffer::ChannelBuffer;
use crate::config::{OperatingPoint, SimulatorConfig};
use crate::config_switch::ConfigSwitch;
use crate::engine::{EngineBlock, EngineSetup, Position, SilentEngine, SimulationEngine};
use crate::error::{EngineError, EngineResult, FormatMismatch};
use crate::format_guard::{FormatCheck, FormatGuard, HostFormat};
use crate::output::OutputStage;
use crate::parameters::SimulatorParameters;
use crate::plugin::SimulatorPlugin;
use crate::routing::ActiveInputs;
use crate::topology::{Topology, MAX_TOPOLOGY_CHANNELS};

/// What happened to one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The engine ran; `reinitialized` is set if the chain was rebuilt first.
    Processed { reinitialized: bool },
    /// The host format did not match; the block was muted.
    FormatRejected(FormatMismatch),
    /// Init or processing failed; the block was muted.
    EngineFault(EngineError),
}

/// The simulator in its prepared state.
pub struct SimulatorProcessor<E: SimulationEngine = SilentEngine> {
    parameters: Arc<SimulatorParameters>,
    engine: E,
    output: OutputStage,
    config: SimulatorConfig,
    setup: AudioSetup,
    guard: FormatGuard,
    switch: ConfigSwitch,
    /// One row per array channel of the active topology.
    array: ChannelBuffer,
}

impl<E: SimulationEngine> SimulatorProcessor<E> {
    pub(crate) fn new(
        parameters: Arc<SimulatorParameters>,
        engine: E,
        mut output: OutputStage,
        operating_point: OperatingPoint,
        setup: AudioSetup,
    ) -> Self {
        let config = SimulatorConfig::new()
            .with_operating_point(operating_point)
            .with_output_mode(output.mode());
        let block_size = config.operating_point.block_size;
        output.allocate(block_size);

        let mut processor = Self {
            parameters,
            engine,
            output,
            config,
            setup,
            guard: FormatGuard::new(&config),
            switch: ConfigSwitch::new(),
            array: ChannelBuffer::new(MAX_TOPOLOGY_CHANNELS, block_size),
        };

        let topology = processor.parameters.topology();
        // On failure the switch stays pending and the first block retries.
        let _ = processor.reinitialize(topology);
        processor
    }

    /// Process one block and report what happened.
    pub fn process_block(
        &mut self,
        buffer: &mut Buffer<'_>,
        context: &ProcessContext,
    ) -> BlockOutcome {
        let format = HostFormat::of_block(buffer, context);
        if let FormatCheck::Invalid(mismatch) = self.guard.check(&format) {
            buffer.clear_outputs();
            if self.switch.arm_reset() {
                warn!("Host format rejected ({}), muting until it matches", mismatch);
            }
            return BlockOutcome::FormatRejected(mismatch);
        }

        let topology = self.parameters.topology();
        let reinitialized = self.switch.needs_init(topology);
        if reinitialized {
            if let Err(err) = self.reinitialize(topology) {
                buffer.clear_outputs();
                return BlockOutcome::EngineFault(err);
            }
        }

        match self.run(topology, buffer) {
            Ok(written) => {
                buffer.clear_outputs_from(written);
                self.switch.mark_healthy();
                BlockOutcome::Processed { reinitialized }
            }
            Err(err) => {
                buffer.clear_outputs();
                if self.switch.record_fault() {
                    error!("Block muted: {}", err);
                }
                BlockOutcome::EngineFault(err)
            }
        }
    }

    /// Rebuild engine and tail before the next block.
    pub fn request_reset(&mut self) {
        if self.switch.arm_reset() {
            debug!("Reset requested");
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The host setup this processor was prepared with.
    pub fn setup(&self) -> &AudioSetup {
        &self.setup
    }

    pub fn switch(&self) -> &ConfigSwitch {
        &self.switch
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handle for writing parameters from another thread.
    pub fn shared_parameters(&self) -> Arc<SimulatorParameters> {
        Arc::clone(&self.parameters)
    }

    fn reinitialize(&mut self, topology: Topology) -> EngineResult<()> {
        let op = self.config.operating_point;
        let setup = EngineSetup::new(&op, topology);
        let result = self
            .engine
            .init(&setup)
            .and_then(|()| self.output.configure(topology, op.sample_rate));

        match result {
            Ok(()) => {
                self.array.set_channels(topology.channel_count());
                self.switch.complete(topology);
                info!(
                    "Engine initialized: {:?}, {} channels, {:?} output",
                    setup.topology,
                    topology.channel_count(),
                    self.output.mode()
                );
                Ok(())
            }
            Err(err) => {
                if self.switch.fail() {
                    error!("{}, muting until the engine recovers", err);
                }
                Err(err)
            }
        }
    }

    fn run(&mut self, topology: Topology, buffer: &mut Buffer<'_>) -> EngineResult<usize> {
        let slots = self.parameters.input_slots();
        let active = ActiveInputs::pack(&slots, buffer);
        let block = EngineBlock {
            inputs: active.signals(),
            positions: active.positions(),
            topology: topology.engine_topology(),
            interpolation: 1.0,
            array_position: Position::from(self.parameters.array_position()),
        };
        self.engine.process_interpolated(&block, &mut self.array)?;
        self.output.render(&self.array, buffer)
    }
}

impl<E: SimulationEngine> HasParameters for SimulatorProcessor<E> {
    type Parameters = SimulatorParameters;

    fn parameters(&self) -> &SimulatorParameters {
        &self.parameters
    }
}

impl<E: SimulationEngine + Default> AudioProcessor for SimulatorProcessor<E> {
    type Plugin = SimulatorPlugin<E>;

    fn process(&mut self, buffer: &mut Buffer, context: &ProcessContext) {
        self.process_block(buffer, context);
    }

    fn unprepare(self) -> SimulatorPlugin<E> {
        SimulatorPlugin::from_parts(
            self.parameters,
            self.engine,
            self.output.into_tail(),
            self.config.operating_point,
        )
    }

    fn load_state(&mut self, data: &[u8]) -> PluginResult<()> {
        let restored = self
            .parameters
            .load_state(data)
            .map_err(PluginError::StateError)?;
        debug!("Restored {} of {} parameters", restored, self.parameters.count());
        Ok(())
    }
}

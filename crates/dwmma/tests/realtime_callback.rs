//! Drives the prepared processor block by block with a recording engine.

use std::sync::{Arc, Mutex};

use dwmma::{
    AmbisonicOrder, AudioProcessor, AudioSetup, BinauralDecoder, BlockOutcome, Buffer, BusLayout,
    ChannelBuffer, EngineBlock, EngineError, EngineResult, EngineSetup, EngineTopology,
    FormatField, FormatMismatch, HasParameters, MicLayout, OperatingPoint, Parameters, Plugin,
    Position, ProcessContext, SilentEngine, SimulationEngine, SimulatorPlugin, SimulatorProcessor,
    SpatialEncoder, SwitchState, Topology, MAX_INPUTS,
};

const FRAMES: usize = 512;
const RATE: f64 = 48_000.0;

// =============================================================================
// Fakes
// =============================================================================

#[derive(Debug, Clone)]
struct Call {
    active: usize,
    first_samples: Vec<f32>,
    signal_lengths: Vec<usize>,
    positions: Vec<Position>,
    topology: EngineTopology,
    interpolation: f32,
    array_position: Position,
    output_channels: usize,
}

#[derive(Debug, Default)]
struct Recording {
    inits: Vec<EngineSetup>,
    calls: Vec<Call>,
    fail_init: bool,
    fail_process: bool,
}

/// Writes `ch + 1` to every sample of array channel `ch`.
#[derive(Default)]
struct RecordingEngine {
    recording: Arc<Mutex<Recording>>,
}

impl SimulationEngine for RecordingEngine {
    fn init(&mut self, setup: &EngineSetup) -> EngineResult<()> {
        let mut rec = self.recording.lock().unwrap();
        if rec.fail_init {
            return Err(EngineError::InitFailed {
                topology: setup.topology,
                reason: "out of memory",
            });
        }
        rec.inits.push(*setup);
        Ok(())
    }

    fn process_interpolated(
        &mut self,
        block: &EngineBlock<'_>,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()> {
        let mut rec = self.recording.lock().unwrap();
        rec.calls.push(Call {
            active: block.active_count(),
            first_samples: block.inputs.iter().map(|s| s[0]).collect(),
            signal_lengths: block.inputs.iter().map(|s| s.len()).collect(),
            positions: block.positions.to_vec(),
            topology: block.topology,
            interpolation: block.interpolation,
            array_position: block.array_position,
            output_channels: output.channels(),
        });
        if rec.fail_process {
            return Err(EngineError::ProcessFailed("mesh diverged"));
        }
        for ch in 0..output.channels() {
            output.channel_mut(ch).fill(ch as f32 + 1.0);
        }
        Ok(())
    }
}

/// Counts blocks since its last `init` and writes the count everywhere.
#[derive(Default)]
struct AccumulatingEngine {
    blocks: u32,
}

impl SimulationEngine for AccumulatingEngine {
    fn init(&mut self, _setup: &EngineSetup) -> EngineResult<()> {
        self.blocks = 0;
        Ok(())
    }

    fn process_interpolated(
        &mut self,
        _block: &EngineBlock<'_>,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()> {
        self.blocks += 1;
        for ch in 0..output.channels() {
            output.channel_mut(ch).fill(self.blocks as f32);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TailLog {
    encoder_orders: Vec<(usize, AmbisonicOrder)>,
    decoder_orders: Vec<(AmbisonicOrder, u32)>,
}

/// Sums the array into the W channel.
struct SumEncoder(Arc<Mutex<TailLog>>);

impl SpatialEncoder for SumEncoder {
    fn configure(&mut self, layout: &MicLayout, order: AmbisonicOrder) -> EngineResult<()> {
        self.0.lock().unwrap().encoder_orders.push((layout.len(), order));
        Ok(())
    }

    fn process(&mut self, array: &ChannelBuffer, output: &mut ChannelBuffer) -> EngineResult<()> {
        output.clear();
        for ch in 0..array.channels() {
            for (w, x) in output.channel_mut(0).iter_mut().zip(array.channel(ch)) {
                *w += x;
            }
        }
        Ok(())
    }
}

/// Left gets W, right gets -W.
struct MirrorDecoder(Arc<Mutex<TailLog>>);

impl BinauralDecoder for MirrorDecoder {
    fn configure(&mut self, order: AmbisonicOrder, sample_rate: u32) -> EngineResult<()> {
        self.0.lock().unwrap().decoder_orders.push((order, sample_rate));
        Ok(())
    }

    fn process(
        &mut self,
        harmonics: &ChannelBuffer,
        output: &mut ChannelBuffer,
    ) -> EngineResult<()> {
        output.channel_mut(0).copy_from_slice(harmonics.channel(0));
        for (r, w) in output.channel_mut(1).iter_mut().zip(harmonics.channel(0)) {
            *r = -w;
        }
        Ok(())
    }
}

// =============================================================================
// Host harness
// =============================================================================

struct Host {
    inputs: Vec<Vec<f32>>,
    outputs: Vec<Vec<f32>>,
    sample_rate: f64,
    frames: usize,
}

impl Host {
    /// Input slot `i` carries the constant `i + 1`; outputs hold stale data.
    fn new(input_channels: usize, output_channels: usize) -> Self {
        Self {
            inputs: (0..input_channels).map(|i| vec![i as f32 + 1.0; FRAMES]).collect(),
            outputs: vec![vec![7.0; FRAMES]; output_channels],
            sample_rate: RATE,
            frames: FRAMES,
        }
    }

    fn dirty_outputs(&mut self) {
        for out in &mut self.outputs {
            out.fill(7.0);
        }
    }

    fn run<E: SimulationEngine>(&mut self, processor: &mut SimulatorProcessor<E>) -> BlockOutcome {
        let mut buffer = Buffer::new(
            self.inputs.iter().map(|c| &c[..self.frames]),
            self.outputs.iter_mut().map(|c| &mut c[..]),
            self.frames,
        );
        processor.process_block(&mut buffer, &ProcessContext::new(self.sample_rate, self.frames))
    }

    fn output_is(&self, ch: usize, value: f32) -> bool {
        self.outputs[ch][..self.frames].iter().all(|&s| s == value)
    }
}

fn setup(outputs: u32) -> AudioSetup {
    AudioSetup {
        sample_rate: RATE,
        max_buffer_size: FRAMES,
        layout: BusLayout::new(MAX_INPUTS as u32, outputs),
    }
}

fn prepared() -> (SimulatorProcessor<RecordingEngine>, Arc<Mutex<Recording>>) {
    let plugin = SimulatorPlugin::<RecordingEngine>::default();
    let recording = Arc::clone(&plugin.engine().recording);
    (plugin.prepare(setup(30)), recording)
}

const PROCESSED: BlockOutcome = BlockOutcome::Processed {
    reinitialized: false,
};
const REINITIALIZED: BlockOutcome = BlockOutcome::Processed {
    reinitialized: true,
};

// =============================================================================
// Routing
// =============================================================================

#[test]
fn disabled_slots_never_reach_engine() {
    let (mut processor, recording) = prepared();
    let params = processor.shared_parameters();
    params.inputs[1].enabled.set(true);
    params.inputs[3].enabled.set(true);
    params.inputs[3].set_position([0.5, 0.5, 0.5]);

    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);

    let rec = recording.lock().unwrap();
    let call = &rec.calls[0];
    assert_eq!(call.active, 2);
    assert_eq!(call.first_samples, vec![2.0, 4.0]);
    assert_eq!(call.positions.len(), 2);
    assert_eq!(call.positions[1], Position::new(0.5, 0.5, 0.5));
    assert_eq!(call.positions[0], Position::from(params.input_position(1).unwrap()));
}

#[test]
fn no_enabled_inputs_still_runs_engine() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);
    let rec = recording.lock().unwrap();
    assert_eq!(rec.calls.len(), 1);
    assert_eq!(rec.calls[0].active, 0);
}

#[test]
fn enabled_slots_beyond_bus_width_are_skipped() {
    let plugin = SimulatorPlugin::<RecordingEngine>::default()
        .with_operating_point(OperatingPoint::new().with_input_channels(2));
    let recording = Arc::clone(&plugin.engine().recording);
    let mut processor = plugin.prepare(AudioSetup {
        layout: BusLayout::new(2, 30),
        ..setup(30)
    });
    let params = processor.shared_parameters();
    params.inputs[0].enabled.set(true);
    params.inputs[4].enabled.set(true);

    let mut host = Host::new(2, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);

    let rec = recording.lock().unwrap();
    assert_eq!(rec.calls[0].active, 1);
    assert_eq!(rec.calls[0].first_samples, vec![1.0]);
    assert_eq!(rec.calls[0].signal_lengths, vec![FRAMES]);
}

#[test]
fn engine_call_contract() {
    let (mut processor, recording) = prepared();
    let params = processor.shared_parameters();
    params.set_array_position([1.0, 2.0, 3.0]);

    let mut host = Host::new(MAX_INPUTS, 30);
    host.run(&mut processor);
    host.run(&mut processor);

    let rec = recording.lock().unwrap();
    assert_eq!(rec.calls.len(), 2);
    for call in &rec.calls {
        assert_eq!(call.interpolation, 1.0);
        assert_eq!(call.topology, EngineTopology::Octahedron1);
        assert_eq!(call.array_position, Position::new(1.0, 2.0, 3.0));
        assert_eq!(call.output_channels, 6);
    }
}

// =============================================================================
// Configuration switching
// =============================================================================

#[test]
fn unchanged_blocks_do_not_reinitialize() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert_eq!(processor.switch().reinit_count(), 0);
    assert_eq!(recording.lock().unwrap().inits.len(), 1);
}

#[test]
fn topology_change_reinitializes_once() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    host.run(&mut processor);

    processor.parameters().topology.set(Topology::ThirtyPoints);
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert_eq!(host.run(&mut processor), PROCESSED);

    assert_eq!(processor.switch().reinit_count(), 1);
    assert_eq!(processor.switch().previous(), Some(Topology::ThirtyPoints));
    assert_eq!(processor.switch().state(), SwitchState::Ready(Topology::ThirtyPoints));

    let rec = recording.lock().unwrap();
    assert_eq!(rec.inits.len(), 2);
    assert_eq!(rec.inits[1].topology, EngineTopology::Sphere30);
    assert_eq!(rec.calls.last().map(|c| c.output_channels), Some(30));
}

#[test]
fn explicit_reset_reinitializes_next_block() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    processor.request_reset();
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert_eq!(recording.lock().unwrap().inits.len(), 2);
}

#[test]
fn every_reinit_starts_from_clean_engine_state() {
    let plugin = SimulatorPlugin::<AccumulatingEngine>::default();
    let mut processor = plugin.prepare(setup(30));
    let mut host = Host::new(MAX_INPUTS, 30);

    for _ in 0..3 {
        assert_eq!(host.run(&mut processor), PROCESSED);
    }
    assert!(host.output_is(0, 3.0));

    processor.parameters().topology.set(Topology::SixPointsFar);
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!(host.output_is(0, 1.0));
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert!(host.output_is(0, 2.0));

    host.sample_rate = 44_100.0;
    assert!(matches!(host.run(&mut processor), BlockOutcome::FormatRejected(_)));
    host.sample_rate = RATE;
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!(host.output_is(0, 1.0));

    host.run(&mut processor);
    processor.request_reset();
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!(host.output_is(0, 1.0));
    assert_eq!(processor.engine().blocks, 1);
}

// =============================================================================
// Format guard
// =============================================================================

#[test]
fn format_violation_round_trip() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);

    host.sample_rate = 44_100.0;
    assert_eq!(
        host.run(&mut processor),
        BlockOutcome::FormatRejected(FormatMismatch::new(FormatField::SampleRate, 48_000, 44_100))
    );
    assert!((0..30).all(|ch| host.output_is(ch, 0.0)));
    assert!(processor.switch().is_reset_armed());

    // still wrong: stays muted, nothing else happens
    host.dirty_outputs();
    assert!(matches!(host.run(&mut processor), BlockOutcome::FormatRejected(_)));
    assert!((0..30).all(|ch| host.output_is(ch, 0.0)));

    host.sample_rate = RATE;
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert_eq!(host.run(&mut processor), PROCESSED);

    assert_eq!(processor.switch().reinit_count(), 1);
    let rec = recording.lock().unwrap();
    assert_eq!(rec.inits.len(), 2);
    assert_eq!(rec.calls.len(), 2);
}

#[test]
fn wrong_block_size_and_widths_are_rejected() {
    let (mut processor, recording) = prepared();

    let mut host = Host::new(MAX_INPUTS, 30);
    host.frames = 256;
    assert_eq!(
        host.run(&mut processor),
        BlockOutcome::FormatRejected(FormatMismatch::new(FormatField::BlockSize, 512, 256))
    );

    let mut host = Host::new(2, 30);
    assert_eq!(
        host.run(&mut processor),
        BlockOutcome::FormatRejected(FormatMismatch::new(FormatField::InputChannels, 6, 2))
    );

    let mut host = Host::new(MAX_INPUTS, 2);
    assert!(matches!(host.run(&mut processor), BlockOutcome::FormatRejected(_)));
    assert!(host.output_is(0, 0.0) && host.output_is(1, 0.0));

    assert!(recording.lock().unwrap().calls.is_empty());
}

// =============================================================================
// Output shaping
// =============================================================================

#[test]
fn outputs_beyond_topology_are_muted() {
    let (mut processor, _) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert!((0..6).all(|ch| host.output_is(ch, ch as f32 + 1.0)));
    assert!((6..30).all(|ch| host.output_is(ch, 0.0)));

    processor.parameters().topology.set(Topology::ThirtyPoints);
    host.run(&mut processor);
    assert!((0..30).all(|ch| host.output_is(ch, ch as f32 + 1.0)));

    // back to six channels with stale samples left in the upper outputs
    processor.parameters().topology.set(Topology::SixPointsFar);
    host.dirty_outputs();
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!((0..6).all(|ch| host.output_is(ch, ch as f32 + 1.0)));
    assert!((6..30).all(|ch| host.output_is(ch, 0.0)));
}

#[test]
fn binaural_mode_writes_two_channels() {
    let log = Arc::new(Mutex::new(TailLog::default()));
    let plugin = SimulatorPlugin::<RecordingEngine>::default()
        .with_binaural(SumEncoder(Arc::clone(&log)), MirrorDecoder(Arc::clone(&log)));
    let mut processor = plugin.prepare(setup(2));
    let mut host = Host::new(MAX_INPUTS, 2);

    assert_eq!(host.run(&mut processor), PROCESSED);
    // 1 + 2 + ... + 6
    assert!(host.output_is(0, 21.0));
    assert!(host.output_is(1, -21.0));

    processor.parameters().topology.set(Topology::ThirtyPoints);
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!(host.output_is(0, 465.0));

    let log = log.lock().unwrap();
    assert_eq!(
        log.encoder_orders,
        vec![(6, AmbisonicOrder::First), (30, AmbisonicOrder::Fourth)]
    );
    assert_eq!(
        log.decoder_orders,
        vec![(AmbisonicOrder::First, 48_000), (AmbisonicOrder::Fourth, 48_000)]
    );
}

// =============================================================================
// Faults
// =============================================================================

#[test]
fn engine_fault_mutes_and_rearms() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    recording.lock().unwrap().fail_process = true;

    assert_eq!(
        host.run(&mut processor),
        BlockOutcome::EngineFault(EngineError::ProcessFailed("mesh diverged"))
    );
    assert!((0..30).all(|ch| host.output_is(ch, 0.0)));
    assert!(processor.switch().is_reset_armed());

    recording.lock().unwrap().fail_process = false;
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert!(host.output_is(0, 1.0));
    assert!(!processor.switch().is_reset_armed());
}

#[test]
fn failed_reinit_retries_next_block() {
    let (mut processor, recording) = prepared();
    let mut host = Host::new(MAX_INPUTS, 30);
    recording.lock().unwrap().fail_init = true;
    processor.parameters().topology.set(Topology::ThirtyPoints);

    assert_eq!(
        host.run(&mut processor),
        BlockOutcome::EngineFault(EngineError::InitFailed {
            topology: EngineTopology::Sphere30,
            reason: "out of memory",
        })
    );
    assert!((0..30).all(|ch| host.output_is(ch, 0.0)));
    assert_eq!(processor.switch().state(), SwitchState::PendingReinit);
    assert_eq!(processor.switch().previous(), Some(Topology::SixPointsNear));
    assert!(recording.lock().unwrap().calls.is_empty());

    recording.lock().unwrap().fail_init = false;
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert_eq!(processor.switch().previous(), Some(Topology::ThirtyPoints));
    assert_eq!(processor.switch().reinit_count(), 1);
}

#[test]
fn failed_prepare_init_retries_on_first_block() {
    let plugin = SimulatorPlugin::<RecordingEngine>::default();
    let recording = Arc::clone(&plugin.engine().recording);
    recording.lock().unwrap().fail_init = true;
    let mut processor = plugin.prepare(setup(30));
    assert_eq!(processor.switch().state(), SwitchState::PendingReinit);

    recording.lock().unwrap().fail_init = false;
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), REINITIALIZED);
    assert_eq!(processor.switch().state(), SwitchState::Ready(Topology::SixPointsNear));
}

// =============================================================================
// Lifecycle and state
// =============================================================================

#[test]
fn state_round_trip_through_processor() {
    let (source, _) = prepared();
    source.parameters().topology.set(Topology::SixPointsFar);
    source.parameters().inputs[2].enabled.set(true);
    source.parameters().inputs[2].set_position([1.25, 0.5, 4.0]);
    let state = source.save_state().unwrap();

    let (mut target, recording) = prepared();
    target.load_state(&state).unwrap();
    assert_eq!(target.parameters().topology(), Topology::SixPointsFar);
    assert!(target.parameters().input_enabled(2));
    assert_eq!(
        target.parameters().input_position(2),
        Some([1.25, 0.5, 4.0])
    );

    // the restored topology is picked up on the next block
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut target), REINITIALIZED);
    assert_eq!(recording.lock().unwrap().inits[1].topology, EngineTopology::Octahedron3);
    assert_eq!(target.parameters().count(), 28);
}

#[test]
fn unprepare_and_prepare_keep_parameters() {
    let (processor, _) = prepared();
    processor.parameters().inputs[5].enabled.set(true);
    processor.parameters().topology.set(Topology::ThirtyPoints);

    let plugin = processor.unprepare();
    assert!(plugin.parameters().input_enabled(5));

    let processor = plugin.prepare(setup(30));
    assert_eq!(processor.switch().previous(), Some(Topology::ThirtyPoints));
    assert!(processor.parameters().input_enabled(5));
}

#[test]
fn silent_engine_outputs_silence() {
    let plugin: SimulatorPlugin = SimulatorPlugin::default();
    plugin.parameters().inputs[0].enabled.set(true);
    let mut processor: SimulatorProcessor<SilentEngine> = plugin.prepare(setup(30));
    let mut host = Host::new(MAX_INPUTS, 30);
    assert_eq!(host.run(&mut processor), PROCESSED);
    assert!((0..30).all(|ch| host.output_is(ch, 0.0)));
}

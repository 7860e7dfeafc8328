//! The simulator in its unprepared state.

use std::sync::Arc;

use dwmma_core::{AudioSetup, BusInfo, HasParameters, Plugin};
use log::info;

use crate::config::{OperatingPoint, OutputMode, SimulatorConfig, CONFIG};
use crate::engine::{BinauralDecoder, SilentEngine, SimulationEngine, SpatialEncoder};
use crate::output::{BinauralTail, OutputStage};
use crate::parameters::SimulatorParameters;
use crate::processor::SimulatorProcessor;

/// Unprepared simulator: parameters, the engine value and the optional
/// binaural tail.
///
/// ```
/// use dwmma::{AudioSetup, BusLayout, Plugin, SimulatorPlugin};
///
/// let plugin: SimulatorPlugin = SimulatorPlugin::default();
/// let layout = BusLayout::from_plugin(&plugin);
/// assert_eq!(layout, BusLayout::new(6, 30));
///
/// let processor = plugin.prepare(AudioSetup {
///     sample_rate: 48_000.0,
///     max_buffer_size: 512,
///     layout,
/// });
/// assert_eq!(processor.switch().reinit_count(), 0);
/// ```
pub struct SimulatorPlugin<E: SimulationEngine = SilentEngine> {
    parameters: Arc<SimulatorParameters>,
    engine: E,
    tail: Option<BinauralTail>,
    operating_point: OperatingPoint,
}

impl<E: SimulationEngine> SimulatorPlugin<E> {
    /// Direct-output plugin around `engine` at the default operating point.
    ///
    /// Any engine can be wrapped, but [`Plugin`] requires `Default`, so
    /// `prepare` and `unprepare` are only available when `E: Default`. An
    /// engine with constructor arguments needs a `Default` that leaves it
    /// unconfigured; its mesh is built by `init` in `prepare` either way.
    pub fn new(engine: E) -> Self {
        let operating_point = OperatingPoint::new();
        Self {
            parameters: Arc::new(SimulatorParameters::new(operating_point.room)),
            engine,
            tail: None,
            operating_point,
        }
    }

    /// Run at a different operating point.
    ///
    /// Rebuilds the parameters for the new room, so call this before
    /// handing out [`shared_parameters`](Self::shared_parameters).
    pub fn with_operating_point(mut self, operating_point: OperatingPoint) -> Self {
        if operating_point.room != self.operating_point.room {
            self.parameters = Arc::new(SimulatorParameters::new(operating_point.room));
        }
        self.operating_point = operating_point;
        self
    }

    /// Decode the array to two ear signals instead of writing it directly.
    pub fn with_binaural(
        mut self,
        encoder: impl SpatialEncoder,
        decoder: impl BinauralDecoder,
    ) -> Self {
        self.tail = Some(BinauralTail::new(Box::new(encoder), Box::new(decoder)));
        self
    }

    pub fn config(&self) -> SimulatorConfig {
        let output_mode = if self.tail.is_some() {
            OutputMode::Binaural
        } else {
            OutputMode::Direct
        };
        SimulatorConfig::new()
            .with_operating_point(self.operating_point)
            .with_output_mode(output_mode)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handle for writing parameters from another thread.
    pub fn shared_parameters(&self) -> Arc<SimulatorParameters> {
        Arc::clone(&self.parameters)
    }

    pub(crate) fn from_parts(
        parameters: Arc<SimulatorParameters>,
        engine: E,
        tail: Option<BinauralTail>,
        operating_point: OperatingPoint,
    ) -> Self {
        Self {
            parameters,
            engine,
            tail,
            operating_point,
        }
    }
}

impl<E: SimulationEngine + Default> Default for SimulatorPlugin<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: SimulationEngine> HasParameters for SimulatorPlugin<E> {
    type Parameters = SimulatorParameters;

    fn parameters(&self) -> &SimulatorParameters {
        &self.parameters
    }
}

impl<E: SimulationEngine + Default> Plugin for SimulatorPlugin<E> {
    type Processor = SimulatorProcessor<E>;

    fn prepare(self, setup: AudioSetup) -> SimulatorProcessor<E> {
        let config = self.config();
        info!(
            "{} {} preparing: host {} Hz / {} frames, engine {} Hz / {} frames, {:?} output",
            CONFIG.name,
            CONFIG.version,
            setup.sample_rate,
            setup.max_buffer_size,
            config.operating_point.sample_rate,
            config.operating_point.block_size,
            config.output_mode,
        );
        SimulatorProcessor::new(
            self.parameters,
            self.engine,
            OutputStage::new(self.tail),
            self.operating_point,
            setup,
        )
    }

    fn input_bus_info(&self, index: usize) -> Option<BusInfo> {
        (index == 0).then(|| BusInfo::main("Sources", self.operating_point.input_channels as u32))
    }

    fn output_bus_info(&self, index: usize) -> Option<BusInfo> {
        let config = self.config();
        let name = match config.output_mode {
            OutputMode::Direct => "Array",
            OutputMode::Binaural => "Binaural",
        };
        (index == 0).then(|| BusInfo::main(name, config.required_output_channels() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_buffer::ChannelBuffer;
    use crate::error::EngineResult;
    use crate::topology::{AmbisonicOrder, MicLayout, Topology};
    use dwmma_core::{AudioProcessor, BusLayout, ParameterRef, Parameters};

    struct NullEncoder;

    impl SpatialEncoder for NullEncoder {
        fn configure(&mut self, _: &MicLayout, _: AmbisonicOrder) -> EngineResult<()> {
            Ok(())
        }

        fn process(&mut self, _: &ChannelBuffer, output: &mut ChannelBuffer) -> EngineResult<()> {
            output.clear();
            Ok(())
        }
    }

    struct NullDecoder;

    impl BinauralDecoder for NullDecoder {
        fn configure(&mut self, _: AmbisonicOrder, _: u32) -> EngineResult<()> {
            Ok(())
        }

        fn process(&mut self, _: &ChannelBuffer, output: &mut ChannelBuffer) -> EngineResult<()> {
            output.clear();
            Ok(())
        }
    }

    fn setup(layout: BusLayout) -> AudioSetup {
        AudioSetup {
            sample_rate: 48_000.0,
            max_buffer_size: 512,
            layout,
        }
    }

    #[test]
    fn buses_follow_output_mode() {
        let plugin = SimulatorPlugin::<SilentEngine>::default();
        assert_eq!(plugin.input_bus_info(0).map(|b| b.channel_count), Some(6));
        assert_eq!(plugin.output_bus_info(0).map(|b| b.name), Some("Array"));
        assert!(plugin.input_bus_info(1).is_none());
        assert!(plugin.is_layout_supported(&BusLayout::new(6, 30)));
        assert!(!plugin.is_layout_supported(&BusLayout::new(6, 2)));

        let plugin = plugin.with_binaural(NullEncoder, NullDecoder);
        assert_eq!(plugin.config().output_mode, OutputMode::Binaural);
        assert_eq!(plugin.output_bus_info(0), Some(BusInfo::main("Binaural", 2)));
    }

    #[test]
    fn prepare_initializes_engine() {
        let plugin = SimulatorPlugin::<SilentEngine>::default();
        plugin.parameters().topology.set(Topology::SixPointsFar);
        let processor = plugin.prepare(setup(BusLayout::new(6, 30)));
        let engine_setup = processor.engine().setup().copied().unwrap();
        assert_eq!(engine_setup.junction_distance, 3);
        assert_eq!(processor.switch().previous(), Some(Topology::SixPointsFar));
    }

    #[test]
    fn unprepare_keeps_parameters_and_tail() {
        let plugin =
            SimulatorPlugin::<SilentEngine>::default().with_binaural(NullEncoder, NullDecoder);
        let shared = plugin.shared_parameters();
        let processor = plugin.prepare(setup(BusLayout::new(6, 2)));
        shared.inputs[0].enabled.set(true);

        let plugin = processor.unprepare();
        assert!(plugin.parameters().input_enabled(0));
        assert_eq!(plugin.config().output_mode, OutputMode::Binaural);
        assert!(Arc::ptr_eq(&shared, &plugin.shared_parameters()));
    }

    #[test]
    fn operating_point_room_rebuilds_ranges() {
        let room = crate::config::RoomSize::new(10.0, 3.0, 5.0);
        let plugin = SimulatorPlugin::<SilentEngine>::default()
            .with_operating_point(OperatingPoint::new().with_room(room));
        let x = plugin.parameters().by_key("ma_pos_x").unwrap();
        assert_eq!(x.get_plain(), 5.0);
    }
}

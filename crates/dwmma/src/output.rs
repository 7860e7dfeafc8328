//! Output stages: what happens between the engine and the host bus.

use dwmma_core::Buffer;

use crate::channel_buffer::ChannelBuffer;
use crate::config::OutputMode;
use crate::engine::{BinauralDecoder, SpatialEncoder};
use crate::error::EngineResult;
use crate::topology::{AmbisonicOrder, Topology};

/// Encoder and decoder that reduce the array to two ear signals.
pub struct BinauralTail {
    encoder: Box<dyn SpatialEncoder>,
    decoder: Box<dyn BinauralDecoder>,
    harmonics: ChannelBuffer,
    ears: ChannelBuffer,
}

impl BinauralTail {
    pub fn new(encoder: Box<dyn SpatialEncoder>, decoder: Box<dyn BinauralDecoder>) -> Self {
        Self {
            encoder,
            decoder,
            harmonics: ChannelBuffer::new(0, 0),
            ears: ChannelBuffer::new(0, 0),
        }
    }

    /// Size the scratch buffers for `block_size` frames at the highest order.
    fn allocate(&mut self, block_size: usize) {
        self.harmonics = ChannelBuffer::new(AmbisonicOrder::Fourth.channel_count(), block_size);
        self.ears = ChannelBuffer::new(2, block_size);
    }

    fn configure(&mut self, topology: Topology, sample_rate: u32) -> EngineResult<()> {
        let order = topology.ambisonic_order();
        self.harmonics.set_channels(order.channel_count());
        self.encoder.configure(&topology.mic_layout(), order)?;
        self.decoder.configure(order, sample_rate)
    }

    fn render(&mut self, array: &ChannelBuffer) -> EngineResult<&ChannelBuffer> {
        self.encoder.process(array, &mut self.harmonics)?;
        self.decoder.process(&self.harmonics, &mut self.ears)?;
        Ok(&self.ears)
    }
}

/// The stage selected by [`OutputMode`].
pub enum OutputStage {
    Direct,
    Binaural(BinauralTail),
}

impl OutputStage {
    pub fn new(tail: Option<BinauralTail>) -> Self {
        tail.map_or(Self::Direct, Self::Binaural)
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            Self::Direct => OutputMode::Direct,
            Self::Binaural(_) => OutputMode::Binaural,
        }
    }

    pub fn into_tail(self) -> Option<BinauralTail> {
        match self {
            Self::Direct => None,
            Self::Binaural(tail) => Some(tail),
        }
    }

    /// Allocate scratch storage. Called at prepare time only.
    pub fn allocate(&mut self, block_size: usize) {
        if let Self::Binaural(tail) = self {
            tail.allocate(block_size);
        }
    }

    /// Reconfigure for a new topology.
    pub fn configure(&mut self, topology: Topology, sample_rate: u32) -> EngineResult<()> {
        match self {
            Self::Direct => Ok(()),
            Self::Binaural(tail) => tail.configure(topology, sample_rate),
        }
    }

    /// Write one block of `array` signals to the host bus.
    ///
    /// Returns the number of leading output channels written. Channels past
    /// that are left for the caller to mute.
    pub fn render(
        &mut self,
        array: &ChannelBuffer,
        buffer: &mut Buffer<'_>,
    ) -> EngineResult<usize> {
        let source = match self {
            Self::Direct => array,
            Self::Binaural(tail) => tail.render(array)?,
        };
        Ok(copy_channels(source, buffer))
    }
}

/// Copy leading channels of `source` to the host outputs.
fn copy_channels(source: &ChannelBuffer, buffer: &mut Buffer<'_>) -> usize {
    let count = source.channels().min(buffer.num_output_channels());
    for ch in 0..count {
        let input = source.channel(ch);
        if let Some(output) = buffer.output_checked(ch) {
            let n = output.len().min(input.len());
            output[..n].copy_from_slice(&input[..n]);
            output[n..].fill(0.0);
        }
    }
    count
}

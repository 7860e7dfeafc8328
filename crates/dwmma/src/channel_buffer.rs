//! Planar scratch storage for multichannel blocks.

/// Fixed-capacity planar buffer: `capacity` channels of `frames` samples.
///
/// Storage is allocated once. The number of channels in use can shrink and
/// grow within the capacity without reallocating, so a topology switch on
/// the audio thread stays allocation-free.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    data: Vec<f32>,
    capacity: usize,
    channels: usize,
    frames: usize,
}

impl ChannelBuffer {
    /// Allocate `capacity` zeroed channels of `frames` samples, all in use.
    pub fn new(capacity: usize, frames: usize) -> Self {
        Self {
            data: vec![0.0; capacity * frames],
            capacity,
            channels: capacity,
            frames,
        }
    }

    /// Channels currently in use.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Change the number of channels in use, capped at the capacity.
    ///
    /// Returns the resulting channel count.
    pub fn set_channels(&mut self, channels: usize) -> usize {
        self.channels = channels.min(self.capacity);
        self.channels
    }

    /// Samples of channel `index`; empty if the channel is not in use.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        if index < self.channels {
            &self.data[index * self.frames..(index + 1) * self.frames]
        } else {
            &[]
        }
    }

    /// Mutable samples of channel `index`; empty if the channel is not in use.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        if index < self.channels {
            &mut self.data[index * self.frames..(index + 1) * self.frames]
        } else {
            &mut []
        }
    }

    /// Zero every channel in use.
    pub fn clear(&mut self) {
        let used = self.channels * self.frames;
        self.data[..used].fill(0.0);
    }
}

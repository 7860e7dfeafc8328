//! Audio buffer abstraction for plugin processing.
//!
//! [`Buffer`] wraps the host's channel slices for the main bus. It stores them
//! in fixed-size arrays so construction and use never touch the heap, which
//! keeps it usable from the real-time callback.
//!
//! # Example
//!
//! ```
//! use dwmma_core::Buffer;
//!
//! let input = [0.5f32; 4];
//! let mut left = [1.0f32; 4];
//! let mut right = [1.0f32; 4];
//!
//! let mut buffer = Buffer::new([&input[..]], [&mut left[..], &mut right[..]], 4);
//! buffer.clear_outputs_from(1);
//! assert_eq!(buffer.output_checked(0).unwrap(), &[1.0; 4]);
//! assert_eq!(buffer.output_checked(1).unwrap(), &[0.0; 4]);
//! ```

use crate::types::MAX_CHANNELS;

/// Main audio buffer for plugin processing.
///
/// Holds input and output channel slices of the main bus for one block.
/// The `'a` lifetime ties the buffer to the host's audio data; a buffer is
/// only valid within a single `process()` call.
pub struct Buffer<'a> {
    /// Input channel slices (immutable audio from host)
    inputs: [Option<&'a [f32]>; MAX_CHANNELS],
    /// Output channel slices (mutable audio to host)
    outputs: [Option<&'a mut [f32]>; MAX_CHANNELS],
    num_input_channels: usize,
    num_output_channels: usize,
    num_samples: usize,
}

impl<'a> Buffer<'a> {
    /// Create a new buffer from channel slices.
    ///
    /// Channels beyond [`MAX_CHANNELS`] are silently ignored. Every slice must
    /// hold at least `num_samples` samples.
    #[inline]
    pub fn new(
        inputs: impl IntoIterator<Item = &'a [f32]>,
        outputs: impl IntoIterator<Item = &'a mut [f32]>,
        num_samples: usize,
    ) -> Self {
        let mut input_arr: [Option<&'a [f32]>; MAX_CHANNELS] = [None; MAX_CHANNELS];
        let mut num_input_channels = 0;
        for (i, slice) in inputs.into_iter().take(MAX_CHANNELS).enumerate() {
            input_arr[i] = Some(slice);
            num_input_channels = i + 1;
        }

        // &mut slices are not Copy, so [None; N] is not available here
        let mut output_arr: [Option<&'a mut [f32]>; MAX_CHANNELS] =
            std::array::from_fn(|_| None);
        let mut num_output_channels = 0;
        for (i, slice) in outputs.into_iter().take(MAX_CHANNELS).enumerate() {
            output_arr[i] = Some(slice);
            num_output_channels = i + 1;
        }

        Self {
            inputs: input_arr,
            outputs: output_arr,
            num_input_channels,
            num_output_channels,
            num_samples,
        }
    }

    /// Number of samples in this processing block.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of input channels.
    #[inline]
    pub fn num_input_channels(&self) -> usize {
        self.num_input_channels
    }

    /// Number of output channels.
    #[inline]
    pub fn num_output_channels(&self) -> usize {
        self.num_output_channels
    }

    /// Get an input channel by index.
    ///
    /// Returns an empty slice if the channel doesn't exist.
    #[inline]
    pub fn input(&self, channel: usize) -> &'a [f32] {
        self.inputs
            .get(channel)
            .copied()
            .flatten()
            .map(|ch| &ch[..self.num_samples.min(ch.len())])
            .unwrap_or(&[])
    }

    /// Try to get a mutable output channel by index.
    ///
    /// Returns `None` if the channel doesn't exist.
    #[inline]
    pub fn output_checked(&mut self, channel: usize) -> Option<&mut [f32]> {
        let n = self.num_samples;
        self.outputs
            .get_mut(channel)
            .and_then(|opt| opt.as_mut())
            .map(|ch| {
                let len = n.min(ch.len());
                &mut ch[..len]
            })
    }

    /// Clear all output channels to silence.
    pub fn clear_outputs(&mut self) {
        self.clear_outputs_from(0);
    }

    /// Clear every output channel from `first` to the end of the bus.
    ///
    /// Channels below `first` are left untouched.
    pub fn clear_outputs_from(&mut self, first: usize) {
        let n = self.num_samples;
        let end = self.num_output_channels;
        if first >= end {
            return;
        }
        for opt in self.outputs[first..end].iter_mut() {
            if let Some(output) = opt.as_mut() {
                let len = n.min(output.len());
                output[..len].fill(0.0);
            }
        }
    }
}

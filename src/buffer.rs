use crate::error::{Error, Result};
use crate::format::AudioSpec;

/// Planar PCM samples: one owned sequence per channel, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer<S> {
    sample_rate: u32,
    bits_per_sample: u16,
    channels: Vec<Vec<S>>,
}

/// Integer samples in the file's quantization domain. 8-bit samples keep
/// their stored unsigned value (0..=255).
pub type NativeBuffer = PcmBuffer<i32>;

/// Samples scaled to [-1.0, 1.0].
pub type NormalizedBuffer = PcmBuffer<f64>;

impl<S> PcmBuffer<S> {
    /// Builds a buffer from per-channel sequences.
    ///
    /// Only mono and stereo are accepted, and every channel must have the
    /// same length. The bit depth is checked when the buffer is encoded.
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: Vec<Vec<S>>) -> Result<Self> {
        if !(1..=2).contains(&channels.len()) {
            return Err(Error::UnsupportedChannelCount(
                channels.len().min(u16::MAX as usize) as u16,
            ));
        }
        let expected = channels[0].len();
        if let Some(other) = channels.iter().find(|c| c.len() != expected) {
            return Err(Error::ChannelLengthMismatch {
                expected,
                found: other.len(),
            });
        }
        Ok(Self {
            sample_rate,
            bits_per_sample,
            channels,
        })
    }

    pub fn mono(sample_rate: u32, bits_per_sample: u16, samples: Vec<S>) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels: vec![samples],
        }
    }

    pub fn stereo(
        sample_rate: u32,
        bits_per_sample: u16,
        left: Vec<S>,
        right: Vec<S>,
    ) -> Result<Self> {
        Self::new(sample_rate, bits_per_sample, vec![left, right])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn num_channels(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn spec(&self) -> AudioSpec {
        AudioSpec {
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            num_channels: self.num_channels(),
            num_frames: self.num_frames(),
        }
    }

    pub fn channel(&self, index: usize) -> Option<&[S]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [S]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    pub fn channels(&self) -> &[Vec<S>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<S>> {
        self.channels
    }

    /// Retargets the bit depth used when the buffer is written.
    pub fn set_bits_per_sample(&mut self, bits_per_sample: u16) {
        self.bits_per_sample = bits_per_sample;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_buffer_reports_audio_spec() {
        let buffer = NativeBuffer::stereo(44100, 16, vec![1, 2, 3], vec![4, 5, 6]).unwrap();
        let spec = buffer.spec();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.num_channels, 2);
        assert_eq!(spec.num_frames, 3);
        assert_eq!(buffer.channel(1), Some(&[4, 5, 6][..]));
        assert_eq!(buffer.channel(2), None);
    }

    #[test]
    fn rejects_unsupported_channel_counts() {
        match NativeBuffer::new(8000, 16, vec![]) {
            Err(Error::UnsupportedChannelCount(0)) => {}
            other => panic!("Expected UnsupportedChannelCount, got {:?}", other),
        }
        match NativeBuffer::new(8000, 16, vec![vec![0]; 3]) {
            Err(Error::UnsupportedChannelCount(3)) => {}
            other => panic!("Expected UnsupportedChannelCount, got {:?}", other),
        }
    }

    #[test]
    fn rejects_ragged_channels() {
        match NormalizedBuffer::stereo(8000, 16, vec![0.0; 4], vec![0.0; 3]) {
            Err(Error::ChannelLengthMismatch {
                expected: 4,
                found: 3,
            }) => {}
            other => panic!("Expected ChannelLengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn empty_mono_buffer_has_no_frames() {
        let buffer = NativeBuffer::mono(8000, 8, Vec::new());
        assert_eq!(buffer.num_frames(), 0);
        assert_eq!(buffer.spec().duration_seconds(), 0.0);
    }
}

use crate::buffer::{NativeBuffer, NormalizedBuffer, PcmBuffer};
use crate::error::Result;
use crate::format::{SampleCodec, SampleFormat};

/// Converts normalized samples to the native domain of the buffer's bit depth.
///
/// Values are clamped to [-1, 1] and rounded half up onto the native grid.
/// 8-bit output is unsigned (0..=255); wider formats are signed.
pub fn quantize(normalized: &NormalizedBuffer) -> Result<NativeBuffer> {
    let codec = SampleFormat::try_from(normalized.bits_per_sample())?.codec();
    let channels = normalized
        .channels()
        .iter()
        .map(|channel| channel.iter().map(|&x| codec.from_normalized(x)).collect())
        .collect();
    PcmBuffer::new(normalized.sample_rate(), normalized.bits_per_sample(), channels)
}

/// Merges per-channel sequences into frame order. Only frames present in
/// every channel are emitted.
pub fn interleave<S: Copy>(channels: &[Vec<S>]) -> Vec<S> {
    let num_frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut samples = Vec::with_capacity(num_frames * channels.len());
    for frame in 0..num_frames {
        samples.extend(channels.iter().map(|channel| channel[frame]));
    }
    samples
}

/// Serializes native samples little-endian, clipping each one to the
/// representable range first. 24-bit samples keep their low three bytes.
pub fn encode_samples(format: SampleFormat, samples: &[i32]) -> Vec<u8> {
    let codec = format.codec();
    let mut bytes = Vec::with_capacity(samples.len() * codec.width());
    for &sample in samples {
        codec.encode_sample(sample, &mut bytes);
    }
    bytes
}

use tracing::warn;

use crate::buffer::{NativeBuffer, NormalizedBuffer, PcmBuffer};
use crate::error::{Error, Result};
use crate::format::{SampleCodec, SampleFormat};
use crate::scanner::FormatChunk;

/// Decodes interleaved little-endian sample bytes into native integers.
/// Trailing bytes that do not form a whole sample are dropped.
pub fn decode_samples(format: SampleFormat, bytes: &[u8]) -> Vec<i32> {
    let codec = format.codec();
    let width = codec.width();
    let remainder = bytes.len() % width;
    if remainder != 0 {
        warn!(
            len = bytes.len(),
            width,
            remainder,
            "data size is not a multiple of the sample width, trailing bytes dropped"
        );
    }
    bytes
        .chunks_exact(width)
        .map(|sample| codec.read_sample(sample))
        .collect()
}

/// Splits interleaved samples into per-channel sequences in channel order.
/// An incomplete trailing frame is dropped.
pub fn deinterleave<S: Copy>(samples: &[S], num_channels: u16) -> Result<Vec<Vec<S>>> {
    if !(1..=2).contains(&num_channels) {
        return Err(Error::UnsupportedChannelCount(num_channels));
    }
    let stride = num_channels as usize;
    let num_frames = samples.len() / stride;
    if samples.len() % stride != 0 {
        warn!(
            samples = samples.len(),
            num_channels, "incomplete trailing frame dropped"
        );
    }

    let channels = (0..stride)
        .map(|channel| {
            (0..num_frames)
                .map(|frame| samples[frame * stride + channel])
                .collect()
        })
        .collect();
    Ok(channels)
}

/// Maps native samples onto [-1, 1].
///
/// 8-bit samples are recentered at 128 and divided by 127 (positive) or 128
/// (negative); wider formats divide by `2^(bits-1) - 1` or `2^(bits-1)`.
pub fn normalize(native: &NativeBuffer) -> Result<NormalizedBuffer> {
    let codec = SampleFormat::try_from(native.bits_per_sample())?.codec();
    let channels = native
        .channels()
        .iter()
        .map(|channel| channel.iter().map(|&s| codec.to_normalized(s)).collect())
        .collect();
    PcmBuffer::new(native.sample_rate(), native.bits_per_sample(), channels)
}

/// Turns a raw data payload into a native buffer using the parsed format.
pub(crate) fn decode_payload(format: &FormatChunk, payload: &[u8]) -> Result<NativeBuffer> {
    let sample_format = format.sample_format()?;
    let samples = decode_samples(sample_format, payload);
    let channels = deinterleave(&samples, format.num_channels)?;
    PcmBuffer::new(format.sample_rate, format.bits_per_sample, channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn pcm_format(num_channels: u16, bits_per_sample: u16) -> FormatChunk {
        let block_align = num_channels * (bits_per_sample / 8);
        FormatChunk {
            audio_format: 1,
            num_channels,
            sample_rate: 8000,
            byte_rate: 8000 * block_align as u32,
            block_align,
            bits_per_sample,
        }
    }

    #[test]
    fn decodes_int16_payload() {
        let buffer = decode_payload(&pcm_format(1, 16), &[0x00, 0x00, 0xFF, 0x7F]).unwrap();
        assert_eq!(buffer.channel(0), Some(&[0, 32767][..]));
        assert_eq!(buffer.num_frames(), 2);
    }

    #[test]
    fn decodes_uint8_without_recentering() {
        let buffer = decode_payload(&pcm_format(1, 8), &[0x00, 0x80, 0xFF]).unwrap();
        assert_eq!(buffer.channel(0), Some(&[0, 128, 255][..]));
        let normalized = normalize(&buffer).unwrap();
        assert_eq!(normalized.channel(0), Some(&[-1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn decodes_int24_with_sign_extension() {
        let samples = decode_samples(SampleFormat::Int24, &[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x80]);
        assert_eq!(samples, vec![-1, -8_388_608]);
    }

    #[test]
    fn decodes_int32_extremes() {
        let mut bytes = i32::MIN.to_le_bytes().to_vec();
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        let samples = decode_samples(SampleFormat::Int32, &bytes);
        assert_eq!(samples, vec![i32::MIN, i32::MAX]);
        let normalized = normalize(&NativeBuffer::mono(8000, 32, samples)).unwrap();
        assert_eq!(normalized.channel(0), Some(&[-1.0, 1.0][..]));
    }

    #[test]
    fn stereo_is_split_by_parity() {
        let payload: Vec<u8> = [1i16, -1, 2, -2, 3, -3]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let buffer = decode_payload(&pcm_format(2, 16), &payload).unwrap();
        assert_eq!(buffer.channel(0), Some(&[1, 2, 3][..]));
        assert_eq!(buffer.channel(1), Some(&[-1, -2, -3][..]));
    }

    #[test]
    fn partial_trailing_data_is_dropped() {
        // Three whole 16-bit samples plus one stray byte, in stereo.
        let payload = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04];
        let buffer = decode_payload(&pcm_format(2, 16), &payload).unwrap();
        assert_eq!(buffer.num_frames(), 1);
        assert_eq!(buffer.channel(0), Some(&[1][..]));
        assert_eq!(buffer.channel(1), Some(&[2][..]));
    }

    #[test]
    fn unsupported_bit_depth_aborts_decode() {
        match decode_payload(&pcm_format(1, 12), &[0, 0, 0]) {
            Err(Error::UnsupportedBitDepth(12)) => {}
            other => panic!("Expected UnsupportedBitDepth, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_channel_count_aborts_decode() {
        match decode_payload(&pcm_format(6, 16), &[0; 12]) {
            Err(Error::UnsupportedChannelCount(6)) => {}
            other => panic!("Expected UnsupportedChannelCount, got {:?}", other),
        }
    }

    #[test]
    fn normalized_values_stay_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for format in [
            SampleFormat::Uint8,
            SampleFormat::Int16,
            SampleFormat::Int24,
            SampleFormat::Int32,
        ] {
            let (lo, hi) = format.native_range();
            let samples: Vec<i32> = (0..1000).map(|_| rng.random_range(lo..=hi)).collect();
            let buffer = NativeBuffer::mono(44100, format.bits_per_sample(), samples);
            let normalized = normalize(&buffer).unwrap();
            assert!(normalized
                .channel(0)
                .unwrap()
                .iter()
                .all(|x| (-1.0..=1.0).contains(x)));
        }
    }
}

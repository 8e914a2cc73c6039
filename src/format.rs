use enum_dispatch::enum_dispatch;

use crate::error::{Error, Result};

/// Supported linear PCM sample formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned 8-bit samples, silence at 128.
    Uint8,
    /// Signed 16-bit little-endian samples.
    Int16,
    /// Signed 24-bit little-endian samples, packed in 3 bytes.
    Int24,
    /// Signed 32-bit little-endian samples.
    Int32,
}

impl TryFrom<u16> for SampleFormat {
    type Error = Error;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(SampleFormat::Uint8),
            16 => Ok(SampleFormat::Int16),
            24 => Ok(SampleFormat::Int24),
            32 => Ok(SampleFormat::Int32),
            other => Err(Error::UnsupportedBitDepth(other)),
        }
    }
}

impl SampleFormat {
    /// Returns the number of bytes per sample.
    #[inline]
    pub fn bytes_per_sample(&self) -> u16 {
        match self {
            SampleFormat::Uint8 => 1,
            SampleFormat::Int16 => 2,
            SampleFormat::Int24 => 3,
            SampleFormat::Int32 => 4,
        }
    }

    #[inline]
    pub fn bits_per_sample(&self) -> u16 {
        self.bytes_per_sample() * 8
    }

    /// Inclusive range of native values that can be stored in this format.
    pub fn native_range(&self) -> (i32, i32) {
        match self {
            SampleFormat::Uint8 => (0, 255),
            SampleFormat::Int16 => (i16::MIN as i32, i16::MAX as i32),
            SampleFormat::Int24 => (-8_388_608, 8_388_607),
            SampleFormat::Int32 => (i32::MIN, i32::MAX),
        }
    }

    /// Bytes consumed by one frame of `num_channels` samples. Widened to
    /// `u32` so any channel count read from a header is representable.
    pub fn block_align(&self, num_channels: u16) -> u32 {
        num_channels as u32 * self.bytes_per_sample() as u32
    }

    pub(crate) fn codec(self) -> Codec {
        match self {
            SampleFormat::Uint8 => Uint8Codec.into(),
            SampleFormat::Int16 => Int16Codec.into(),
            SampleFormat::Int24 => Int24Codec.into(),
            SampleFormat::Int32 => Int32Codec.into(),
        }
    }
}

/// Stream parameters shared by a sample buffer and the container describing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Samples per second per channel.
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub num_channels: u16,
    /// Samples per channel.
    pub num_frames: usize,
}

impl AudioSpec {
    /// Validates the bit depth and returns the matching sample format.
    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::try_from(self.bits_per_sample)
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate > 0 {
            self.num_frames as f64 / self.sample_rate as f64
        } else {
            0.0
        }
    }
}

/// Per-format sample conversion rules.
///
/// Implementors only describe the byte layout; the native/normalized mapping
/// and the clipping policy are shared by every format. The 8-bit format is
/// stored unsigned, so its values are recentered around `mid` before scaling.
#[enum_dispatch]
pub(crate) trait SampleCodec {
    fn format(&self) -> SampleFormat;

    /// Decodes one sample from exactly `width()` little-endian bytes.
    fn read_sample(&self, bytes: &[u8]) -> i32;

    /// Appends an already clipped native value.
    fn write_sample(&self, native: i32, out: &mut Vec<u8>);

    /// Native value representing silence.
    fn mid(&self) -> i32 {
        0
    }

    fn width(&self) -> usize {
        self.format().bytes_per_sample() as usize
    }

    fn bits(&self) -> u32 {
        self.format().bits_per_sample() as u32
    }

    fn clip(&self, native: i64) -> i32 {
        let (lo, hi) = self.format().native_range();
        native.clamp(lo as i64, hi as i64) as i32
    }

    /// Clips `native` to the representable range and appends its bytes.
    fn encode_sample(&self, native: i32, out: &mut Vec<u8>) {
        self.write_sample(self.clip(native as i64), out);
    }

    /// Positive and negative halves use separate divisors so the asymmetric
    /// integer range lands exactly on [-1, 1].
    fn to_normalized(&self, native: i32) -> f64 {
        let v = self.clip(native as i64) as i64 - self.mid() as i64;
        let half = 1i64 << (self.bits() - 1);
        if v >= 0 {
            v as f64 / (half - 1) as f64
        } else {
            v as f64 / half as f64
        }
    }

    /// Clamps to [-1, 1] and rounds half up onto the native grid. NaN is
    /// treated as silence.
    fn from_normalized(&self, x: f64) -> i32 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) };
        let bits = self.bits();
        let steps = ((1u64 << bits) - 1) as f64;
        let quantized = (((x + 1.0) / 2.0) * steps + 0.5).floor() as i64;
        self.clip(quantized - (1i64 << (bits - 1)) + self.mid() as i64)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Uint8Codec;

impl SampleCodec for Uint8Codec {
    fn format(&self) -> SampleFormat {
        SampleFormat::Uint8
    }

    #[inline]
    fn read_sample(&self, bytes: &[u8]) -> i32 {
        bytes[0] as i32
    }

    #[inline]
    fn write_sample(&self, native: i32, out: &mut Vec<u8>) {
        out.push(native as u8);
    }

    fn mid(&self) -> i32 {
        128
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Int16Codec;

impl SampleCodec for Int16Codec {
    fn format(&self) -> SampleFormat {
        SampleFormat::Int16
    }

    #[inline]
    fn read_sample(&self, bytes: &[u8]) -> i32 {
        i16::from_le_bytes([bytes[0], bytes[1]]) as i32
    }

    #[inline]
    fn write_sample(&self, native: i32, out: &mut Vec<u8>) {
        out.extend_from_slice(&(native as i16).to_le_bytes());
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Int24Codec;

impl SampleCodec for Int24Codec {
    fn format(&self) -> SampleFormat {
        SampleFormat::Int24
    }

    #[inline]
    fn read_sample(&self, bytes: &[u8]) -> i32 {
        let raw = (bytes[0] as i32) | ((bytes[1] as i32) << 8) | ((bytes[2] as i32) << 16);
        if raw >= 0x80_0000 {
            raw - 0x100_0000
        } else {
            raw
        }
    }

    #[inline]
    fn write_sample(&self, native: i32, out: &mut Vec<u8>) {
        out.extend_from_slice(&native.to_le_bytes()[..3]);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Int32Codec;

impl SampleCodec for Int32Codec {
    fn format(&self) -> SampleFormat {
        SampleFormat::Int32
    }

    #[inline]
    fn read_sample(&self, bytes: &[u8]) -> i32 {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write_sample(&self, native: i32, out: &mut Vec<u8>) {
        out.extend_from_slice(&native.to_le_bytes());
    }
}

/// Static dispatch over the supported formats.
#[enum_dispatch(SampleCodec)]
#[derive(Debug, Clone, Copy)]
pub(crate) enum Codec {
    Uint8Codec,
    Int16Codec,
    Int24Codec,
    Int32Codec,
}

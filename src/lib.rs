//! WAV/RIFF codec for linear PCM audio.
//!
//! Reading scans the container for the "fmt " and "data" chunks and decodes
//! the payload into per-channel sample buffers, either in the file's native
//! integer domain or normalized to [-1, 1]. Writing goes the other way and
//! always emits the canonical 44-byte header followed by interleaved samples.
//!
//! ```no_run
//! use wave_pcm::{read_normalized, write_normalized};
//!
//! # fn main() -> wave_pcm::Result<()> {
//! let mut buffer = read_normalized("input.wav")?;
//! if let Some(left) = buffer.channel_mut(0) {
//!     left.iter_mut().for_each(|s| *s *= 0.5);
//! }
//! write_normalized("output.wav", &buffer)?;
//! # Ok(())
//! # }
//! ```

mod buffer;
pub mod decoder;
pub mod encoder;
mod error;
mod format;
mod reader;
pub mod scanner;
mod writer;

#[cfg(test)]
mod test_util;

pub use buffer::{NativeBuffer, NormalizedBuffer, PcmBuffer};
pub use error::{Error, Result};
pub use format::{AudioSpec, SampleFormat};
pub use reader::{probe, read_native, read_normalized, PcmInfo, WavReader};
pub use scanner::{ChunkHeader, DataWindow, FormatChunk, WavHeader};
pub use writer::{encode_container, write_native, write_normalized, WavWriter, HEADER_LEN};

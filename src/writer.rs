use std::io::Write;
use std::path::Path;

use tracing::trace;

use crate::buffer::{NativeBuffer, NormalizedBuffer};
use crate::encoder::{interleave, quantize};
use crate::error::{Error, Result};
use crate::format::SampleCodec;
use crate::scanner::{DATA_ID, FMT_ID, FORMAT_PCM, RIFF_ID, WAVE_ID};

/// Size of the canonical header emitted by the writer.
pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_SIZE: u32 = 16;

/// Header bytes counted by the RIFF size field in addition to the payload.
const RIFF_OVERHEAD: u32 = 36;

/// Serializes a complete WAV container: the canonical 44-byte header followed
/// by the interleaved, clipped sample bytes. No other chunks are emitted.
pub fn encode_container(buffer: &NativeBuffer) -> Result<Vec<u8>> {
    let spec = buffer.spec();
    let format = spec.sample_format()?;
    let block_align = format.block_align(spec.num_channels);

    // PcmBuffer holds one or two channels, so this fits the u16 header field.
    let header_align = block_align as u16;

    let data_len = spec.num_frames as u64 * block_align as u64;
    if data_len > (u32::MAX - RIFF_OVERHEAD) as u64 {
        return Err(Error::DataTooLarge(data_len));
    }
    let data_len = data_len as u32;
    let byte_rate = spec.sample_rate.saturating_mul(block_align);

    let mut bytes = Vec::with_capacity(HEADER_LEN + data_len as usize);
    put_chunk_header(&mut bytes, &RIFF_ID, data_len + RIFF_OVERHEAD);
    bytes.extend_from_slice(&WAVE_ID);
    put_chunk_header(&mut bytes, &FMT_ID, FMT_CHUNK_SIZE);
    bytes.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    bytes.extend_from_slice(&spec.num_channels.to_le_bytes());
    bytes.extend_from_slice(&spec.sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&header_align.to_le_bytes());
    bytes.extend_from_slice(&format.bits_per_sample().to_le_bytes());
    put_chunk_header(&mut bytes, &DATA_ID, data_len);

    let codec = format.codec();
    for sample in interleave(buffer.channels()) {
        codec.encode_sample(sample, &mut bytes);
    }
    debug_assert_eq!(bytes.len(), HEADER_LEN + data_len as usize);

    trace!(bytes = bytes.len(), ?format, "encoded WAV container");
    Ok(bytes)
}

fn put_chunk_header(out: &mut Vec<u8>, id: &[u8; 4], size: u32) {
    out.extend_from_slice(id);
    out.extend_from_slice(&size.to_le_bytes());
}

/// Writes whole WAV containers to a byte sink.
///
/// The container is fully encoded before the first byte reaches the sink, so
/// an unsupported bit depth never produces partial output.
#[derive(Debug)]
pub struct WavWriter<W: Write> {
    sink: W,
}

impl<W: Write> WavWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_native(&mut self, buffer: &NativeBuffer) -> Result<()> {
        let bytes = encode_container(buffer)?;
        self.sink.write_all(&bytes)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Quantizes to the buffer's bit depth, then writes the container.
    pub fn write_normalized(&mut self, buffer: &NormalizedBuffer) -> Result<()> {
        self.write_native(&quantize(buffer)?)
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Writes `buffer` to `path`, replacing any existing file only once the whole
/// container has been written.
pub fn write_native<P: AsRef<Path>>(path: P, buffer: &NativeBuffer) -> Result<()> {
    let bytes = encode_container(buffer)?;
    persist(path.as_ref(), &bytes)
}

/// Quantizes and writes `buffer` to `path` with the same guarantees as
/// [`write_native`].
pub fn write_normalized<P: AsRef<Path>>(path: P, buffer: &NormalizedBuffer) -> Result<()> {
    write_native(path, &quantize(buffer)?)
}

/// Stages `bytes` in a sibling temporary file and renames it over `path`.
fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    trace!(path = %path.display(), bytes = bytes.len(), "persisted WAV file");
    Ok(())
}

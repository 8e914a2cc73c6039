use std::io::{self, Read};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::format::SampleFormat;

pub const RIFF_ID: [u8; 4] = *b"RIFF";
pub const WAVE_ID: [u8; 4] = *b"WAVE";
pub const FMT_ID: [u8; 4] = *b"fmt ";
pub const DATA_ID: [u8; 4] = *b"data";

/// Format tag for linear PCM.
pub const FORMAT_PCM: u16 = 1;

/// A tagged, length-prefixed RIFF chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

/// The fixed 16-byte body of the "fmt " chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatChunk {
    pub fn sample_format(&self) -> Result<SampleFormat> {
        SampleFormat::try_from(self.bits_per_sample)
    }
}

/// Absolute position and byte length of the data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWindow {
    pub offset: u64,
    pub len: u32,
}

/// Everything the scanner learns about a container before the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub riff: ChunkHeader,
    pub fmt: ChunkHeader,
    pub format: FormatChunk,
    pub data: ChunkHeader,
    pub window: DataWindow,
}

/// A byte source that tracks its absolute position.
#[derive(Debug)]
pub(crate) struct SourceStream<R: Read> {
    reader: R,
    abs_pos: u64,
}

impl<R: Read> SourceStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, abs_pos: 0 }
    }

    /// Reads exactly `N` bytes; a short read is reported as `Truncated(field)`.
    pub fn read_exact<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut result = [0u8; N];
        self.reader
            .read_exact(&mut result)
            .map_err(|e| Error::from_read(e, field))?;
        self.abs_pos += N as u64;
        Ok(result)
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_exact::<2>(field)?))
    }

    pub fn read_u32_le(&mut self, field: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_exact::<4>(field)?))
    }

    /// Reads a single byte, returning `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.abs_pos += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    pub fn read_vec(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        self.abs_pos += buf.len() as u64;
        if buf.len() < len {
            return Err(Error::Truncated(field));
        }
        Ok(buf)
    }

    pub fn position(&self) -> u64 {
        self.abs_pos
    }
}

/// Walks a RIFF/WAVE container up to the start of the data payload.
pub(crate) struct ChunkScanner<'a, R: Read> {
    source: &'a mut SourceStream<R>,
}

impl<'a, R: Read> ChunkScanner<'a, R> {
    pub fn new(source: &'a mut SourceStream<R>) -> Self {
        Self { source }
    }

    /// Validates the RIFF/WAVE preamble, then locates "fmt " and "data".
    /// On success the source is positioned at the first payload byte.
    pub fn scan(&mut self) -> Result<WavHeader> {
        let riff_id = self.source.read_exact::<4>("RIFF identifier")?;
        if riff_id != RIFF_ID {
            return Err(Error::NotRiffContainer);
        }
        // Not checked against the real stream length.
        let riff_size = self.source.read_u32_le("RIFF chunk size")?;
        let wave_id = self.source.read_exact::<4>("WAVE identifier")?;
        if wave_id != WAVE_ID {
            return Err(Error::NotWaveFormat);
        }

        self.find_tag(&FMT_ID, Error::MissingFmtChunk)?;
        let fmt_size = self.source.read_u32_le("'fmt ' chunk size")?;
        let format = self.read_format_fields()?;
        Self::check_format(&format);

        self.find_tag(&DATA_ID, Error::MissingDataChunk)?;
        let data_size = self.source.read_u32_le("'data' chunk size")?;
        let window = DataWindow {
            offset: self.source.position(),
            len: data_size,
        };
        debug!(offset = window.offset, len = window.len, "found 'data' payload");

        Ok(WavHeader {
            riff: ChunkHeader {
                id: riff_id,
                size: riff_size,
            },
            fmt: ChunkHeader {
                id: FMT_ID,
                size: fmt_size,
            },
            format,
            data: ChunkHeader {
                id: DATA_ID,
                size: data_size,
            },
            window,
        })
    }

    /// Slides a 4-byte window one byte at a time until it equals `tag`.
    /// Running out of input yields `missing`.
    fn find_tag(&mut self, tag: &[u8; 4], missing: Error) -> Result<()> {
        let start = self.source.position();
        let mut window = [0u8; 4];
        for slot in window.iter_mut() {
            match self.source.read_byte()? {
                Some(byte) => *slot = byte,
                None => return Err(missing),
            }
        }
        while window != *tag {
            let Some(byte) = self.source.read_byte()? else {
                return Err(missing);
            };
            window.rotate_left(1);
            window[3] = byte;
        }
        let skipped = self.source.position() - start - 4;
        debug!(
            tag = %String::from_utf8_lossy(tag),
            offset = self.source.position() - 4,
            skipped,
            "found chunk"
        );
        Ok(())
    }

    fn read_format_fields(&mut self) -> Result<FormatChunk> {
        Ok(FormatChunk {
            audio_format: self.source.read_u16_le("format tag")?,
            num_channels: self.source.read_u16_le("channel count")?,
            sample_rate: self.source.read_u32_le("sample rate")?,
            byte_rate: self.source.read_u32_le("byte rate")?,
            block_align: self.source.read_u16_le("block align")?,
            bits_per_sample: self.source.read_u16_le("bits per sample")?,
        })
    }

    /// Reports suspicious fields without rejecting them.
    fn check_format(format: &FormatChunk) {
        if format.audio_format != FORMAT_PCM {
            warn!(
                audio_format = format.audio_format,
                "non-PCM format tag, decoding as linear PCM"
            );
        }
        if let Ok(sample_format) = format.sample_format() {
            let expected = sample_format.block_align(format.num_channels);
            if format.block_align as u32 != expected {
                warn!(
                    block_align = format.block_align,
                    expected, "block align disagrees with channels and bit depth"
                );
            }
            if format.byte_rate as u64 != expected as u64 * format.sample_rate as u64 {
                warn!(byte_rate = format.byte_rate, "byte rate disagrees with block align");
            }
        }
    }
}

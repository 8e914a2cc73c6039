use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::buffer::{NativeBuffer, NormalizedBuffer};
use crate::decoder::{decode_payload, normalize};
use crate::error::{Error, Result};
use crate::format::AudioSpec;
use crate::scanner::{ChunkScanner, DataWindow, SourceStream, WavHeader};

/// Reads WAV file headers up front and decodes the payload on demand.
#[derive(Debug)]
pub struct WavReader<R: Read> {
    source: SourceStream<R>,
    header: WavHeader,
}

impl WavReader<BufReader<File>> {
    const BUFFER_CAPACITY: usize = 1024 * 64;

    /// Opens `path` and parses its headers through a buffered reader.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::try_new(BufReader::with_capacity(Self::BUFFER_CAPACITY, file))
    }
}

impl<R: Read> WavReader<R> {
    /// Attempts to create a new `WavReader` by scanning the container headers.
    ///
    /// # Errors
    /// Fails if the stream is not RIFF/WAVE, if the "fmt " or "data" chunk
    /// cannot be found, or if a header field is cut short. The bit depth and
    /// channel count are only checked when the payload is decoded.
    pub fn try_new(source: R) -> Result<Self> {
        let mut source = SourceStream::new(source);
        let header = ChunkScanner::new(&mut source).scan()?;
        Ok(Self { source, header })
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.format.sample_rate
    }

    pub fn num_channels(&self) -> u16 {
        self.header.format.num_channels
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.header.format.bits_per_sample
    }

    /// The format tag from the "fmt " chunk (1 for PCM).
    pub fn audio_format(&self) -> u16 {
        self.header.format.audio_format
    }

    pub fn byte_rate(&self) -> u32 {
        self.header.format.byte_rate
    }

    pub fn block_align(&self) -> u16 {
        self.header.format.block_align
    }

    pub fn data_window(&self) -> DataWindow {
        self.header.window
    }

    /// Samples per channel implied by the declared data size, or 0 when the
    /// bit depth or channel count is unusable.
    pub fn num_frames(&self) -> usize {
        let Ok(format) = self.header.format.sample_format() else {
            return 0;
        };
        let num_channels = self.num_channels();
        if !(1..=2).contains(&num_channels) {
            return 0;
        }
        self.header.window.len as usize / format.block_align(num_channels) as usize
    }

    pub fn spec(&self) -> AudioSpec {
        AudioSpec {
            sample_rate: self.sample_rate(),
            bits_per_sample: self.bits_per_sample(),
            num_channels: self.num_channels(),
            num_frames: self.num_frames(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.spec().duration_seconds()
    }

    /// Reads the whole payload and decodes it into native samples.
    pub fn read_native(mut self) -> Result<NativeBuffer> {
        let format = self.header.format;
        format.sample_format()?;
        if !(1..=2).contains(&format.num_channels) {
            return Err(Error::UnsupportedChannelCount(format.num_channels));
        }
        let payload = self
            .source
            .read_vec(self.header.window.len as usize, "data chunk payload")?;
        decode_payload(&format, &payload)
    }

    /// Reads the whole payload and maps it onto [-1, 1].
    pub fn read_normalized(self) -> Result<NormalizedBuffer> {
        normalize(&self.read_native()?)
    }
}

/// Decodes the WAV file at `path` into native samples.
pub fn read_native<P: AsRef<Path>>(path: P) -> Result<NativeBuffer> {
    WavReader::open(path)?.read_native()
}

/// Decodes the WAV file at `path` into normalized samples.
pub fn read_normalized<P: AsRef<Path>>(path: P) -> Result<NormalizedBuffer> {
    WavReader::open(path)?.read_normalized()
}

/// Basic stream parameters of a WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmInfo {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub num_channels: u16,
}

/// Reports the stream parameters of `path` without decoding any samples.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<PcmInfo> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    Ok(PcmInfo {
        path: path.to_path_buf(),
        sample_rate: reader.sample_rate(),
        bits_per_sample: reader.bits_per_sample(),
        num_channels: reader.num_channels(),
    })
}

use std::io;

/// Errors produced while reading or writing a WAV container.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid RIFF identifier")]
    NotRiffContainer,
    #[error("Invalid WAVE identifier")]
    NotWaveFormat,
    #[error("Missing required 'fmt ' chunk")]
    MissingFmtChunk,
    #[error("Missing required 'data' chunk")]
    MissingDataChunk,
    /// End of stream reached while reading the named fixed-width field.
    #[error("Unexpected end of stream while reading {0}")]
    Truncated(&'static str),
    #[error("Unsupported bits per sample: {0}")]
    UnsupportedBitDepth(u16),
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannelCount(u16),
    #[error("Channel length mismatch: expected {expected} samples, found {found}")]
    ChannelLengthMismatch { expected: usize, found: usize },
    /// The payload would overflow the 32-bit RIFF size field.
    #[error("Audio data too large for a RIFF container: {0} bytes")]
    DataTooLarge(u64),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Specialized `Result` type for operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps a short read on a fixed-width field to `Truncated`, keeping every
    /// other I/O failure as `Io`.
    pub(crate) fn from_read(err: io::Error, field: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated(field)
        } else {
            Error::Io(err)
        }
    }
}

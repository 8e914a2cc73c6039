//! Container builders shared by the unit tests.

use crate::scanner::{DATA_ID, FMT_ID, FORMAT_PCM, RIFF_ID, WAVE_ID};

/// Header for a plain PCM file whose "data" chunk declares `data_size` bytes.
/// Derived fields are computed in `u32` and truncated to their on-disk width,
/// so headers with absurd channel counts can still be described.
pub(crate) fn minimal_wav_header(
    sample_rate: u32,
    num_channels: u16,
    bits_per_sample: u16,
    data_size: u32,
) -> Vec<u8> {
    let block_align = num_channels as u32 * (bits_per_sample / 8) as u32;
    let parts: [&[u8]; 13] = [
        &RIFF_ID,
        &data_size.wrapping_add(36).to_le_bytes(),
        &WAVE_ID,
        &FMT_ID,
        &16u32.to_le_bytes(),
        &FORMAT_PCM.to_le_bytes(),
        &num_channels.to_le_bytes(),
        &sample_rate.to_le_bytes(),
        &sample_rate.wrapping_mul(block_align).to_le_bytes(),
        &(block_align as u16).to_le_bytes(),
        &bits_per_sample.to_le_bytes(),
        &DATA_ID,
        &data_size.to_le_bytes(),
    ];
    parts.concat()
}

/// Builds a complete container around `payload`.
pub(crate) fn wav_file(
    sample_rate: u32,
    num_channels: u16,
    bits_per_sample: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut file = minimal_wav_header(
        sample_rate,
        num_channels,
        bits_per_sample,
        payload.len() as u32,
    );
    file.extend_from_slice(payload);
    file
}

/// Inserts a chunk right before the "data" chunk of a canonical container and
/// fixes up the RIFF size.
pub(crate) fn with_chunk_before_data(mut file: Vec<u8>, id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut chunk = id.to_vec();
    chunk.extend_from_slice(&(body.len() as u32).to_le_bytes());
    chunk.extend_from_slice(body);
    let inserted = chunk.len() as u32;
    file.splice(36..36, chunk);

    let riff_size = u32::from_le_bytes([file[4], file[5], file[6], file[7]]) + inserted;
    file[4..8].copy_from_slice(&riff_size.to_le_bytes());
    file
}

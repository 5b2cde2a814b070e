//! WAV container encoding.
//!
//! Serializes a decoded audio buffer into a standalone, playable WAV byte
//! sequence: a 44-byte RIFF header followed by samples interleaved
//! frame-by-frame across channels. 8- and 16-bit output is integer PCM
//! (format code 1); 32-bit output is IEEE float (format code 3).

use crate::models::audio::DecodedAudioBuffer;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Encode `buffer` at `sample_bits` depth (8, 16 or 32).
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (format chunk size)
/// [20-21]  format code (1 = integer PCM, 3 = IEEE float)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bytes_per_sample
/// [32-33]  block_align = channels * bytes_per_sample
/// [34-35]  bits per sample
/// [36-39]  "data"
/// [40-43]  data_size
/// [44-]    frame-interleaved sample payload
/// ```
///
/// All multi-byte fields are little-endian. Pure: identical inputs yield
/// byte-identical output. Out-of-range samples clamp to the representable
/// range for 8/16-bit output; 32-bit float samples are written unscaled.
pub fn encode_wav(buffer: &DecodedAudioBuffer, sample_bits: u16) -> Vec<u8> {
    let bytes_per_sample = usize::from(sample_bits / 8);
    let channels = buffer.channel_data.len();
    let frames = buffer.frame_count();
    let data_size = (frames * channels * bytes_per_sample) as u32;

    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    out.extend_from_slice(&wav_header(
        buffer.sample_rate,
        sample_bits,
        channels as u16,
        data_size,
    ));

    for frame in 0..frames {
        for channel in &buffer.channel_data {
            write_sample(&mut out, channel[frame], sample_bits);
        }
    }

    out
}

/// Generate the 44-byte RIFF header for `data_size` payload bytes.
fn wav_header(
    sample_rate: u32,
    sample_bits: u16,
    channels: u16,
    data_size: u32,
) -> [u8; WAV_HEADER_SIZE] {
    let format = if sample_bits == 32 {
        FORMAT_IEEE_FLOAT
    } else {
        FORMAT_PCM
    };
    let byte_rate = sample_rate * u32::from(channels) * u32::from(sample_bits / 8);
    let block_align = channels * (sample_bits / 8);
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&format.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&sample_bits.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

fn write_sample(out: &mut Vec<u8>, sample: f32, sample_bits: u16) {
    match sample_bits {
        8 => out.push(((quantize_i16(sample) >> 8) + 128) as u8),
        16 => out.extend_from_slice(&quantize_i16(sample).to_le_bytes()),
        _ => out.extend_from_slice(&sample.to_le_bytes()),
    }
}

/// Clamp to [-1.0, 1.0] and scale to the full signed 16-bit range
/// (-1.0 ↔ -32768, 1.0 ↔ 32767).
fn quantize_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

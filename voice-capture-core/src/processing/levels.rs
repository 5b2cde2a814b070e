//! Level metering over decoded buffers, feeding the live preview.

use crate::models::audio::{AudioLevels, DecodedAudioBuffer};

/// Measure RMS and peak absolute level across every channel of `buffer`.
pub fn measure(buffer: &DecodedAudioBuffer) -> AudioLevels {
    let total: usize = buffer.channel_data.iter().map(Vec::len).sum();
    if total == 0 {
        return AudioLevels::default();
    }

    let mut sum_sq = 0.0f64;
    let mut peak = 0.0f32;
    for channel in &buffer.channel_data {
        for &sample in channel {
            sum_sq += f64::from(sample) * f64::from(sample);
            peak = peak.max(sample.abs());
        }
    }

    AudioLevels {
        rms: (sum_sq / total as f64).sqrt() as f32,
        peak,
    }
}

//! Reference chunk decoder for recorder resources that deliver raw PCM.

use std::thread;

use log::error;

use crate::models::audio::{DecodedAudioBuffer, RawChunk};
use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::session::events::{EventSender, SessionEvent};
use crate::traits::decoder::ChunkDecoder;

/// Decodes chunks of raw interleaved little-endian 16-bit PCM.
///
/// Stands in for the platform decode context when the recorder resource
/// delivers uncompressed samples (the common native capture delivery
/// format). Container-wrapped chunk formats stay behind the
/// `ChunkDecoder` seam.
#[derive(Debug, Clone)]
pub struct PcmStreamDecoder {
    sample_rate: u32,
    channels: u16,
}

impl ChunkDecoder for PcmStreamDecoder {
    fn open(config: &RecorderConfig) -> Result<Self, CaptureError> {
        Ok(Self {
            sample_rate: config.sample_rate,
            channels: config.channels_count,
        })
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn decode(&self, chunk: RawChunk, reply: EventSender) {
        let decoder = self.clone();
        let reply_spawn = reply.clone();
        let spawned = thread::Builder::new().name("chunk-decode".into()).spawn(
            move || {
                let result = decoder.decode_sync(&chunk);
                // The session may already have torn down the queue.
                let _ = reply_spawn.send(SessionEvent::DecodeFinished(result));
            },
        );
        if let Err(e) = spawned {
            error!("Failed to spawn decode thread: {}", e);
            let _ = reply.send(SessionEvent::DecodeFinished(Err(
                CaptureError::DecodeFailed(format!("decode thread: {}", e)),
            )));
        }
    }
}

impl PcmStreamDecoder {
    fn decode_sync(&self, chunk: &RawChunk) -> Result<DecodedAudioBuffer, CaptureError> {
        let bytes = chunk.bytes();
        let channels = usize::from(self.channels);
        let frame_bytes = channels * 2;
        if bytes.is_empty() || bytes.len() % frame_bytes != 0 {
            return Err(CaptureError::DecodeFailed(format!(
                "{} bytes is not a whole number of {}-byte frames",
                bytes.len(),
                frame_bytes
            )));
        }

        let frames = bytes.len() / frame_bytes;
        let mut channel_data = vec![Vec::with_capacity(frames); channels];
        for frame in bytes.chunks_exact(frame_bytes) {
            for (ch, sample) in frame.chunks_exact(2).enumerate() {
                let value = i16::from_le_bytes([sample[0], sample[1]]);
                channel_data[ch].push(f32::from(value) / 32768.0);
            }
        }

        Ok(DecodedAudioBuffer::new(self.sample_rate, channel_data))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use approx::assert_relative_eq;

    use super::*;

    fn decoder(channels: u16) -> PcmStreamDecoder {
        let config = RecorderConfig {
            sample_rate: 16000,
            sample_bits: 16,
            channels_count: channels,
        };
        PcmStreamDecoder::open(&config).unwrap()
    }

    fn pcm_chunk(samples: &[i16]) -> RawChunk {
        RawChunk::new(samples.iter().flat_map(|s| s.to_le_bytes()).collect())
    }

    fn decode_blocking(decoder: &PcmStreamDecoder, chunk: RawChunk) -> SessionEvent {
        let (tx, rx) = mpsc::channel();
        decoder.decode(chunk, tx);
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn normalizes_full_scale_samples() {
        let event = decode_blocking(&decoder(1), pcm_chunk(&[i16::MIN, i16::MAX, 0, 16384]));
        let SessionEvent::DecodeFinished(Ok(buffer)) = event else {
            panic!("expected successful decode, got {:?}", event);
        };

        assert_eq!(buffer.sample_rate, 16000);
        assert_eq!(buffer.channel_count(), 1);
        assert_relative_eq!(buffer.channel_data[0][0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(buffer.channel_data[0][1], 0.99997, epsilon = 1e-4);
        assert_relative_eq!(buffer.channel_data[0][2], 0.0, epsilon = 1e-6);
        assert_relative_eq!(buffer.channel_data[0][3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn deinterleaves_stereo_frames() {
        let event = decode_blocking(&decoder(2), pcm_chunk(&[100, 200, 300, 400]));
        let SessionEvent::DecodeFinished(Ok(buffer)) = event else {
            panic!("expected successful decode, got {:?}", event);
        };

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 2);
        assert_relative_eq!(buffer.channel_data[0][0], 100.0 / 32768.0);
        assert_relative_eq!(buffer.channel_data[1][0], 200.0 / 32768.0);
        assert_relative_eq!(buffer.channel_data[0][1], 300.0 / 32768.0);
        assert_relative_eq!(buffer.channel_data[1][1], 400.0 / 32768.0);
    }

    #[test]
    fn partial_frame_fails_decode() {
        let event = decode_blocking(&decoder(2), RawChunk::new(vec![0u8; 6]));
        let SessionEvent::DecodeFinished(Err(CaptureError::DecodeFailed(_))) = event else {
            panic!("expected decode failure, got {:?}", event);
        };
    }

    #[test]
    fn empty_chunk_fails_decode() {
        let event = decode_blocking(&decoder(1), RawChunk::new(Vec::new()));
        assert!(matches!(
            event,
            SessionEvent::DecodeFinished(Err(CaptureError::DecodeFailed(_)))
        ));
    }
}

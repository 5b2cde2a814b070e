use crate::models::audio::RawChunk;
use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::session::events::EventSender;

/// Asynchronous `RawChunk` → `DecodedAudioBuffer` converter.
///
/// One decode context is opened lazily per controller, at the configured
/// sample rate, and reused across sessions.
pub trait ChunkDecoder: Send + Sync {
    fn open(config: &RecorderConfig) -> Result<Self, CaptureError>
    where
        Self: Sized;

    /// Sample rate this context decodes to.
    fn sample_rate(&self) -> u32;

    /// Decode `chunk`, posting `SessionEvent::DecodeFinished` to `reply`
    /// when done. Must not block the caller; the platform decode may
    /// complete on another thread.
    fn decode(&self, chunk: RawChunk, reply: EventSender);
}

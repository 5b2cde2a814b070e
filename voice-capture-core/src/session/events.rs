use std::sync::mpsc;

use crate::models::audio::{DecodedAudioBuffer, RawChunk};
use crate::models::error::CaptureError;

/// Asynchronous collaborator signals consumed by the session pump.
///
/// The browser-style callback surface (data-available, decode completion,
/// recorder onstop) is expressed as explicit events on one queue so the
/// interleaving with public operations stays auditable.
#[derive(Debug)]
pub enum SessionEvent {
    /// The recorder resource produced a raw data fragment.
    ChunkDelivered(RawChunk),
    /// A decode dispatched by the pump completed.
    DecodeFinished(Result<DecodedAudioBuffer, CaptureError>),
    /// The recorder resource has fully stopped. The single authoritative
    /// signal that recording ended, whichever operation triggered it.
    StopAcknowledged,
}

/// Sending half of the session event queue, handed to collaborators.
pub type EventSender = mpsc::Sender<SessionEvent>;

pub(crate) type EventReceiver = mpsc::Receiver<SessionEvent>;

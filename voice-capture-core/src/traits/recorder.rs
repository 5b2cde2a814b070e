use crate::models::error::CaptureError;

/// Activity self-reported by the native recorder resource, consulted by
/// the controller's `pause()` / `resume()` / `stop()` guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderActivity {
    Recording,
    Paused,
    Inactive,
}

/// Native recorder resource driving one capture session.
///
/// Emits periodic `SessionEvent::ChunkDelivered` events while recording
/// and a single `SessionEvent::StopAcknowledged` once it has fully
/// stopped — the acknowledgment, not `stop()`, is what completes the
/// session on the controller side.
pub trait RecorderResource: Send {
    /// Begin capture.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Suspend chunk delivery. Only meaningful while recording.
    fn pause(&mut self);

    /// Resume chunk delivery. Only meaningful while paused.
    fn resume(&mut self);

    /// Ask the resource to stop. Any buffered data is delivered as a
    /// final chunk before the stop acknowledgment fires.
    fn stop(&mut self);

    /// Current capture activity.
    fn activity(&self) -> RecorderActivity;
}

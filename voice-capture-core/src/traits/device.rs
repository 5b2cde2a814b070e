use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::session::events::EventSender;
use crate::traits::recorder::RecorderResource;

/// Constraints handed to the device provider when requesting a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub channel_count: u16,
    pub sample_rate: u32,
}

impl From<&RecorderConfig> for StreamConstraints {
    fn from(config: &RecorderConfig) -> Self {
        Self {
            channel_count: config.channels_count,
            sample_rate: config.sample_rate,
        }
    }
}

/// A live capture stream handed out by the device provider.
///
/// The controller is the exclusive owner; it stops the tracks on every
/// exit from the recording/paused range and reacquires the stream when a
/// track has ended.
pub trait DeviceStream: Send {
    /// True when any track backing the stream has ended.
    fn has_ended_track(&self) -> bool;

    /// Stop every track, releasing the hardware.
    fn stop_tracks(&mut self);
}

/// Platform gateway for capture streams and recorder resources.
///
/// Implemented by platform backends; mocked in tests.
pub trait DeviceProvider: Send {
    type Stream: DeviceStream;
    type Recorder: RecorderResource;

    /// Whether the platform supports capture recording at all.
    /// Consulted once, at controller construction.
    fn supports_recording(&self) -> bool;

    /// Request a capture stream matching `constraints`.
    ///
    /// Fails with `CaptureError::PermissionDenied` when access is refused
    /// and `CaptureError::DeviceNotAvailable` when no device exists.
    fn acquire(&mut self, constraints: &StreamConstraints) -> Result<Self::Stream, CaptureError>;

    /// Open a recorder resource over `stream`.
    ///
    /// The resource emits `SessionEvent::ChunkDelivered` and
    /// `SessionEvent::StopAcknowledged` through `events` while it lives.
    fn open_recorder(
        &mut self,
        stream: &Self::Stream,
        events: EventSender,
    ) -> Result<Self::Recorder, CaptureError>;
}

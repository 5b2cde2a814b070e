/// Recorder status state machine.
///
/// State transitions:
/// ```text
/// idle → recording ↔ paused
///            ↓         ↓
///         stopped / canceled
/// ```
///
/// `PermissionDenied` and `RecorderError` are terminal failure states: no
/// further transition is valid without constructing a new controller.
/// `Stopped` and `Canceled` complete a session; a fresh `start()` from
/// either begins a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderStatus {
    Idle,
    Recording,
    Stopped,
    Paused,
    Canceled,
    PermissionDenied,
    RecorderError,
}

impl RecorderStatus {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// True while a capture session holds live hardware.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }

    /// States from which `start()` may open a new session.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Canceled)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::RecorderError)
    }
}

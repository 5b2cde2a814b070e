use thiserror::Error;

/// Errors that can occur during capture and encoding operations.
///
/// Device-acquisition and decode failures never escape the controller as
/// errors; it folds them into the `PermissionDenied` / `RecorderError`
/// status values. Collaborator traits use this enum as their error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("capture recording is not supported on this platform")]
    RecorderUnsupported,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("recorder failed: {0}")]
    RecorderFailed(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),
}

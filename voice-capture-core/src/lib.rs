//! # voice-capture-core
//!
//! Capture-and-encode core of a voice-memo application.
//!
//! Owns one hardware capture session at a time, drives it across
//! start/pause/resume/stop/cancel, decodes delivered chunks, and encodes
//! the most recent decode into a standalone, playable WAV artifact for
//! the upload layer. Platform backends (device streams, native
//! recorders, decode contexts) implement the traits in `traits/` and
//! plug into the generic `RecorderController`.
//!
//! ## Architecture
//!
//! ```text
//! voice-capture-core (this crate)
//! ├── traits/       ← DeviceProvider, RecorderResource, ChunkDecoder
//! ├── models/       ← RecorderConfig, RecorderStatus, CaptureError, EncodedArtifact, ...
//! ├── processing/   ← WAV encoding, reference PCM chunk decoding, level metering
//! └── session/      ← RecorderController (state-owning event pump) + SessionEvent
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::artifact::{ArtifactMetadata, EncodedArtifact};
pub use models::audio::{AudioLevels, DecodedAudioBuffer, RawChunk};
pub use models::config::RecorderConfig;
pub use models::error::CaptureError;
pub use models::state::RecorderStatus;
pub use processing::pcm_decoder::PcmStreamDecoder;
pub use processing::wav_encoder::{encode_wav, WAV_HEADER_SIZE};
pub use session::controller::RecorderController;
pub use session::events::{EventSender, SessionEvent};
pub use traits::decoder::ChunkDecoder;
pub use traits::device::{DeviceProvider, DeviceStream, StreamConstraints};
pub use traits::recorder::{RecorderActivity, RecorderResource};

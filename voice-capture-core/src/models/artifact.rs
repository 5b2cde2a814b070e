use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::audio::DecodedAudioBuffer;

/// The finished, playable encoding of the most recently decoded buffer.
///
/// Owned solely by the controller and replaced wholesale on each decode;
/// surfaced to the upload collaborator only once the session has stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifact {
    bytes: Vec<u8>,
    metadata: ArtifactMetadata,
}

/// Metadata attached to a finished recording.
///
/// Serializable for JSON hand-off to the upload collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub byte_len: usize,
    pub checksum: String,
}

impl EncodedArtifact {
    /// Wrap encoder output for `buffer`, stamping identity, timing and a
    /// SHA-256 checksum of the byte sequence.
    pub fn new(bytes: Vec<u8>, buffer: &DecodedAudioBuffer, bits_per_sample: u16) -> Self {
        let metadata = ArtifactMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate,
            channels: buffer.channel_count(),
            bits_per_sample,
            byte_len: bytes.len(),
            checksum: sha256_hex(&bytes),
        };
        Self { bytes, metadata }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }
}

impl ArtifactMetadata {
    /// Upload file name embedding the capture timestamp.
    pub fn suggested_file_name(&self) -> String {
        format!("voice-{}.wav", self.created_at.timestamp_millis())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> DecodedAudioBuffer {
        DecodedAudioBuffer::new(16000, vec![vec![0.0; 16000]])
    }

    #[test]
    fn metadata_describes_buffer() {
        let artifact = EncodedArtifact::new(vec![0u8; 64], &buffer(), 16);
        let meta = artifact.metadata();

        assert_eq!(meta.sample_rate, 16000);
        assert_eq!(meta.channels, 1);
        assert_eq!(meta.bits_per_sample, 16);
        assert_eq!(meta.byte_len, 64);
        assert!((meta.duration_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn checksum_is_sha256_hex_of_bytes() {
        let a = EncodedArtifact::new(vec![1, 2, 3], &buffer(), 16);
        let b = EncodedArtifact::new(vec![1, 2, 3], &buffer(), 16);

        assert_eq!(a.metadata().checksum.len(), 64);
        assert!(a.metadata().checksum.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a.metadata().checksum, b.metadata().checksum);

        let c = EncodedArtifact::new(vec![1, 2, 4], &buffer(), 16);
        assert_ne!(a.metadata().checksum, c.metadata().checksum);
    }

    #[test]
    fn suggested_file_name_embeds_timestamp() {
        let artifact = EncodedArtifact::new(vec![0u8; 8], &buffer(), 16);
        let name = artifact.metadata().suggested_file_name();

        assert!(name.starts_with("voice-"));
        assert!(name.ends_with(".wav"));
        let millis: i64 = name["voice-".len()..name.len() - ".wav".len()]
            .parse()
            .unwrap();
        assert_eq!(millis, artifact.metadata().created_at.timestamp_millis());
    }

    #[test]
    fn metadata_json_round_trip() {
        let artifact = EncodedArtifact::new(vec![0u8; 8], &buffer(), 32);
        let json = artifact.metadata().to_json().unwrap();
        let parsed: ArtifactMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(&parsed, artifact.metadata());
    }
}

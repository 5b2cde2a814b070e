/// Configuration for a recorder controller.
///
/// Supplied once at construction; immutable for the controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Capture and output sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Bit depth of the encoded artifact (default: 16). Valid values: 8, 16, 32.
    pub sample_bits: u16,

    /// Number of capture channels (default: 2).
    pub channels_count: u16,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if ![8, 16, 32].contains(&self.sample_bits) {
            return Err(format!("unsupported sample bits: {}", self.sample_bits));
        }
        if self.channels_count == 0 {
            return Err("channel count must be positive".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            sample_bits: 16,
            channels_count: 2,
        }
    }
}

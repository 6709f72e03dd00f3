//! Configuration constants and types for slack recovery.

use serde::{Deserialize, Serialize};

/// Offset of the root block. Every live block is reachable from here.
pub const ROOT_BLOCK_OFFSET: u64 = 0;

/// Pointer value that ends a block's pointer list.
pub const POINTER_SENTINEL: u64 = 0;

/// High bit of a varint byte: more bytes follow.
pub const VARINT_CONTINUATION_BIT: u8 = 0x80;

/// Value bits carried by each varint byte.
pub const VARINT_DATA_MASK: u8 = 0x7F;

/// Longest varint that can still hold a `u64` (10 * 7 bits >= 64).
pub const MAX_VARINT_BYTES: usize = 10;

/// How recovered slack bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoding {
    /// Keep slack as opaque bytes. Text is only produced on demand, lossily.
    #[default]
    Raw,
    /// Replace invalid UTF-8 sequences with U+FFFD.
    Lossy,
    /// Fail on the first region that is not valid UTF-8.
    Strict,
}

/// Configuration for a single container analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Offset where traversal starts.
    pub root_offset: u64,

    /// Decoding applied when slack is rendered as text.
    pub decoding: TextDecoding,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root_offset: ROOT_BLOCK_OFFSET,
            decoding: TextDecoding::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new analysis configuration.
    pub fn new(root_offset: u64, decoding: TextDecoding) -> Self {
        Self {
            root_offset,
            decoding,
        }
    }

    /// Validate the configuration against the container length.
    pub fn validate(&self, file_len: u64) -> Result<(), String> {
        if file_len > 0 && self.root_offset >= file_len {
            return Err(format!(
                "Root offset {} lies beyond end of file ({} bytes)",
                self.root_offset, file_len
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.root_offset, ROOT_BLOCK_OFFSET);
        assert_eq!(config.decoding, TextDecoding::Raw);
        assert!(config.validate(16).is_ok());
    }

    #[test]
    fn test_root_past_eof_rejected() {
        let config = AnalysisConfig::new(64, TextDecoding::Lossy);
        assert!(config.validate(64).is_err());
        assert!(config.validate(65).is_ok());
    }

    #[test]
    fn test_decoding_serializes_lowercase() {
        let json = serde_json::to_string(&TextDecoding::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
    }
}

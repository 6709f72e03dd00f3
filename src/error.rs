//! Error types for slack recovery.

use thiserror::Error;

/// Result type alias for slack recovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while walking a container or carving its slack.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// End of file reached before a varint's terminating byte.
    #[error("Malformed varint at offset {offset}: end of file before terminating byte")]
    MalformedVarint { offset: u64 },

    /// Varint value does not fit in 64 bits.
    #[error("Varint at offset {offset} overflows 64 bits")]
    VarintOverflow { offset: u64 },

    /// A block or gap could not be read in full.
    #[error("Cannot read {len} bytes at offset {offset}: {source}")]
    UnreadableRegion {
        offset: u64,
        len: u64,
        #[source]
        source: std::io::Error,
    },

    /// Slack bytes are not valid UTF-8 under strict decoding.
    #[error("Slack region at offset {offset} is not valid text: {source}")]
    NonTextSlack {
        offset: u64,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Invalid analysis configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

//! Error types for cidre.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for cidre operations.
///
/// Malformed delegation lines are not errors; they are skipped by the
/// record parser and only reported through a [`Reporter`](crate::Reporter).
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (metadata) error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Download error
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Invalid country code
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),

    /// Malformed line in a stored CIDR file
    #[error("invalid CIDR {value:?} at {}:{line}", path.display())]
    InvalidCidr {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Firewall error
    #[error("firewall error: {0}")]
    Firewall(String),
}

/// Result type alias for cidre operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for CIDR block construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Network address has bits set below the prefix
    #[error("host bits set in {0}")]
    HostBitsSet(String),

    /// Prefix length outside 0..=32 (IPv4) or 0..=128 (IPv6)
    #[error("prefix length {prefix} out of range for {version}")]
    PrefixOutOfRange { version: &'static str, prefix: u8 },

    /// Not CIDR notation at all
    #[error("invalid CIDR notation: {0}")]
    InvalidNotation(String),
}

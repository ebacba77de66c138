//! Bridge configuration parameters
//!
//! Loaded by the binary from an optional JSON file; library users build one
//! directly or take [`BridgeConfig::default()`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Scratch buffer size allocated by `ptp_init`.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 512 * 1024;

/// Output buffer size the binary hands to the dispatcher.
/// Large enough for a streamed live-view frame (up to four bytes per pixel byte).
pub const DEFAULT_OUTPUT_CAPACITY: usize = 2 * 1024 * 1024;

/// How the request parser treats malformed parameter lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// A malformed token ends the scan; everything parsed so far is kept.
    #[default]
    Lenient,
    /// A malformed token rejects the whole request.
    Strict,
}

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Scratch buffer size in bytes; `ptp_connect` refuses any other size.
    pub scratch_capacity: usize,
    /// Output buffer size in bytes (binary only).
    pub output_capacity: usize,
    /// Request parser strictness.
    pub parse_mode: ParseMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            parse_mode: ParseMode::Lenient,
        }
    }
}

impl BridgeConfig {
    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_capacity == 0 {
            return Err(ConfigError::ValidationFailed("scratch_capacity must be non-zero"));
        }
        if self.output_capacity == 0 {
            return Err(ConfigError::ValidationFailed("output_capacity must be non-zero"));
        }
        Ok(())
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

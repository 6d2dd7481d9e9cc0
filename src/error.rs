//! Error types for imagewire
//!
//! Provides a unified error type for every transport. None of these are
//! retried internally; the caller decides what to do with them.

use thiserror::Error;

use crate::transport::CallPhase;

/// Result type alias using ImageWireError
pub type Result<T> = std::result::Result<T, ImageWireError>;

/// Unified error type for imagewire operations
#[derive(Debug, Error)]
pub enum ImageWireError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Socket failure, tagged with the phase of the call it interrupted
    #[error("IO error while {phase}: {source}")]
    Transport {
        phase: CallPhase,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Server-reported Errors
    // -------------------------------------------------------------------------
    #[error("Image {name} not found: {message}")]
    ImageNotFound { name: String, message: String },

    #[error("Bad image format: {0}")]
    BadImageFormat(String),

    #[error("Push failed: {0}")]
    Push(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Bad protocol format: {0}")]
    BadProtocolFormat(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------
    #[error("Operation cancelled")]
    Cancelled,
}

impl ImageWireError {
    pub(crate) fn transport(phase: CallPhase, source: std::io::Error) -> Self {
        Self::Transport { phase, source }
    }

    /// True for framing failures reported by the codec
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::BadProtocolFormat(_))
    }

    /// True for socket and file system failures
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Transport { .. })
    }
}

//! # imagewire
//!
//! Client library for pushing PNG screenshots to, and pulling them from, a
//! remote image-hosting server:
//! - Raw-TCP binary protocol with a sentinel trailer instead of a length prefix
//! - HTTP alternative (multipart POST / plain GET) behind the same traits
//! - Blocking and suspending (cancellable) forms of every call
//! - One socket per call, no shared mutable state between calls
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │           (push(bytes) -> name, pull(name) -> image)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     TCP     │          │    HTTP     │
//!   │  Transport  │          │  Transport  │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ FrameCodec  │
//!   │ + Response  │
//!   │   Buffer    │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod image;
pub mod protocol;
pub mod transport;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ImageWireError, Result};
pub use config::{HttpConfig, TransportConfig};
pub use image::ImageFormat;
pub use protocol::PulledImage;
pub use transport::{AsyncImageTransport, HttpImageTransport, ImageTransport, TcpImageTransport};

/// Cancellation token accepted by the suspending transport forms
pub use tokio_util::sync::CancellationToken;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of imagewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Transport Module
//!
//! Two transports expose the same push/pull capability:
//! - [`TcpImageTransport`]: raw-TCP frames with a sentinel trailer
//! - [`HttpImageTransport`]: multipart POST / plain GET
//!
//! ## Call lifecycle
//! Every call opens a private connection, uses it exclusively and drops it
//! before returning, on success and failure alike:
//!
//! ```text
//! Connecting ─► Sending ─► ReceivingUntilEof ─► Decoding ─► Ok | Err
//! ```
//!
//! The only state shared between concurrent calls is the immutable config.

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::protocol::PulledImage;

mod http;
mod tcp;

pub use http::HttpImageTransport;
pub use tcp::TcpImageTransport;

/// Phase of a single push/pull call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Connecting,
    Sending,
    ReceivingUntilEof,
    Decoding,
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallPhase::Connecting => "connecting",
            CallPhase::Sending => "sending",
            CallPhase::ReceivingUntilEof => "receiving",
            CallPhase::Decoding => "decoding",
        };
        f.write_str(name)
    }
}

/// Blocking push/pull; the calling thread waits for completion
pub trait ImageTransport {
    /// Upload an image and return the server-assigned name
    fn push(&self, image: &[u8]) -> Result<String>;

    /// Download an image by name (`i123456` and `123456` are equivalent)
    ///
    /// `prefer_jpg` is a hint; check [`PulledImage::is_jpg`] for what the
    /// server actually sent.
    fn pull(&self, name: &str, prefer_jpg: bool) -> Result<PulledImage>;
}

/// Suspending push/pull; the calling task yields while waiting on I/O
///
/// Cancelling the token aborts the call at whichever suspension point it is
/// in and yields [`ImageWireError::Cancelled`](crate::ImageWireError::Cancelled).
pub trait AsyncImageTransport {
    fn push_async(
        &self,
        image: &[u8],
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String>> + Send;

    fn pull_async(
        &self,
        name: &str,
        prefer_jpg: bool,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<PulledImage>> + Send;
}

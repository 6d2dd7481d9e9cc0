//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol. Everything here is
//! pure; socket I/O lives in the transports and the stream helpers below.
//!
//! ## Wire Format
//!
//! ### Requests
//! ```text
//! PUSH: [0x00][mgr][0x00]     + image bytes + trailer
//! PULL: [0x01][mgr][jpg 0|1]  + utf8(name)  + trailer
//! ```
//!
//! ### Responses (terminated by connection close)
//! ```text
//! PUSH: [status]              + utf8(message) + trailer
//! PULL: [status][jpg 0|1]     + data          + trailer
//! ```

use std::io::{self, Write};
use std::ops::Range;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{CommandType, PullStatus, PulledImage, PushStatus, Request};
use crate::error::{ImageWireError, Result};

/// Request header size: command + response manager id + flag
pub const REQUEST_HEADER_SIZE: usize = 3;

/// Push response header size: status
const PUSH_RESPONSE_HEADER_SIZE: usize = 1;

/// Pull response header size: status + is-jpg flag
const PULL_RESPONSE_HEADER_SIZE: usize = 2;

/// Message reported when a response is empty or its trailer is missing
pub const SERVER_DIDNT_RESPOND: &str = "Server didn't respond.";

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Strip the `i` prefix distinguishing a URL name from a wire name
///
/// `i123456` and `123456` both map to `123456`. Stripping is repeated so that
/// prefixing an already prefixed name never changes the result.
pub fn canonical_name(name: &str) -> &str {
    name.trim_start_matches('i')
}

/// Encode a push request
///
/// Format: `[0x00][response_manager_id][0x00]` + image + trailer
pub fn encode_push(image: &[u8], response_manager_id: u8, trailer: &[u8]) -> Vec<u8> {
    build_frame(
        [CommandType::Push as u8, response_manager_id, 0],
        image,
        trailer,
    )
}

/// Encode a pull request, canonicalizing the name first
///
/// Format: `[0x01][response_manager_id][prefer_jpg]` + utf8(name) + trailer
pub fn encode_pull(name: &str, response_manager_id: u8, prefer_jpg: bool, trailer: &[u8]) -> Vec<u8> {
    build_frame(
        [CommandType::Pull as u8, response_manager_id, u8::from(prefer_jpg)],
        canonical_name(name).as_bytes(),
        trailer,
    )
}

/// Encode any request
pub fn encode_request(request: &Request, trailer: &[u8]) -> Vec<u8> {
    match request {
        Request::Push {
            response_manager_id,
            image,
        } => encode_push(image, *response_manager_id, trailer),
        Request::Pull {
            response_manager_id,
            name,
            prefer_jpg,
        } => encode_pull(name, *response_manager_id, *prefer_jpg, trailer),
    }
}

/// Decode a request as the server sees it
pub fn decode_request(raw: &[u8], trailer: &[u8]) -> Result<Request> {
    let payload = payload_range(raw, REQUEST_HEADER_SIZE, trailer).ok_or_else(|| {
        ImageWireError::BadProtocolFormat(format!(
            "Incomplete request: {} bytes without a valid trailer",
            raw.len()
        ))
    })?;

    let response_manager_id = raw[1];
    let flag = raw[2];
    let payload = &raw[payload];

    match CommandType::from_byte(raw[0]) {
        Some(CommandType::Push) => Ok(Request::Push {
            response_manager_id,
            image: payload.to_vec(),
        }),
        Some(CommandType::Pull) => {
            let name = std::str::from_utf8(payload).map_err(|e| {
                ImageWireError::BadProtocolFormat(format!("Image name is not UTF-8: {}", e))
            })?;
            Ok(Request::Pull {
                response_manager_id,
                name: name.to_string(),
                prefer_jpg: flag == 1,
            })
        }
        None => Err(ImageWireError::BadProtocolFormat(format!(
            "Unknown command type: 0x{:02x}",
            raw[0]
        ))),
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a push response
///
/// Format: `[status]` + utf8(message) + trailer
pub fn encode_push_response(status: u8, message: &str, trailer: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(PUSH_RESPONSE_HEADER_SIZE + message.len() + trailer.len());
    frame.push(status);
    frame.extend_from_slice(message.as_bytes());
    frame.extend_from_slice(trailer);
    frame
}

/// Encode a pull response
///
/// Format: `[status][is_jpg]` + data + trailer
pub fn encode_pull_response(status: u8, is_jpg: bool, data: &[u8], trailer: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(PULL_RESPONSE_HEADER_SIZE + data.len() + trailer.len());
    frame.push(status);
    frame.push(u8::from(is_jpg));
    frame.extend_from_slice(data);
    frame.extend_from_slice(trailer);
    frame
}

/// Decode a push response read to end-of-stream
///
/// Returns the server-assigned image name on success.
pub fn decode_push_response(raw: &[u8], trailer: &[u8]) -> Result<String> {
    let payload = payload_range(raw, PUSH_RESPONSE_HEADER_SIZE, trailer)
        .ok_or_else(|| ImageWireError::BadProtocolFormat(SERVER_DIDNT_RESPOND.to_string()))?;

    let status = raw[0];
    let message = String::from_utf8_lossy(&raw[payload]).trim().to_string();

    match PushStatus::from_byte(status) {
        Some(PushStatus::Ok) => Ok(message),
        Some(PushStatus::BadImageFormat) => Err(ImageWireError::BadImageFormat(message)),
        Some(PushStatus::Failed) => Err(ImageWireError::Push(message)),
        Some(PushStatus::BadProtocolFormat) => Err(ImageWireError::BadProtocolFormat(message)),
        None => {
            tracing::warn!(
                "Unknown push status 0x{:02x}, treating message {:?} as the image name",
                status,
                message
            );
            Ok(message)
        }
    }
}

/// Decode a pull response read to end-of-stream
///
/// `requested_name` is the name exactly as the caller passed it and is only
/// used to label a not-found error.
pub fn decode_pull_response(raw: Bytes, trailer: &[u8], requested_name: &str) -> Result<PulledImage> {
    let payload = payload_range(&raw, PULL_RESPONSE_HEADER_SIZE, trailer)
        .ok_or_else(|| ImageWireError::BadProtocolFormat(SERVER_DIDNT_RESPOND.to_string()))?;

    let status = raw[0];
    let is_jpg = raw[1] == 1;
    let data = raw.slice(payload);

    match PullStatus::from_byte(status) {
        Some(PullStatus::Ok) => Ok(PulledImage { data, is_jpg }),
        Some(PullStatus::NotFound) => Err(ImageWireError::ImageNotFound {
            name: requested_name.to_string(),
            message: String::from_utf8_lossy(&data).into_owned(),
        }),
        None => {
            let message = String::from_utf8_lossy(&data).trim().to_string();
            Err(ImageWireError::BadProtocolFormat(if message.is_empty() {
                format!("Unknown pull status: 0x{:02x}", status)
            } else {
                message
            }))
        }
    }
}

/// Locate the payload between a fixed-size header and the trailer
///
/// `None` when the frame is too short to hold both, or its tail is not the
/// trailer.
fn payload_range(raw: &[u8], header_len: usize, trailer: &[u8]) -> Option<Range<usize>> {
    if raw.is_empty() || raw.len() <= trailer.len() || raw.len() < header_len + trailer.len() {
        return None;
    }

    let end = raw.len() - trailer.len();
    if &raw[end..] != trailer {
        return None;
    }

    Some(header_len..end)
}

fn build_frame(header: [u8; REQUEST_HEADER_SIZE], payload: &[u8], trailer: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(REQUEST_HEADER_SIZE + payload.len() + trailer.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(trailer);
    frame
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a complete frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> io::Result<()> {
    writer.write_all(frame)?;
    writer.flush()
}

/// Write a complete frame to an async stream
pub async fn write_frame_async<W: AsyncWrite + Unpin>(writer: &mut W, frame: &[u8]) -> io::Result<()> {
    writer.write_all(frame).await?;
    writer.flush().await
}

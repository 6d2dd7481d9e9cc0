//! Protocol Module
//!
//! Defines the raw-TCP wire protocol spoken with the image server.
//!
//! Frames carry no length prefix. The sender appends a fixed trailer and the
//! server closes the connection after writing a response, so a response is
//! read to end-of-stream and the trailer is validated at its tail.
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────────┬─────────────┐
//! │ Cmd (1)  │ Mgr (1)  │ Flag (1) │     Payload      │   Trailer   │
//! └──────────┴──────────┴──────────┴──────────────────┴─────────────┘
//! ```
//!
//! ### Commands
//! - 0x00: PUSH  - Flag: 0, Payload: image bytes
//! - 0x01: PULL  - Flag: prefer JPG (0|1), Payload: UTF-8 image name
//!
//! ### Response Formats
//! ```text
//! PUSH: ┌───────────┬───────────────────────────┬─────────────┐
//!       │ Status(1) │      UTF-8 message        │   Trailer   │
//!       └───────────┴───────────────────────────┴─────────────┘
//! PULL: ┌───────────┬──────────┬────────────────┬─────────────┐
//!       │ Status(1) │ IsJpg(1) │   Image data   │   Trailer   │
//!       └───────────┴──────────┴────────────────┴─────────────┘
//! ```
//!
//! ### Push Status Codes
//! - 0x00: OK (message is the assigned name)
//! - 0x02: BAD_IMAGE_FORMAT
//! - 0x03: PUSH_FAILED
//! - 0x04: BAD_PROTOCOL_FORMAT
//!
//! ### Pull Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//!
//! The trailer is not escaped. A payload that happens to end with the trailer
//! bytes cannot be told apart from a real one.

mod buffer;
mod codec;
mod command;
mod response;

pub use buffer::{read_until_eof, read_until_eof_async, ResponseBuffer};
pub use codec::{
    canonical_name, decode_pull_response, decode_push_response, decode_request, encode_pull,
    encode_pull_response, encode_push, encode_push_response, encode_request, write_frame,
    write_frame_async, REQUEST_HEADER_SIZE, SERVER_DIDNT_RESPOND,
};
pub use command::{CommandType, Request};
pub use response::{PullStatus, PulledImage, PushStatus};

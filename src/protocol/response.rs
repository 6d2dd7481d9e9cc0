//! Response definitions
//!
//! Status bytes and the decoded result of a pull.

use bytes::Bytes;

/// Status byte leading a push response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PushStatus {
    Ok = 0x00,
    BadImageFormat = 0x02,
    Failed = 0x03,
    BadProtocolFormat = 0x04,
}

impl PushStatus {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(PushStatus::Ok),
            0x02 => Some(PushStatus::BadImageFormat),
            0x03 => Some(PushStatus::Failed),
            0x04 => Some(PushStatus::BadProtocolFormat),
            _ => None,
        }
    }
}

/// Status byte leading a pull response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PullStatus {
    Ok = 0x00,
    NotFound = 0x01,
}

impl PullStatus {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(PullStatus::Ok),
            0x01 => Some(PullStatus::NotFound),
            _ => None,
        }
    }
}

/// An image returned by a pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledImage {
    /// Raw image bytes, trailer stripped
    pub data: Bytes,

    /// Whether the server sent the JPG variant
    pub is_jpg: bool,
}

impl PulledImage {
    pub fn new(data: impl Into<Bytes>, is_jpg: bool) -> Self {
        Self {
            data: data.into(),
            is_jpg,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Bytes, bool) {
        (self.data, self.is_jpg)
    }
}

//! Request definitions
//!
//! Represents requests sent to the image server.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Push = 0x00,
    Pull = 0x01,
}

impl CommandType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(CommandType::Push),
            0x01 => Some(CommandType::Pull),
            _ => None,
        }
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Upload an image
    Push {
        response_manager_id: u8,
        image: Vec<u8>,
    },

    /// Download an image by its wire name (no `i` prefix)
    Pull {
        response_manager_id: u8,
        name: String,
        prefer_jpg: bool,
    },
}

impl Request {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Request::Push { .. } => CommandType::Push,
            Request::Pull { .. } => CommandType::Pull,
        }
    }

    pub fn response_manager_id(&self) -> u8 {
        match self {
            Request::Push { response_manager_id, .. }
            | Request::Pull { response_manager_id, .. } => *response_manager_id,
        }
    }
}

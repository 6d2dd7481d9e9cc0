//! Configuration for imagewire transports
//!
//! Centralized configuration with sensible defaults. A config is fixed when a
//! transport is constructed and only ever read afterwards.

use crate::error::{ImageWireError, Result};

/// Default trailer appended to every frame
pub const DEFAULT_TRAILER: [u8; 3] = [23, 3, 4];

/// Default initial receive buffer size (bytes)
pub const DEFAULT_RESPONSE_BUFFER_LEN: usize = 1024;

/// Default TCP port of the image server
pub const DEFAULT_PORT: u16 = 7600;

/// Configuration for the raw-TCP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub server_addr: String,

    /// Server TCP port
    pub server_port: u16,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Sentinel bytes that terminate every request and response
    pub trailer: Vec<u8>,

    /// Selects the server-side response manager handling the request
    pub response_manager_id: u8,

    /// Initial receive buffer capacity; grows on demand
    pub response_buffer_len: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1".to_string(),
            server_port: DEFAULT_PORT,
            trailer: DEFAULT_TRAILER.to_vec(),
            response_manager_id: 0,
            response_buffer_len: DEFAULT_RESPONSE_BUFFER_LEN,
        }
    }
}

impl TransportConfig {
    /// Create a new config builder
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }

    /// Check the invariants every transport call relies on
    pub fn validate(&self) -> Result<()> {
        if self.server_addr.trim().is_empty() {
            return Err(ImageWireError::Config("server address is empty".to_string()));
        }
        if self.trailer.is_empty() {
            return Err(ImageWireError::Config("trailer must not be empty".to_string()));
        }
        if self.response_buffer_len == 0 {
            return Err(ImageWireError::Config(
                "response buffer length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for TransportConfig
#[derive(Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the server host name or IP address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the server port
    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    /// Set the frame trailer bytes
    pub fn trailer(mut self, trailer: impl Into<Vec<u8>>) -> Self {
        self.config.trailer = trailer.into();
        self
    }

    /// Set the response manager identifier
    pub fn response_manager_id(mut self, id: u8) -> Self {
        self.config.response_manager_id = id;
        self
    }

    /// Set the initial receive buffer size (in bytes)
    pub fn response_buffer_len(mut self, len: usize) -> Self {
        self.config.response_buffer_len = len;
        self
    }

    pub fn build(self) -> TransportConfig {
        self.config
    }
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Base URL of the server, always ending with `/`
    pub base_url: String,

    /// Path suffix selecting a non-default response manager
    pub response_manager_name: String,
}

impl HttpConfig {
    /// Create a config for the given base URL (e.g. `http://localhost/`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            response_manager_name: String::new(),
        }
    }

    /// Use a non-default response manager
    pub fn with_response_manager(mut self, name: impl Into<String>) -> Self {
        self.response_manager_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ImageWireError::Config(format!(
                "base URL must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

//! Raw-TCP transport
//!
//! Opens one socket per call, writes the whole request frame, reads the
//! response byte by byte until the server closes the connection, then hands
//! the raw bytes to the codec.

use std::io::BufReader;
use std::net::TcpStream;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use super::{AsyncImageTransport, CallPhase, ImageTransport};
use crate::config::TransportConfig;
use crate::error::{ImageWireError, Result};
use crate::protocol::{
    decode_pull_response, decode_push_response, encode_pull, encode_push, read_until_eof,
    read_until_eof_async, write_frame, write_frame_async, PulledImage,
};

/// Image transport speaking the raw-TCP protocol
#[derive(Debug, Clone)]
pub struct TcpImageTransport {
    config: TransportConfig,
}

impl TcpImageTransport {
    /// Create a transport; fails if the config is unusable
    pub fn new(config: TransportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn push_frame(&self, image: &[u8]) -> Vec<u8> {
        encode_push(image, self.config.response_manager_id, &self.config.trailer)
    }

    fn pull_frame(&self, name: &str, prefer_jpg: bool) -> Vec<u8> {
        encode_pull(
            name,
            self.config.response_manager_id,
            prefer_jpg,
            &self.config.trailer,
        )
    }

    /// Send one frame and collect the full response (blocking)
    ///
    /// The socket is dropped on every return path.
    fn exchange(&self, frame: &[u8]) -> Result<Bytes> {
        let addr = (self.config.server_addr.as_str(), self.config.server_port);

        tracing::trace!("{} {}:{}", CallPhase::Connecting, addr.0, addr.1);
        let stream = TcpStream::connect(addr)
            .map_err(|e| ImageWireError::transport(CallPhase::Connecting, e))?;

        tracing::trace!("{} {} bytes", CallPhase::Sending, frame.len());
        write_frame(&mut &stream, frame)
            .map_err(|e| ImageWireError::transport(CallPhase::Sending, e))?;

        let mut reader = BufReader::new(&stream);
        let raw = read_until_eof(&mut reader, self.config.response_buffer_len)
            .map_err(|e| ImageWireError::transport(CallPhase::ReceivingUntilEof, e))?;

        tracing::trace!("{} {} bytes", CallPhase::Decoding, raw.len());
        Ok(raw)
    }

    /// Async counterpart of [`exchange`](Self::exchange)
    async fn exchange_async(&self, frame: &[u8]) -> Result<Bytes> {
        let addr = (self.config.server_addr.as_str(), self.config.server_port);

        tracing::trace!("{} {}:{}", CallPhase::Connecting, addr.0, addr.1);
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .map_err(|e| ImageWireError::transport(CallPhase::Connecting, e))?;

        tracing::trace!("{} {} bytes", CallPhase::Sending, frame.len());
        write_frame_async(&mut stream, frame)
            .await
            .map_err(|e| ImageWireError::transport(CallPhase::Sending, e))?;

        let mut reader = tokio::io::BufReader::new(&mut stream);
        let raw = read_until_eof_async(&mut reader, self.config.response_buffer_len)
            .await
            .map_err(|e| ImageWireError::transport(CallPhase::ReceivingUntilEof, e))?;

        tracing::trace!("{} {} bytes", CallPhase::Decoding, raw.len());
        Ok(raw)
    }

    /// Race the exchange against the cancellation token
    ///
    /// Losing the race drops the exchange future, which closes the socket.
    async fn exchange_cancellable(&self, frame: &[u8], cancel: &CancellationToken) -> Result<Bytes> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Call to {}:{} cancelled", self.config.server_addr, self.config.server_port);
                Err(ImageWireError::Cancelled)
            }
            raw = self.exchange_async(frame) => raw,
        }
    }
}

impl ImageTransport for TcpImageTransport {
    fn push(&self, image: &[u8]) -> Result<String> {
        tracing::debug!("Pushing {} bytes over TCP", image.len());
        let raw = self.exchange(&self.push_frame(image))?;
        let name = decode_push_response(&raw, &self.config.trailer)?;
        tracing::debug!("Pushed image as {}", name);
        Ok(name)
    }

    fn pull(&self, name: &str, prefer_jpg: bool) -> Result<PulledImage> {
        tracing::debug!("Pulling {} over TCP (prefer_jpg={})", name, prefer_jpg);
        let raw = self.exchange(&self.pull_frame(name, prefer_jpg))?;
        let image = decode_pull_response(raw, &self.config.trailer, name)?;
        tracing::debug!("Pulled {}: {} bytes, jpg={}", name, image.len(), image.is_jpg);
        Ok(image)
    }
}

impl AsyncImageTransport for TcpImageTransport {
    async fn push_async(&self, image: &[u8], cancel: &CancellationToken) -> Result<String> {
        tracing::debug!("Pushing {} bytes over TCP", image.len());
        let raw = self.exchange_cancellable(&self.push_frame(image), cancel).await?;
        let name = decode_push_response(&raw, &self.config.trailer)?;
        tracing::debug!("Pushed image as {}", name);
        Ok(name)
    }

    async fn pull_async(
        &self,
        name: &str,
        prefer_jpg: bool,
        cancel: &CancellationToken,
    ) -> Result<PulledImage> {
        tracing::debug!("Pulling {} over TCP (prefer_jpg={})", name, prefer_jpg);
        let raw = self
            .exchange_cancellable(&self.pull_frame(name, prefer_jpg), cancel)
            .await?;
        let image = decode_pull_response(raw, &self.config.trailer, name)?;
        tracing::debug!("Pulled {}: {} bytes, jpg={}", name, image.len(), image.is_jpg);
        Ok(image)
    }
}

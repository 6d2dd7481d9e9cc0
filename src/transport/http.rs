//! HTTP transport
//!
//! Same logical contract as the TCP transport over plain HTTP:
//! - push: `POST {base}push/{manager}` with a multipart/form-data body
//! - pull: `GET {base}i{name}{manager}`
//!
//! Status codes are mapped onto the shared error taxonomy.

use std::fmt;
use std::io::Read;

use tokio_util::sync::CancellationToken;
use ureq::Agent;

use super::{AsyncImageTransport, ImageTransport};
use crate::config::HttpConfig;
use crate::error::{ImageWireError, Result};
use crate::image::ImageFormat;
use crate::protocol::{canonical_name, PulledImage};

/// Multipart boundary; the reference server's multipart parser is strict about it
const BOUNDARY: &str = "-------------------------acebdf13572468";

const FIELD_NAME: &str = "fieldNameHere";
const FILE_NAME: &str = "screenshot.png";

const NOT_A_PNG: &str = "The server has refused this file because it's not an PNG image.";

/// Image transport speaking HTTP
#[derive(Clone)]
pub struct HttpImageTransport {
    config: HttpConfig,
    agent: Agent,
}

impl fmt::Debug for HttpImageTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpImageTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpImageTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        config.validate()?;
        // Non-2xx statuses carry server messages we need, so they must not
        // surface as transport errors.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl ImageTransport for HttpImageTransport {
    fn push(&self, image: &[u8]) -> Result<String> {
        push_blocking(&self.agent, &self.config, image)
    }

    fn pull(&self, name: &str, prefer_jpg: bool) -> Result<PulledImage> {
        pull_blocking(&self.agent, &self.config, name, prefer_jpg)
    }
}

impl AsyncImageTransport for HttpImageTransport {
    async fn push_async(&self, image: &[u8], cancel: &CancellationToken) -> Result<String> {
        let agent = self.agent.clone();
        let config = self.config.clone();
        let image = image.to_vec();
        run_blocking(cancel, move || push_blocking(&agent, &config, &image)).await
    }

    async fn pull_async(
        &self,
        name: &str,
        prefer_jpg: bool,
        cancel: &CancellationToken,
    ) -> Result<PulledImage> {
        let agent = self.agent.clone();
        let config = self.config.clone();
        let name = name.to_string();
        run_blocking(cancel, move || pull_blocking(&agent, &config, &name, prefer_jpg)).await
    }
}

/// Run a blocking request on tokio's blocking pool, racing the token
///
/// A cancelled request is abandoned; its thread finishes in the background
/// and the result is discarded.
async fn run_blocking<T, F>(cancel: &CancellationToken, request: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(request);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("HTTP call cancelled");
            Err(ImageWireError::Cancelled)
        }
        joined = handle => match joined {
            Ok(result) => result,
            Err(e) => Err(ImageWireError::Io(std::io::Error::other(e))),
        },
    }
}

fn push_blocking(agent: &Agent, config: &HttpConfig, image: &[u8]) -> Result<String> {
    let url = format!("{}push/{}", config.base_url, config.response_manager_name);
    tracing::debug!("Pushing {} bytes to {}", image.len(), url);

    let resp = agent
        .post(&url)
        .header(
            "Content-Type",
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .send(&multipart_body(image)[..])
        .map_err(|e| ImageWireError::Http(e.to_string()))?;

    let status = resp.status().as_u16();
    let body = read_body(resp.into_body())?;
    let message = String::from_utf8_lossy(&body).into_owned();

    match status {
        200 => {
            tracing::debug!("Pushed image as {}", message);
            Ok(message)
        }
        400 => Err(ImageWireError::BadImageFormat(NOT_A_PNG.to_string())),
        _ => Err(ImageWireError::Push(message)),
    }
}

fn pull_blocking(agent: &Agent, config: &HttpConfig, name: &str, prefer_jpg: bool) -> Result<PulledImage> {
    let url = format!(
        "{}i{}{}",
        config.base_url,
        canonical_name(name),
        config.response_manager_name
    );
    // The HTTP endpoint has no format negotiation; the hint is only logged.
    tracing::debug!("Pulling {} (prefer_jpg={})", url, prefer_jpg);

    let resp = agent
        .get(&url)
        .call()
        .map_err(|e| ImageWireError::Http(e.to_string()))?;

    let status = resp.status().as_u16();
    let body = read_body(resp.into_body())?;

    if status == 200 {
        let is_jpg = ImageFormat::sniff(&body).is_jpeg();
        Ok(PulledImage::new(body, is_jpg))
    } else {
        Err(ImageWireError::ImageNotFound {
            name: name.to_string(),
            message: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

fn read_body(body: ureq::Body) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    body.into_reader()
        .read_to_end(&mut buf)
        .map_err(|e| ImageWireError::Http(e.to_string()))?;
    Ok(buf)
}

/// Single-part multipart/form-data body carrying the PNG
fn multipart_body(image: &[u8]) -> Vec<u8> {
    let head = format!(
        "--{b}\r\nContent-Type: image/png\r\nContent-Disposition: form-data; name={f}; filename={n}; filename*=utf-8''{n}\r\n\r\n",
        b = BOUNDARY,
        f = FIELD_NAME,
        n = FILE_NAME
    );
    let tail = format!("\r\n--{}--\r\n", BOUNDARY);

    let mut body = Vec::with_capacity(head.len() + image.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(image);
    body.extend_from_slice(tail.as_bytes());
    body
}

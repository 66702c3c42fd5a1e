use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::{Source, check_range};
use crate::error::{Error, Result};

/// Tuning knobs for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after a timeout or connection failure, on top of the first attempt.
    pub max_retries: u32,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 10,
        }
    }
}

/// HTTP Range source for remote bundles
pub struct HttpSource {
    client: Client,
    url: String,
    size: u64,
    transferred_bytes: AtomicU64,
    max_retries: u32,
}

impl HttpSource {
    /// Create a new HTTP Range source with default options.
    ///
    /// This will send a HEAD request to verify Range support and get the bundle size
    pub async fn new(url: String) -> Result<Self> {
        Self::with_options(url, HttpOptions::default()).await
    }

    /// Create a new HTTP Range source.
    ///
    /// # Arguments
    ///
    /// * `url` - Bundle URL, also used as the source key
    /// * `options` - Request timeout and retry budget
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HEAD request fails to complete, and
    /// [`Error::Remote`] if the server answers with an error status, does not
    /// advertise `Accept-Ranges: bytes` or omits `Content-Length`.
    pub async fn with_options(url: String, options: HttpOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;

        let resp = client.head(&url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Remote(format!(
                "HEAD {} failed with status: {}",
                url,
                resp.status()
            )));
        }

        let accept_ranges = resp
            .headers()
            .get(header::ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");

        if !accept_ranges.contains("bytes") {
            return Err(Error::Remote(format!(
                "{} does not support Range requests",
                url
            )));
        }

        let size = resp
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Remote(format!("{} did not return Content-Length", url)))?;

        debug!(%url, size, "opened HTTP source");

        Ok(Self {
            client,
            url,
            size,
            transferred_bytes: AtomicU64::new(0),
            max_retries: options.max_retries,
        })
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Source for HttpSource {
    fn key(&self) -> &str {
        &self.url
    }

    async fn size(&self) -> Result<u64> {
        Ok(self.size)
    }

    async fn get_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        check_range(offset, length, self.size)?;
        if length == 0 {
            return Ok(Vec::new());
        }

        let end = offset + length as u64 - 1;
        let mut buf = Vec::with_capacity(length);
        let mut retry_count = 0;

        // Servers may answer a range with fewer bytes than asked; request the rest
        while buf.len() < length {
            let current_start = offset + buf.len() as u64;
            let range = format!("bytes={}-{}", current_start, end);

            let result = self
                .client
                .get(&self.url)
                .header(header::RANGE, &range)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    if resp.status() != StatusCode::PARTIAL_CONTENT {
                        return Err(Error::Remote(format!(
                            "range {} failed with status: {}",
                            range,
                            resp.status()
                        )));
                    }

                    let bytes = resp.bytes().await?;
                    if bytes.is_empty() {
                        return Err(Error::Remote(format!("range {} returned no data", range)));
                    }
                    let chunk_len = bytes.len().min(length - buf.len());
                    buf.extend_from_slice(&bytes[..chunk_len]);

                    self.transferred_bytes
                        .fetch_add(chunk_len as u64, Ordering::Relaxed);
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count > self.max_retries {
                        return Err(e.into());
                    }
                    warn!(
                        "connection error, retry {}/{}: {}",
                        retry_count, self.max_retries, e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(buf)
    }
}


use std::time::Duration;

use futures_util::StreamExt;
use news_core::{FetchError, TransportKind};
use news_logging::{news_debug, news_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::decode::decode_body;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Maximum idle time between reads of the response.
    pub read_timeout: Duration,
    /// Upper bound for the whole request, including the body.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Performs one GET and returns the body text. No retries.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::transport(TransportKind::Other, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::transport(
            TransportKind::Body,
            format!(
                "response too large (max {}, actual {})",
                self.settings.max_bytes, actual
            ),
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }
        let client = self.build_client()?;

        // The response owns the connection; every early return below drops it.
        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            news_warn!("Error response code: {} for {}", status.as_u16(), url);
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref());
        news_debug!(
            "Fetched {} bytes ({}) from {}",
            bytes.len(),
            decoded.encoding_label,
            url
        );
        Ok(decoded.text)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportKind::Body
    } else {
        TransportKind::Other
    };
    FetchError::transport(kind, err.to_string())
}

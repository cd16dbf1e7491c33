use std::pin::pin;
use std::time::Duration;

use crawl_logging::crawl_debug;
use futures_util::TryStreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Response;

use crate::decode::decode_html;
use crate::{FailureKind, FetchError, FetchMetadata, FetchedDocument};

/// Limits applied to every page request.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Largest body accepted, checked against Content-Length and while streaming.
    pub max_bytes: u64,
    pub user_agent: String,
    /// Media types (without parameters) treated as vacancy pages.
    pub html_media_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: concat!("vacancy-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
            html_media_types: ["text/html", "application/xhtml+xml"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Retrieves a page and hands it back decoded, ready for element lookups.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}

/// Fetches listing and results pages over HTTP(S) with one shared client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn over_limit(&self, actual: u64) -> Option<FetchError> {
        (actual > self.settings.max_bytes).then(|| {
            FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(actual),
                },
                "response body over the size limit",
            )
        })
    }

    /// Rejects error statuses, oversized declared bodies and non-HTML media.
    fn admit(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        if let Some(err) = response.content_length().and_then(|len| self.over_limit(len)) {
            return Err(err);
        }

        let content_type = header_text(response.headers());
        match content_type.as_deref() {
            Some(value) if !self.is_html(value) => Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: value.to_string(),
                },
                "not an HTML page",
            )),
            _ => Ok(content_type),
        }
    }

    fn is_html(&self, content_type: &str) -> bool {
        let media_type = content_type
            .split_once(';')
            .map_or(content_type, |(media, _)| media)
            .trim();
        self.settings
            .html_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }

    /// Streams the body, stopping as soon as it grows past the limit.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut chunks = pin!(response.bytes_stream().map_err(classify));
        while let Some(chunk) = chunks.try_next().await? {
            if let Some(err) = self.over_limit((body.len() + chunk.len()) as u64) {
                return Err(err);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let target = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(classify)?;
        let content_type = self.admit(&response)?;
        let final_url = response.url().to_string();
        let body = self.read_body(response).await?;

        let decoded = decode_html(&body, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        crawl_debug!(
            "GET {} -> {} ({} bytes as {})",
            url,
            final_url,
            body.len(),
            decoded.encoding_label
        );

        Ok(FetchedDocument {
            html: decoded.html,
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                content_type,
                encoding: decoded.encoding_label,
                byte_len: body.len() as u64,
            },
        })
    }
}

fn header_text(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)?
        .to_str()
        .ok()
        .map(str::to_string)
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}

use std::fmt;

use crate::page::RenderedPage;

/// A page body decoded to UTF-8, ready to be rendered for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub html: String,
    pub metadata: FetchMetadata,
}

impl FetchedDocument {
    /// Builds a document that was not fetched over the network.
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        let html = html.into();
        Self {
            metadata: FetchMetadata {
                original_url: url.clone(),
                final_url: url,
                content_type: Some("text/html".to_string()),
                encoding: "UTF-8".to_string(),
                byte_len: html.len() as u64,
            },
            html,
        }
    }

    /// Parses the body. Relative links resolve against the final url.
    pub fn render(&self) -> RenderedPage {
        RenderedPage::parse(&self.html, &self.metadata.final_url)
    }
}

/// Where a document came from and how its bytes were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// The url that was requested.
    pub original_url: String,
    /// The url after redirects; relative links resolve against it.
    pub final_url: String,
    pub content_type: Option<String>,
    /// Name of the encoding the body was decoded from.
    pub encoding: String,
    pub byte_len: u64,
}

/// Why a page could not be turned into a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self { kind, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Network,
}

impl FailureKind {
    /// Failures that a later attempt at the same url would hit again.
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::InvalidUrl
            | Self::TooLarge { .. }
            | Self::UnsupportedContentType { .. }
            | Self::Decode => true,
            Self::HttpStatus(code) => (400..500).contains(code) && !matches!(*code, 408 | 429),
            Self::Timeout | Self::RedirectLimitExceeded | Self::Network => false,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("malformed url"),
            Self::HttpStatus(code) => write!(f, "server answered {code}"),
            Self::Timeout => f.write_str("request timed out"),
            Self::RedirectLimitExceeded => f.write_str("too many redirects"),
            Self::TooLarge {
                max_bytes,
                actual: Some(actual),
            } => write!(f, "page is {actual} bytes, limit is {max_bytes}"),
            Self::TooLarge { max_bytes, .. } => write!(f, "page exceeds {max_bytes} bytes"),
            Self::UnsupportedContentType { content_type } => {
                write!(f, "not an HTML page ({content_type})")
            }
            Self::Decode => f.write_str("body is not valid text"),
            Self::Network => f.write_str("connection failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureKind, FetchError};

    #[test]
    fn error_message_names_the_failure() {
        let err = FetchError::new(FailureKind::HttpStatus(503), "Service Unavailable");
        assert_eq!(err.to_string(), "server answered 503: Service Unavailable");
        let err = FetchError::new(
            FailureKind::TooLarge {
                max_bytes: 10,
                actual: Some(11),
            },
            "over limit",
        );
        assert_eq!(err.to_string(), "page is 11 bytes, limit is 10: over limit");
    }

    #[test]
    fn gone_pages_are_permanent_but_outages_are_not() {
        assert!(FailureKind::HttpStatus(404).is_permanent());
        assert!(FailureKind::HttpStatus(410).is_permanent());
        assert!(FailureKind::InvalidUrl.is_permanent());
        assert!(!FailureKind::HttpStatus(429).is_permanent());
        assert!(!FailureKind::HttpStatus(503).is_permanent());
        assert!(!FailureKind::Timeout.is_permanent());
        assert!(!FailureKind::Network.is_permanent());
    }
}

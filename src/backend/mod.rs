//! Client side of the analysis backend.
//!
//! The backend classifies an uploaded image and produces an annotated output
//! image. [`Backend`] is the seam the session worker talks to;
//! [`HttpBackend`] is the real implementation.

pub mod api;
mod http;

use thiserror::Error;
use url::Url;

pub use api::{InputMetadata, UploadAccepted};
pub use http::HttpBackend;

/// Failures talking to the backend. All of them are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered `ok: false`.
    #[error("{0}")]
    Rejected(String),
    /// Non-success HTTP status without a usable error envelope.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    /// Connection, timeout or IO failure.
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body could not be understood.
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The configured base URL is unusable.
    #[error("Invalid backend URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl BackendError {
    /// Whether retrying the same idempotent request could help.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => *code >= 500,
            Self::Rejected(_) | Self::Decode(_) | Self::InvalidUrl { .. } => false,
        }
    }
}

/// Which of the two comparison images to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Input,
    Output,
}

impl ImageKind {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Input => "api/input-image",
            Self::Output => "api/output-image",
        }
    }
}

/// Operations the session needs from the analysis backend.
pub trait Backend: Send + Sync {
    /// Store `contents` under `file_name` and start analysis.
    fn upload(&self, file_name: &str, contents: &[u8]) -> Result<UploadAccepted, BackendError>;

    /// Scene classification and output name for an uploaded input.
    fn fetch_metadata(&self, input: &str, cache_bust: u64) -> Result<InputMetadata, BackendError>;

    /// Raw image bytes for an input or output artifact.
    fn fetch_image(
        &self,
        kind: ImageKind,
        name: &str,
        cache_bust: u64,
    ) -> Result<Vec<u8>, BackendError>;
}

/// Endpoint URL construction rooted at the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrls {
    base: Url,
}

impl BackendUrls {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(&format!("{trimmed}/")).map_err(|err| BackendError::InvalidUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(Self { base })
    }

    pub fn upload(&self) -> Url {
        self.endpoint("api/upload")
    }

    /// `GET /api/meta?input_name=<id>&ts=<cache-bust>`
    pub fn meta(&self, input: &str, cache_bust: u64) -> Url {
        let mut url = self.endpoint("api/meta");
        url.query_pairs_mut()
            .append_pair("input_name", input)
            .append_pair("ts", &cache_bust.to_string());
        url
    }

    /// `GET /api/{input,output}-image?name=<id>&ts=<cache-bust>`
    pub fn image(&self, kind: ImageKind, name: &str, cache_bust: u64) -> Url {
        let mut url = self.endpoint(kind.endpoint());
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("ts", &cache_bust.to_string());
        url
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        {
            let base_path = url.path().trim_end_matches('/').to_string();
            url.set_path(&format!("{base_path}/{path}"));
        }
        url
    }
}

use url::Url;

use super::{Backend, BackendError, BackendUrls, ImageKind, InputMetadata, UploadAccepted, api};
use crate::config::BackendSettings;
use crate::http_client::{self, RetryConfig};

const MAX_JSON_RESPONSE_BYTES: usize = 64 * 1024;
const UPLOAD_FIELD: &str = "file";

/// Blocking `ureq` client for the analysis backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    urls: BackendUrls,
    retry: RetryConfig,
    max_image_bytes: usize,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        Ok(Self {
            urls: BackendUrls::new(settings.trimmed_base_url())?,
            retry: settings.retry.into(),
            max_image_bytes: settings.max_image_bytes,
        })
    }

    fn get_with_retry(&self, url: &Url, max_bytes: usize) -> Result<Vec<u8>, BackendError> {
        http_client::retry_with_backoff(
            self.retry,
            || get_bytes(url, max_bytes),
            BackendError::is_transient,
        )
    }
}

impl Backend for HttpBackend {
    fn upload(&self, file_name: &str, contents: &[u8]) -> Result<UploadAccepted, BackendError> {
        let url = self.urls.upload();
        let body = http_client::multipart_file_body(UPLOAD_FIELD, file_name, contents);
        tracing::info!("Uploading {file_name} ({} bytes) to {url}", contents.len());
        let response = http_client::agent()
            .post(url.as_str())
            .set("Accept", "application/json")
            .set("Content-Type", &body.content_type)
            .send_bytes(&body.bytes);
        let text = read_text(response, MAX_JSON_RESPONSE_BYTES)?;
        api::parse_upload_response(&text)
    }

    fn fetch_metadata(&self, input: &str, cache_bust: u64) -> Result<InputMetadata, BackendError> {
        let url = self.urls.meta(input, cache_bust);
        tracing::debug!("Fetching metadata for {input}");
        let bytes = self.get_with_retry(&url, MAX_JSON_RESPONSE_BYTES)?;
        let text = String::from_utf8(bytes).map_err(|err| BackendError::Decode(err.to_string()))?;
        api::parse_meta_response(&text)
    }

    fn fetch_image(
        &self,
        kind: ImageKind,
        name: &str,
        cache_bust: u64,
    ) -> Result<Vec<u8>, BackendError> {
        let url = self.urls.image(kind, name, cache_bust);
        let bytes = self.get_with_retry(&url, self.max_image_bytes)?;
        image::guess_format(&bytes).map_err(|err| {
            BackendError::Decode(format!("{name} is not a recognized image: {err}"))
        })?;
        Ok(bytes)
    }
}

fn get_bytes(url: &Url, max_bytes: usize) -> Result<Vec<u8>, BackendError> {
    let response = http_client::agent().get(url.as_str()).call();
    let response = accept_response(response, max_bytes)?;
    http_client::read_response_bytes(response, max_bytes)
        .map_err(|err| BackendError::Transport(err.to_string()))
}

fn read_text(
    response: Result<ureq::Response, ureq::Error>,
    max_bytes: usize,
) -> Result<String, BackendError> {
    let response = accept_response(response, max_bytes)?;
    read_body_limited(response, max_bytes).map_err(BackendError::Transport)
}

/// Turn ureq's status errors into [`BackendError`], reading the error body.
fn accept_response(
    response: Result<ureq::Response, ureq::Error>,
    max_bytes: usize,
) -> Result<ureq::Response, BackendError> {
    match response {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => {
            let body = read_body_limited(response, max_bytes.min(MAX_JSON_RESPONSE_BYTES))
                .unwrap_or_else(|err| err);
            tracing::warn!("Backend returned HTTP {code}");
            Err(api::map_status_error(code, body))
        }
        Err(ureq::Error::Transport(err)) => Err(BackendError::Transport(err.to_string())),
    }
}

fn read_body_limited(response: ureq::Response, max_bytes: usize) -> Result<String, String> {
    let bytes =
        http_client::read_response_bytes(response, max_bytes).map_err(|err| err.to_string())?;
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

// API client module: a small blocking HTTP client that uploads photos to an
// event on the gallery backend. One request per photo, authenticated with a
// static API key header. Nothing here retries.

use crate::config::ApiSettings;
use crate::error::{ConfigError, UploadError};
use crate::scan::PhotoFile;
use crate::upload::{UploadOutcome, Uploader};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Characters of a non-JSON error body kept in the failure message.
const ERROR_BODY_PREVIEW: usize = 100;

/// Blocking client bound to one event. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    upload_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from resolved settings. The API key is installed as a
    /// default header so every request carries it.
    pub fn new(settings: &ApiSettings) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&settings.api_key)
            .map_err(|e| ConfigError::HttpClient(format!("invalid API key: {e}")))?;
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(ApiClient {
            client,
            upload_url: upload_url(&settings.api_url, &settings.event_id),
            timeout: settings.timeout,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// POST one photo as `multipart/form-data` (part name `files`, type
    /// `image/jpeg`) under `file_name` and return the server's JSON payload
    /// on success.
    pub fn upload_photo(
        &self,
        path: &Path,
        file_name: &str,
    ) -> Result<serde_json::Value, UploadError> {
        let file = File::open(path).map_err(|e| UploadError::Io(e.to_string()))?;

        let part = multipart::Part::reader(file)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| self.transport_error(e))?;
        let form = multipart::Form::new().part("files", part);

        let started = Instant::now();
        let res = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error(e))?;
        tracing::debug!(
            url = %self.upload_url,
            status = %res.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upload response"
        );

        self.classify(res)
    }

    fn classify(&self, res: Response) -> Result<serde_json::Value, UploadError> {
        let status = res.status();
        let text = res.text().map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            return Err(UploadError::Rejected(http_failure(status, &text)));
        }

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| UploadError::Rejected(format!("invalid JSON response: {e}")))?;
        if body.get("success").and_then(|v| v.as_bool()) == Some(true) {
            Ok(body)
        } else {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error");
            Err(UploadError::Rejected(format!("FAILED: {message}")))
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> UploadError {
        if e.is_timeout() {
            UploadError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            UploadError::Transport(e.to_string())
        }
    }
}

impl Uploader for ApiClient {
    fn upload(&self, photo: &PhotoFile) -> UploadOutcome {
        match self.upload_photo(&photo.path, &photo.name) {
            Ok(body) => UploadOutcome::Success(body),
            Err(e) => {
                tracing::debug!(file = %photo.name, error = %e, "upload failed");
                UploadOutcome::Failure(e)
            }
        }
    }
}

/// `{api_url}/admin/events/{event_id}/photos/upload`, tolerating a trailing
/// slash on the base URL.
pub fn upload_url(api_url: &str, event_id: &str) -> String {
    format!(
        "{}/admin/events/{}/photos/upload",
        api_url.trim_end_matches('/'),
        event_id
    )
}

/// Message for a non-200 reply: the JSON `error` field when there is one,
/// otherwise the start of the raw body.
fn http_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(ERROR_BODY_PREVIEW).collect());
    if detail.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {} - {}", status.as_u16(), detail)
    }
}

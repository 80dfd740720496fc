//! HTTP client for the transcription backend.
//!
//! Every operation returns an [`Outcome`] — data plus an optional normalized
//! error message — and never `Err`.  Callers treat list, upload, and search
//! uniformly: apply the data, show the message if one is present.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::media;
use crate::record::{TranscriptionRecord, UploadReply};

/// Fallback message when `GET /api/transcriptions` fails without a
/// server-provided error text.
pub const FETCH_FALLBACK: &str = "Failed to fetch transcriptions";
/// Fallback message for `POST /api/transcribe`.
pub const UPLOAD_FALLBACK: &str = "Failed to upload and transcribe file";
/// Fallback message for `GET /api/search`.
pub const SEARCH_FALLBACK: &str = "Failed to search transcriptions";

/// The uniform result shape of every API operation.
///
/// `error == None` means success.  On failure `data` still carries a usable
/// value (empty list, `None`) so the caller can apply it unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn failed(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// What actually went wrong, before normalization into a user-visible string.
#[derive(Debug, Error)]
enum RequestError {
    /// Backend answered non-2xx with a structured `{"error": …}` body.  The
    /// text is surfaced to the user verbatim.
    #[error("{0}")]
    Server(String),
    /// Backend answered non-2xx without a usable error body.
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// Local read of the file being uploaded failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// Collapse to the user-visible message: server-reported text verbatim,
    /// everything else the operation's fallback string.
    fn message(self, fallback: &str) -> String {
        match self {
            Self::Server(text) => text,
            other => {
                warn!("request failed: {other}");
                fallback.to_string()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// `base_url` is the backend root without the `/api` prefix,
    /// e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch the full record collection.
    pub async fn list_all(&self) -> Outcome<Vec<TranscriptionRecord>> {
        match self.get_records(format!("{}/transcriptions", self.base), &[]).await {
            Ok(records) => Outcome::ok(records),
            Err(e) => Outcome::failed(Vec::new(), e.message(FETCH_FALLBACK)),
        }
    }

    /// Search past transcriptions.  An empty query is equivalent to
    /// [`list_all`](Self::list_all) and never hits the search endpoint.
    pub async fn search(&self, query: &str) -> Outcome<Vec<TranscriptionRecord>> {
        if query.is_empty() {
            return self.list_all().await;
        }
        let url = format!("{}/search", self.base);
        match self.get_records(url, &[("q", query)]).await {
            Ok(records) => Outcome::ok(records),
            Err(e) => Outcome::failed(Vec::new(), e.message(SEARCH_FALLBACK)),
        }
    }

    /// Upload one file for transcription.  The raw bytes go up as a single
    /// multipart part named `file`, matching what the backend expects.
    pub async fn upload(&self, path: &Path) -> Outcome<Option<UploadReply>> {
        match self.post_file(path).await {
            Ok(reply) => Outcome::ok(Some(reply)),
            Err(e) => Outcome::failed(None, e.message(UPLOAD_FALLBACK)),
        }
    }

    async fn get_records(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<Vec<TranscriptionRecord>, RequestError> {
        debug!("GET {url} params={params:?}");
        let response = self.http.get(&url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn post_file(&self, path: &Path) -> Result<UploadReply, RequestError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let bytes = tokio::fs::read(path).await?;

        debug!("POST {}/transcribe file={file_name} ({} bytes)", self.base, bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(media::mime_for(path))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/transcribe", self.base))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Classify a non-2xx response: structured `{error}` bodies surface verbatim,
/// anything else keeps only the status.
async fn error_from_response(response: reqwest::Response) -> RequestError {
    let status = response.status();
    match response.bytes().await {
        Ok(body) => match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(parsed) if !parsed.error.is_empty() => RequestError::Server(parsed.error),
            _ => RequestError::Status(status),
        },
        Err(e) => RequestError::Transport(e),
    }
}

//! Transfer client for the processing endpoint.
//!
//! One call is one multipart request; there is no automatic retry. A failed
//! transfer is surfaced to the session and resubmission stays a user
//! decision.

use super::state::ExtractionResult;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Fallback shown when a failed response carries no usable message.
pub const GENERIC_FAILURE: &str = "Failed to process file";

/// The original client had no request timeout at all; a bounded one is safer
/// and does not change the single-shot contract.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a transfer produced no extraction.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { message: String },
    /// The request never completed (unreachable host, abort, timeout).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl TransferError {
    /// User-facing message, shown verbatim and never truncated.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// One multipart upload against the processing endpoint. Implementations
/// issue exactly one request per call.
#[async_trait::async_trait]
pub trait TransferClient: Send + Sync {
    async fn submit(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionResult, TransferError>;
}

/// reqwest-backed transfer client for a running server.
pub struct HttpTransferClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransferClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait::async_trait]
impl TransferClient for HttpTransferClient {
    async fn submit(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionResult, TransferError> {
        use reqwest::multipart::{Form, Part};

        info!("Submitting {} ({} bytes) for processing", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(format!("{}/api/ocr", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!("Processing endpoint returned {}: {}", status, body);
            return Err(TransferError::Server {
                message: server_message(&body),
            });
        }

        Ok(resp.json::<ExtractionResult>().await?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Server-reported message from an error body, or the generic fallback when
/// the body is not the expected JSON shape.
fn server_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| GENERIC_FAILURE.to_string())
}

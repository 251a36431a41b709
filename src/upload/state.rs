//! Upload session state machine.
//!
//! A session owns at most one candidate file and at most one in-flight
//! transfer. All mutation goes through the methods here, so the session can
//! be driven and unit-tested without any UI or network attached.
//!
//! Asynchronous completions (preview reads, transfer responses) carry the id
//! of the candidate they were issued for and are dropped when that id no
//! longer matches the live candidate. A stale callback can therefore never
//! clobber state the user has already moved past.

use crate::validate::{self, Verdict};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use uuid::Uuid;

use super::transfer::TransferError;

/// Lifecycle of the single transfer a session may have outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Selected,
    Submitting,
    Succeeded,
    Failed,
}

/// Metadata of a file the user picked, before any bytes move.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// The staged file. The id tags asynchronous operations issued for it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub preview_data_uri: Option<String>,
}

/// Payload of a successful extraction, as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    pub file_name: String,
    #[serde(rename = "fileSize")]
    pub file_size_bytes: u64,
    pub mime_type: String,
}

/// Single-owner state for one upload/extract cycle.
#[derive(Debug, Default)]
pub struct UploadSession {
    phase: Phase,
    candidate: Option<Candidate>,
    result: Option<ExtractionResult>,
    error: Option<String>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    /// Failure message of the last transfer, shown to the user verbatim.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stage a new candidate. A rejection leaves the session untouched; an
    /// accepted file atomically replaces the prior candidate, preview and
    /// result.
    pub fn select(&mut self, meta: FileMeta) -> Verdict {
        let verdict = validate::validate(&meta.name, meta.size_bytes);
        if !verdict.accepted {
            return verdict;
        }

        self.candidate = Some(Candidate {
            id: Uuid::new_v4(),
            name: meta.name,
            size_bytes: meta.size_bytes,
            mime_type: meta.mime_type,
            preview_data_uri: None,
        });
        self.result = None;
        self.error = None;
        self.phase = Phase::Selected;
        verdict
    }

    /// Install an asynchronously derived image preview. Ignored when the
    /// candidate it was read for is no longer the live one.
    pub fn apply_preview(&mut self, candidate_id: Uuid, data_uri: String) {
        if let Some(candidate) = self.candidate.as_mut() {
            if candidate.id == candidate_id {
                candidate.preview_data_uri = Some(data_uri);
            }
        }
    }

    /// Move to `Submitting` and hand back the id the transfer must report
    /// with. Valid from `Selected`, and from `Failed` for an explicit
    /// user-triggered resubmission. Any other phase returns `None`; in
    /// particular a second submit while one is in flight is a no-op.
    pub fn begin_submit(&mut self) -> Option<Uuid> {
        match self.phase {
            Phase::Selected | Phase::Failed => {}
            _ => return None,
        }
        let id = self.candidate.as_ref()?.id;
        self.error = None;
        self.phase = Phase::Submitting;
        Some(id)
    }

    /// Apply a transfer outcome. Outcomes tagged with a stale candidate id,
    /// or arriving after the session left `Submitting` (cleared, reselected),
    /// are discarded.
    pub fn complete_transfer(
        &mut self,
        candidate_id: Uuid,
        outcome: Result<ExtractionResult, TransferError>,
    ) {
        if self.phase != Phase::Submitting {
            return;
        }
        match self.candidate.as_ref() {
            Some(candidate) if candidate.id == candidate_id => {}
            _ => return,
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = Phase::Succeeded;
            }
            Err(err) => {
                self.error = Some(err.message());
                self.phase = Phase::Failed;
            }
        }
    }

    /// Drop candidate, preview, result and error; back to `Idle`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Encode image bytes as a `data:` URI for inline preview. Non-image types
/// have no preview.
pub fn preview_data_uri(mime_type: &str, bytes: &[u8]) -> Option<String> {
    if !validate::is_image_mime(mime_type) {
        return None;
    }
    Some(format!("data:{};base64,{}", mime_type, BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::transfer::TransferClient;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn meta(name: &str, size: u64, mime: &str) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            size_bytes: size,
            mime_type: mime.to_string(),
        }
    }

    fn hello_result() -> ExtractionResult {
        ExtractionResult {
            text: "Hello".to_string(),
            file_name: "report.pdf".to_string(),
            file_size_bytes: 2_097_152,
            mime_type: "application/pdf".to_string(),
        }
    }

    /// Counts calls so tests can assert exactly one transfer happened.
    struct CountingClient {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TransferClient for CountingClient {
        async fn submit(
            &self,
            _file_name: &str,
            _mime_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<ExtractionResult, TransferError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(hello_result())
        }
    }

    #[test]
    fn test_successful_cycle_reaches_succeeded() {
        let mut session = UploadSession::new();
        let verdict = session.select(meta("report.pdf", 2 * 1024 * 1024, "application/pdf"));
        assert!(verdict.accepted);
        assert_eq!(session.phase(), Phase::Selected);

        let id = session.begin_submit().unwrap();
        assert_eq!(session.phase(), Phase::Submitting);

        session.complete_transfer(id, Ok(hello_result()));
        assert_eq!(session.phase(), Phase::Succeeded);
        assert_eq!(session.result().unwrap().text, "Hello");
    }

    #[test]
    fn test_rejected_selection_leaves_session_untouched() {
        let mut session = UploadSession::new();
        session.select(meta("report.pdf", 1024, "application/pdf"));

        let verdict = session.select(meta("malware.exe", 1024, "application/x-msdownload"));
        assert!(!verdict.accepted);
        assert_eq!(session.phase(), Phase::Selected);
        assert_eq!(session.candidate().unwrap().name, "report.pdf");

        let oversized = session.select(meta("huge.png", 11 * 1024 * 1024, "image/png"));
        assert!(!oversized.accepted);
        assert!(oversized.reason.unwrap().contains("10MB"));
        assert_eq!(session.candidate().unwrap().name, "report.pdf");
    }

    #[test]
    fn test_new_selection_replaces_prior_state() {
        let mut session = UploadSession::new();
        session.select(meta("first.pdf", 1024, "application/pdf"));
        let id = session.begin_submit().unwrap();
        session.complete_transfer(id, Ok(hello_result()));
        assert_eq!(session.phase(), Phase::Succeeded);

        session.select(meta("second.png", 2048, "image/png"));
        assert_eq!(session.phase(), Phase::Selected);
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.candidate().unwrap().name, "second.png");
        assert!(session.candidate().unwrap().preview_data_uri.is_none());
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut session = UploadSession::new();
        session.select(meta("old.png", 1024, "image/png"));
        let old_id = session.candidate().unwrap().id;

        session.select(meta("new.png", 1024, "image/png"));
        session.apply_preview(old_id, "data:image/png;base64,AAAA".to_string());
        assert!(session.candidate().unwrap().preview_data_uri.is_none());

        let new_id = session.candidate().unwrap().id;
        session.apply_preview(new_id, "data:image/png;base64,BBBB".to_string());
        assert_eq!(
            session.candidate().unwrap().preview_data_uri.as_deref(),
            Some("data:image/png;base64,BBBB")
        );
    }

    #[tokio::test]
    async fn test_double_submit_performs_one_transfer() {
        let client = CountingClient {
            calls: AtomicUsize::new(0),
        };
        let mut session = UploadSession::new();
        session.select(meta("report.pdf", 1024, "application/pdf"));

        let first = session.begin_submit();
        let second = session.begin_submit();
        assert!(first.is_some());
        assert!(second.is_none());

        for id in [first, second].into_iter().flatten() {
            let outcome = client.submit("report.pdf", "application/pdf", vec![0u8]).await;
            session.complete_transfer(id, outcome);
        }

        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), Phase::Succeeded);
    }

    #[test]
    fn test_clear_during_flight_discards_completion() {
        let mut session = UploadSession::new();
        session.select(meta("report.pdf", 1024, "application/pdf"));
        let id = session.begin_submit().unwrap();

        session.clear();
        assert_eq!(session.phase(), Phase::Idle);

        session.complete_transfer(id, Ok(hello_result()));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_reselect_during_flight_discards_completion() {
        let mut session = UploadSession::new();
        session.select(meta("first.pdf", 1024, "application/pdf"));
        let id = session.begin_submit().unwrap();

        session.select(meta("second.pdf", 1024, "application/pdf"));
        session.complete_transfer(id, Ok(hello_result()));

        assert_eq!(session.phase(), Phase::Selected);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_failed_transfer_stores_message_and_allows_resubmit() {
        let mut session = UploadSession::new();
        session.select(meta("report.pdf", 1024, "application/pdf"));
        let id = session.begin_submit().unwrap();

        session.complete_transfer(
            id,
            Err(TransferError::Server {
                message: "Failed to process file for OCR extraction".to_string(),
            }),
        );
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(
            session.error(),
            Some("Failed to process file for OCR extraction")
        );

        // Candidate is retained, so the user can retry without reselecting.
        let retry = session.begin_submit().unwrap();
        session.complete_transfer(retry, Ok(hello_result()));
        assert_eq!(session.phase(), Phase::Succeeded);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_submit_without_candidate_is_noop() {
        let mut session = UploadSession::new();
        assert!(session.begin_submit().is_none());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_preview_only_for_images() {
        let uri = preview_data_uri("image/png", &[1, 2, 3]).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(preview_data_uri("application/pdf", &[1, 2, 3]).is_none());
    }

    #[test]
    fn test_result_deserializes_from_wire_shape() {
        let result: ExtractionResult = serde_json::from_str(
            r#"{"success":true,"text":"Hello","fileName":"report.pdf","fileSize":2097152,"mimeType":"application/pdf"}"#,
        )
        .unwrap();
        assert_eq!(result, hello_result());
    }
}

//! Display artifacts derived from an extraction result.
//!
//! Pure derivations only: nothing here touches the network or the file
//! system. Writing the download blob and driving the clipboard are the
//! host's job.

use super::state::ExtractionResult;

/// File name used for the downloadable text blob.
pub const DOWNLOAD_FILE_NAME: &str = "extracted-text.txt";

/// A downloadable rendering of the extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Number of characters in the extracted text (Unicode scalars, not bytes).
pub fn character_count(result: &ExtractionResult) -> usize {
    result.text.chars().count()
}

/// Plain-text blob for saving to disk.
pub fn plain_text_download(result: &ExtractionResult) -> Download {
    Download {
        file_name: DOWNLOAD_FILE_NAME,
        mime_type: "text/plain",
        bytes: result.text.clone().into_bytes(),
    }
}

/// Payload for copy-to-clipboard, verbatim.
pub fn clipboard_payload(result: &ExtractionResult) -> &str {
    &result.text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str) -> ExtractionResult {
        ExtractionResult {
            text: text.to_string(),
            file_name: "report.pdf".to_string(),
            file_size_bytes: 2_097_152,
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_character_count() {
        assert_eq!(character_count(&result("Hello")), 5);
        assert_eq!(character_count(&result("")), 0);
    }

    #[test]
    fn test_character_count_is_scalars_not_bytes() {
        let r = result("Olá, você");
        assert_eq!(character_count(&r), 9);
        assert!(r.text.len() > 9);
    }

    #[test]
    fn test_download_blob() {
        let download = plain_text_download(&result("Hello"));
        assert_eq!(download.file_name, "extracted-text.txt");
        assert_eq!(download.mime_type, "text/plain");
        assert_eq!(download.bytes, b"Hello");
    }

    #[test]
    fn test_derivations_are_idempotent() {
        let r = result("same text");
        assert_eq!(plain_text_download(&r), plain_text_download(&r));
        assert_eq!(clipboard_payload(&r), clipboard_payload(&r));
        assert_eq!(clipboard_payload(&r), "same text");
    }
}

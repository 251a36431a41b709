//! Stubbed text extraction for uploaded documents.

use serde::Serialize;

/// Wire shape of a successful `/api/ocr` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrSuccess {
    pub success: bool,
    pub text: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
}

/// Build the extraction text for an accepted upload.
///
/// No real OCR engine is wired up; the endpoint echoes the file metadata into
/// a canned paragraph so the rest of the pipeline (transfer, presentation,
/// download) can be driven end to end. A production deployment would replace
/// this with a call into an actual OCR service (Cloud Vision, Textract,
/// Tesseract, ...) while keeping the response contract intact.
pub fn mock_extracted_text(file_name: &str, size_bytes: u64, mime_type: &str) -> String {
    format!(
        "This is extracted text from the uploaded file: {file_name}\n\n\
         The file was successfully processed and this would normally contain the actual \
         text content extracted from your document using OCR technology.\n\n\
         File details:\n\
         - Name: {file_name}\n\
         - Size: {size_bytes} bytes\n\
         - Type: {mime_type}\n\n\
         In a production environment, this would be replaced with actual OCR processing results."
    )
}

//! File validation rules shared by the upload client and the server.
//!
//! The client runs these checks before a transfer starts, purely as a UX
//! shortcut. The server re-runs the same rules on every upload, so a bypassed
//! client still cannot push a disallowed or oversized file through.

/// Per-file size ceiling: 10 MiB. Sizes strictly greater are rejected.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File extensions accepted for processing (compared lowercased).
pub const ALLOWED_EXTENSIONS: [&str; 6] = [".pdf", ".png", ".jpg", ".jpeg", ".doc", ".docx"];

/// Rejection message for a MIME type outside the allow-list.
pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid file type. Only PDF, PNG, JPG, JPEG, DOC, and DOCX files are allowed.";

const ALLOWED_MIME_TYPES: [&str; 6] = [
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Outcome of one validation pass. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

/// Decide whether a candidate file may enter the pipeline.
///
/// Pure function over the file name and byte size; the reason names the rule
/// that failed. Exactly `MAX_FILE_SIZE` bytes is still accepted.
pub fn validate(file_name: &str, size_bytes: u64) -> Verdict {
    match extension_of(file_name) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Verdict::rejected(format!(
                "Invalid file type. Allowed extensions: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }
    }

    if size_bytes > MAX_FILE_SIZE {
        return Verdict::rejected("File is too large. The limit is 10MB per file.");
    }

    Verdict::accepted()
}

/// Lowercased extension of a file name, leading dot included.
pub fn extension_of(file_name: &str) -> Option<String> {
    let idx = file_name.rfind('.')?;
    Some(file_name[idx..].to_lowercase())
}

/// Whether a MIME type is on the server-side allow-list.
pub fn mime_allowed(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// MIME type the server expects for an allowed extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        ".pdf" => Some("application/pdf"),
        ".png" => Some("image/png"),
        ".jpg" | ".jpeg" => Some("image/jpeg"),
        ".doc" => Some("application/msword"),
        ".docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

/// Image types get an inline preview; everything else does not.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

//! Client-side upload pipeline for the processing endpoint.
//!
//! One [`UploadSession`] owns the full lifecycle of a single candidate file:
//! validation, staging, the multipart transfer, and the extraction result it
//! produces. [`present`] derives display artifacts from that result.

pub mod present;
pub mod state;
pub mod transfer;

pub use state::{Candidate, ExtractionResult, FileMeta, Phase, UploadSession};
pub use transfer::{HttpTransferClient, TransferClient, TransferError};

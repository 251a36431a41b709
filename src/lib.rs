//! Text Extractor Pro - document catalog server and OCR upload client.
//!
//! The server half (`text-extractor-server`) exposes the REST API: a stubbed
//! OCR upload endpoint plus read-only catalog browsing. The client half lives
//! in [`upload`] and drives one upload/extract cycle against that API.

pub mod article;
pub mod catalog;
pub mod extract;
pub mod storage;
pub mod upload;
pub mod validate;

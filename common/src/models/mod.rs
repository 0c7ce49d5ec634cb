//! Request and response payloads.

pub mod download;
pub mod metadata;

// Re-export commonly used types
pub use download::{DownloadRequest, DownloadTarget, MISSING_PARAMETERS};
pub use metadata::MetadataTree;

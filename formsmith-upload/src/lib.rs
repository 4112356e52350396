//! Media upload collaborator
//!
//! Image and banner fields hand picked files to a `MediaUploader` and get back
//! a resolvable URL. The fields never see where or how a file is stored.
//!
//! - `LocalUploader` writes into a directory served under a public prefix
//! - `MediaUpload::from_data_url` accepts base64 data URLs from canvas-style editors

pub mod error;
pub mod local;
pub mod media;

use async_trait::async_trait;

pub use error::{Result, UploadError};
pub use local::{LocalUploader, DEFAULT_MAX_BYTES, DEFAULT_PUBLIC_PREFIX};
pub use media::{MediaRef, MediaUpload};

/// Stores a file and returns a reference to it.
///
/// Uploads are suspending operations. Callers must not assume results arrive
/// in the order the uploads were started.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, media: MediaUpload) -> Result<MediaRef>;
}

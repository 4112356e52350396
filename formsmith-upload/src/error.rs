//! Error types for media uploads

use thiserror::Error;

/// Result type for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Errors an upload can end with. All of them are shown to the user.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing was attached, or the payload is empty
    #[error("no file received")]
    NoFile,

    #[error("file is {size} bytes, the limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Content type missing from the allow list, or not recognisable at all
    #[error("unsupported file type: {content_type}")]
    UnsupportedType { content_type: String },

    /// Empty name, or a name that would escape the upload directory
    #[error("invalid file name: '{name}'")]
    InvalidName { name: String },

    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Whether retrying with a different file could succeed.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, UploadError::Io(_))
    }
}

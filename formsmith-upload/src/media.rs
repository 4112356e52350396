//! Upload payloads and the references an upload resolves to.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, UploadError};

/// A file handed to an uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
    stamp_name: bool,
}

impl MediaUpload {
    /// A file as picked by the user. The stored name gets a timestamp prefix.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
            stamp_name: true,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Decode a `data:image/<type>;base64,<payload>` URL, as sent by the banner editor.
    ///
    /// The file gets a random `<uuid>.png` name, stored as is.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| UploadError::MalformedDataUrl("missing 'data:' scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| UploadError::MalformedDataUrl("missing ',' separator".into()))?;
        let content_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| UploadError::MalformedDataUrl("only base64 payloads are supported".into()))?;
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }
        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| UploadError::MalformedDataUrl(e.to_string()))?;

        Ok(Self {
            file_name: format!("{}.png", uuid::Uuid::new_v4()),
            content_type: Some(content_type.to_string()),
            bytes,
            stamp_name: false,
        })
    }

    /// Read a file from disk, keeping its base name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::InvalidName {
                name: path.display().to_string(),
            })?
            .to_string();
        let bytes = fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn stamp_name(&self) -> bool {
        self.stamp_name
    }

    /// The declared content type, or one sniffed from the leading bytes.
    pub fn content_type(&self) -> Option<String> {
        self.content_type
            .clone()
            .or_else(|| infer::get(&self.bytes).map(|kind| kind.mime_type().to_string()))
    }
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Public URL, e.g. `/uploads/1700000000000-cat.png`.
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

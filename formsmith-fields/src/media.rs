//! Upload bookkeeping shared by form controls, properties editors and hosts.
//!
//! Uploads complete asynchronously and out of order with respect to user
//! edits. Every upload is tagged when it starts; a result whose tag is no
//! longer current is discarded instead of applied.

use serde::{Deserialize, Serialize};

/// What an upload collaborator hands back: a media URL or a user-facing message.
pub type MediaOutcome = std::result::Result<String, String>;

/// Upload status of a single field, rendered by the field itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "kebab-case")]
pub enum UploadState {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl UploadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, UploadState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What happened to an upload result when it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadDisposition {
    /// The media reference was applied to the field.
    Applied,
    /// A newer upload or mutation superseded this one; the result was dropped.
    Stale,
    /// The upload failed and the field now shows the message.
    Failed(String),
}

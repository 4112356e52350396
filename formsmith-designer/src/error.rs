//! Error types for the designer, live forms and the form store

use formsmith_fields::FieldsError;
use thiserror::Error;

/// Result type for designer operations
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Errors that can occur while designing, filling in or storing forms
#[derive(Debug, Error)]
pub enum DesignerError {
    /// Registry, render or mutation error from the field layer
    #[error(transparent)]
    Fields(#[from] FieldsError),

    /// Form not found by ULID or share URL
    #[error("form not found: {id}")]
    FormNotFound { id: String },

    /// Published forms are frozen for editing
    #[error("form '{name}' is published and can no longer be edited")]
    FormPublished { name: String },

    /// Only published forms can be filled in
    #[error("form '{name}' is not published")]
    NotPublished { name: String },

    /// An upload targeted a field type that has no media attribute
    #[error("field type '{type_tag}' does not take uploads")]
    NoMediaSlot { type_tag: String },

    /// No control with this id exists in the live form
    #[error("no live control for field: {id}")]
    NoControl { id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DesignerError {
    /// True when a mutation or upload targeted a field that is no longer in the form.
    pub fn is_instance_not_found(&self) -> bool {
        matches!(self, DesignerError::Fields(e) if e.is_instance_not_found())
    }
}

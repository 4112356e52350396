//! Error types for the field registry

use thiserror::Error;

/// Result type for field registry operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field registry operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A descriptor with this type tag is already registered
    #[error("duplicate field type: {type_tag}")]
    DuplicateTypeTag { type_tag: String },

    /// A descriptor is missing one of its render variants or its validator
    #[error("incomplete descriptor for '{type_tag}': missing {}", missing.join(", "))]
    IncompleteDescriptor {
        type_tag: String,
        missing: Vec<&'static str>,
    },

    /// No descriptor is registered for this type tag
    #[error("unknown field type: {type_tag}")]
    UnknownFieldType { type_tag: String },

    /// The host holds no instance with this id
    #[error("field instance not found: {id}")]
    InstanceNotFound { id: String },

    /// An attribute bag does not fit the shape its field type expects
    #[error("invalid attributes for '{type_tag}': {message}")]
    InvalidAttributes { type_tag: String, message: String },

    /// A properties editor was asked to set a key its field type does not have
    #[error("field type '{type_tag}' has no attribute '{key}'")]
    UnknownAttribute { type_tag: String, key: String },

    /// Rendered output was unwrapped as the wrong mode
    #[error("expected {expected} output, rendered {actual}")]
    WrongRenderMode {
        expected: &'static str,
        actual: &'static str,
    },

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldsError {
    /// True for errors caused by an instance whose type tag the registry does not know.
    pub fn is_unknown_field_type(&self) -> bool {
        matches!(self, FieldsError::UnknownFieldType { .. })
    }

    /// True when a mutation targeted an instance the host no longer holds.
    pub fn is_instance_not_found(&self) -> bool {
        matches!(self, FieldsError::InstanceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::UnknownFieldType {
            type_tag: "NoSuchType".into(),
        };
        assert_eq!(err.to_string(), "unknown field type: NoSuchType");
        assert!(err.is_unknown_field_type());
    }

    #[test]
    fn test_incomplete_descriptor_lists_missing_parts() {
        let err = FieldsError::IncompleteDescriptor {
            type_tag: "TextField".into(),
            missing: vec!["form", "validator"],
        };
        assert!(err.to_string().contains("TextField"));
        assert!(err.to_string().contains("form, validator"));
    }

    #[test]
    fn test_instance_not_found() {
        let err = FieldsError::InstanceNotFound { id: "f1".into() };
        assert!(err.is_instance_not_found());
        assert!(!err.is_unknown_field_type());
    }
}

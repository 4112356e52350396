//! Typed configuration sections.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsmithConfig {
    pub upload: UploadConfig,
    pub store: StoreConfig,
}

impl FormsmithConfig {
    /// Reject values no component can work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.upload.public_prefix.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "upload.public_prefix",
                "must not be empty",
            ));
        }
        if self.upload.max_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "upload.max_bytes",
                "must be greater than zero",
            ));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(ConfigError::invalid_value(
                "upload.allowed_types",
                "at least one content type is required",
            ));
        }
        if let Some(bad) = self
            .upload
            .allowed_types
            .iter()
            .find(|t| !t.contains('/'))
        {
            return Err(ConfigError::invalid_value(
                "upload.allowed_types",
                format!("'{bad}' is not a content type"),
            ));
        }
        Ok(())
    }
}

/// Where uploaded media is written and how it is addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub public_prefix: String,
    pub max_bytes: u64,
    /// Exact types (`image/png`) or families (`image/*`).
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
            max_bytes: 10 * 1024 * 1024,
            allowed_types: vec!["image/*".to_string()],
        }
    }
}

/// Where form definitions and submissions are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".formsmith"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        FormsmithConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validation_names_the_key() {
        let mut config = FormsmithConfig::default();
        config.upload.max_bytes = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "upload.max_bytes"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        let mut config = FormsmithConfig::default();
        config.upload.allowed_types = vec!["png".into()];
        assert!(config.validate().is_err());
    }
}

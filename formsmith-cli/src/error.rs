//! Error handling for the Formsmith CLI
//!
//! Library errors are wrapped in a `CliError` carrying the exit code the
//! process should end with; the source chain is kept for the log.

use std::error::Error;
use std::fmt;

use crate::exit_codes::EXIT_ERROR;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Wrap a library error as a hard failure.
    pub fn wrap<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            exit_code: EXIT_ERROR,
            source: Some(Box::new(error)),
        }
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source.as_deref().and_then(|e| e.source());
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {err}"));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<formsmith_designer::DesignerError> for CliError {
    fn from(error: formsmith_designer::DesignerError) -> Self {
        Self::wrap(error)
    }
}

impl From<formsmith_fields::FieldsError> for CliError {
    fn from(error: formsmith_fields::FieldsError) -> Self {
        Self::wrap(error)
    }
}

impl From<formsmith_upload::UploadError> for CliError {
    fn from(error: formsmith_upload::UploadError) -> Self {
        Self::wrap(error)
    }
}

impl From<formsmith_config::ConfigError> for CliError {
    fn from(error: formsmith_config::ConfigError) -> Self {
        Self::wrap(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::wrap(error)
    }
}

impl From<serde_yaml_ng::Error> for CliError {
    fn from(error: serde_yaml_ng::Error) -> Self {
        Self::wrap(error)
    }
}

impl From<csv::Error> for CliError {
    fn from(error: csv::Error) -> Self {
        Self::wrap(error)
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::wrap(error)
    }
}

/// Convert a CliResult to an exit code, logging the full error chain if needed
pub fn handle_cli_result(result: CliResult<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e.full_chain());
            eprintln!("Error: {e}");
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_SUCCESS;

    #[test]
    fn test_wrapped_errors_fail_hard() {
        let err = CliError::from(formsmith_upload::UploadError::NoFile);
        assert_eq!(err.exit_code, EXIT_ERROR);
        assert_eq!(err.to_string(), "no file received");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_handle_result_passes_codes_through() {
        assert_eq!(handle_cli_result(Ok(EXIT_SUCCESS)), EXIT_SUCCESS);
        assert_eq!(handle_cli_result(Ok(1)), 1);
        assert_eq!(
            handle_cli_result(Err(CliError::new("boom", EXIT_ERROR))),
            EXIT_ERROR
        );
    }
}

use std::path::PathBuf;

use compact_str::{CompactString, ToCompactString};
use thiserror::Error;

use crate::client::{ClientError, ErrorKind};

pub type Result<T> = std::result::Result<T, AppError>;

/// Application-level error, cloneable so it can travel on [`crate::event::AppEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("GitHub API key is not defined. Set GITHUB_TOKEN in your environment.")]
    MissingGithubToken,

    #[error("{0}")]
    NotFound(CompactString),

    #[error("{0}")]
    RequestFailed(CompactString),

    #[error("{0}")]
    Transport(CompactString),

    #[error("{0}")]
    InvalidInput(CompactString),

    #[error("Failed to load configuration from: {path}")]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Failed to save configuration to: {path}")]
    ConfigSaveError { path: PathBuf, message: String },

    #[error("Invalid configuration: {field}")]
    ConfigValidationError { field: String, message: String },

    #[error("{0}")]
    GeneralError(CompactString),
}

impl From<&ClientError> for AppError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::MissingToken => AppError::MissingGithubToken,
            ClientError::ConfigValidation { field, message } => {
                AppError::config_validation_error(field, message)
            },
            _ => match err.kind() {
                ErrorKind::NotFound => AppError::NotFound(err.to_compact_string()),
                ErrorKind::RequestFailed => AppError::RequestFailed(err.to_compact_string()),
                ErrorKind::Transport => AppError::Transport(err.to_compact_string()),
                ErrorKind::InvalidArgument | ErrorKind::ResultWindowExceeded => {
                    AppError::InvalidInput(err.to_compact_string())
                },
                ErrorKind::Configuration | ErrorKind::Decode => {
                    AppError::GeneralError(err.to_compact_string())
                },
            },
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::from(&err)
    }
}

impl AppError {
    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    /// Create a configuration save error
    pub fn config_save_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigSaveError { path, message: source.to_string() }
    }

    /// Create a configuration validation error
    pub fn config_validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidationError { field: field.into(), message: message.into() }
    }

    /// Message suitable for showing to the user as-is
    pub fn display_message(&self) -> String {
        match self {
            AppError::ConfigLoadError { message, .. }
            | AppError::ConfigSaveError { message, .. } => format!("{self}: {message}"),
            AppError::ConfigValidationError { field, message } => {
                format!("Invalid {field}: {message}")
            },
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Operation;

    #[test]
    fn not_found_keeps_exact_message() {
        let err = AppError::from(ClientError::from_status(Operation::GetUser, 404));
        assert_eq!(err, AppError::NotFound("User not found".into()));
        assert_eq!(err.display_message(), "User not found");
    }

    #[test]
    fn request_failure_uses_operation_message() {
        let err = AppError::from(ClientError::from_status(Operation::SearchRepos, 422));
        assert_eq!(err.display_message(), "Failed to find search queries");
    }

    #[test]
    fn transport_message_passes_through() {
        let err = AppError::from(ClientError::Transport("connection refused".into()));
        assert_eq!(err.display_message(), "connection refused");
    }

    #[test]
    fn missing_token_maps_to_dedicated_variant() {
        assert_eq!(AppError::from(ClientError::MissingToken), AppError::MissingGithubToken);
    }
}

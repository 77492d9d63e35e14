//! Error types for the GitHub client

use std::fmt;

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Message reported when a user lookup answers 404
pub const USER_NOT_FOUND: &str = "User not found";

/// Number of search results GitHub is willing to page through
pub const SEARCH_RESULT_WINDOW: u32 = 1000;

/// The logical operations the client performs, one HTTP request each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetUser,
    ListUserRepos,
    SearchRepos,
    GetRepo,
}

impl Operation {
    /// Fixed message surfaced when the provider answers with a non-success status
    pub const fn failure_message(self) -> &'static str {
        match self {
            Operation::GetUser => "Failed to fetch user profile",
            Operation::ListUserRepos => "Failed to fetch repositories",
            Operation::SearchRepos => "Failed to find search queries",
            Operation::GetRepo => "Failed to fetch repository details",
        }
    }

    /// Whether a 404 from this operation means the looked-up user is missing
    pub const fn is_user_lookup(self) -> bool {
        matches!(self, Operation::GetUser)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::GetUser => "get_user",
            Operation::ListUserRepos => "list_user_repos",
            Operation::SearchRepos => "search_repos",
            Operation::GetRepo => "get_repo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidArgument,
    ResultWindowExceeded,
    NotFound,
    RequestFailed,
    Transport,
    Decode,
}

/// Errors produced by the GitHub client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token configured; raised before any request is built
    #[error("GitHub token is not configured. Set GITHUB_TOKEN in the environment.")]
    MissingToken,

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid argument {argument}: {message}")]
    InvalidArgument { argument: &'static str, message: String },

    #[error(
        "Page {page} with {per_page} results per page is beyond the first {window} search results",
        window = SEARCH_RESULT_WINDOW
    )]
    ResultWindowExceeded { page: u32, per_page: u32 },

    #[error("{message}")]
    NotFound { message: CompactString },

    #[error("{}", .operation.failure_message())]
    RequestFailed { operation: Operation },

    /// The request never produced a response; carries the transport's own message
    #[error("{0}")]
    Transport(String),

    #[error("JSON parse error from {endpoint}: {message}")]
    Decode {
        endpoint: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::MissingToken | ClientError::ConfigValidation { .. } => {
                ErrorKind::Configuration
            },
            ClientError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ClientError::ResultWindowExceeded { .. } => ErrorKind::ResultWindowExceeded,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::RequestFailed { .. } => ErrorKind::RequestFailed,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Operation the error is attributable to, when the error records one
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ClientError::RequestFailed { operation } => Some(*operation),
            ClientError::NotFound { .. } => Some(Operation::GetUser),
            _ => None,
        }
    }

    /// Classify a non-success HTTP status for the given operation
    pub fn from_status(operation: Operation, status: u16) -> Self {
        if status == 404 && operation.is_user_lookup() {
            Self::not_found(USER_NOT_FOUND)
        } else {
            Self::RequestFailed { operation }
        }
    }

    pub fn not_found(message: impl Into<CompactString>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument { argument, message: message.into() }
    }

    pub fn json_parse(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Decode { endpoint: endpoint.into(), message: message.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_lookup_404_is_not_found() {
        let err = ClientError::from_status(Operation::GetUser, 404);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn other_404s_are_request_failures() {
        for (operation, message) in [
            (Operation::ListUserRepos, "Failed to fetch repositories"),
            (Operation::SearchRepos, "Failed to find search queries"),
            (Operation::GetRepo, "Failed to fetch repository details"),
        ] {
            let err = ClientError::from_status(operation, 404);
            assert_eq!(err.kind(), ErrorKind::RequestFailed);
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn request_failure_hides_status() {
        let err = ClientError::from_status(Operation::GetUser, 503);
        assert_eq!(err.to_string(), "Failed to fetch user profile");
        assert!(!err.to_string().contains("503"));
    }

    #[test]
    fn failures_name_their_operation() {
        let err = ClientError::from_status(Operation::ListUserRepos, 500);
        assert_eq!(err.operation(), Some(Operation::ListUserRepos));
        let err = ClientError::from_status(Operation::GetUser, 404);
        assert_eq!(err.operation(), Some(Operation::GetUser));
        assert_eq!(ClientError::Transport("connection refused".into()).operation(), None);
    }

    #[test]
    fn missing_token_is_configuration() {
        assert_eq!(ClientError::MissingToken.kind(), ErrorKind::Configuration);
    }
}

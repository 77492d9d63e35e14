//! GitHub client modules
//!
//! The API access layer: request construction, authentication headers,
//! error classification and response typing, plus the service that runs
//! requests in the background for a view.

pub mod api;
pub mod config;
pub mod error;
pub mod sequencer;
pub mod service;

// Re-export main types for convenience
pub use api::GithubApi;
pub use config::{ClientConfig, RepoListQuery, SearchQuery, SearchSort, SortOrder};
pub use error::{ClientError, ErrorKind, Operation, Result};
pub use sequencer::{RequestSequencer, Ticket};
pub use service::GithubService;

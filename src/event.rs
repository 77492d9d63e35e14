use crate::{
    client::{Operation, SearchQuery, Ticket},
    domain::{Repository, SearchResult, UserOverview},
    id::RepoSlug,
    result::AppError,
};

/// Results delivered from background requests to whoever renders them
#[derive(Debug, Clone)]
pub enum AppEvent {
    ProfileLoaded {
        ticket: Ticket,
        overview: Box<UserOverview>,
    },
    SearchLoaded {
        ticket: Ticket,
        query: SearchQuery,
        result: SearchResult<Repository>,
    },
    RepositoryLoaded {
        ticket: Ticket,
        slug: RepoSlug,
        repository: Box<Repository>,
    },
    RequestFailed {
        ticket: Ticket,
        operation: Operation,
        error: AppError,
    },
}

impl AppEvent {
    /// Get the variant name as a string slice (without "AppEvent::" prefix)
    pub fn variant_name(&self) -> &'static str {
        match self {
            AppEvent::ProfileLoaded { .. } => "ProfileLoaded",
            AppEvent::SearchLoaded { .. } => "SearchLoaded",
            AppEvent::RepositoryLoaded { .. } => "RepositoryLoaded",
            AppEvent::RequestFailed { .. } => "RequestFailed",
        }
    }

    /// Ticket of the request this event answers
    pub fn ticket(&self) -> Ticket {
        match self {
            AppEvent::ProfileLoaded { ticket, .. }
            | AppEvent::SearchLoaded { ticket, .. }
            | AppEvent::RepositoryLoaded { ticket, .. }
            | AppEvent::RequestFailed { ticket, .. } => *ticket,
        }
    }
}

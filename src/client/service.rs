//! High-level GitHub service operations

use std::{
    future::Future,
    sync::{Arc, mpsc::Sender},
};

use compact_str::CompactString;
use tokio::runtime::Handle;
use tracing::{debug, info, instrument, warn};

use super::{
    api::GithubApi,
    config::{RepoListQuery, SearchQuery},
    error::{ClientError, Operation, Result},
    sequencer::{RequestSequencer, Ticket},
};
use crate::{domain::UserOverview, event::AppEvent, id::RepoSlug, result::AppError};

/// High-level service for GitHub operations
///
/// Combines API calls the way a view needs them and runs background requests
/// whose results are dispatched as [`AppEvent`]s. Each kind of background
/// request has its own [`RequestSequencer`]: issuing a new one aborts the
/// previous one and only the latest result is ever dispatched.
#[derive(Debug)]
pub struct GithubService {
    api: Arc<GithubApi>,
    sender: Sender<AppEvent>,
    handle: Handle,
    profiles: Arc<RequestSequencer>,
    searches: Arc<RequestSequencer>,
    details: Arc<RequestSequencer>,
}

impl GithubService {
    /// Create service from existing API client
    pub fn from_api(api: Arc<GithubApi>, sender: Sender<AppEvent>) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| {
            ClientError::config_validation(
                "runtime",
                "GithubService must be created within a Tokio runtime context",
            )
        })?;

        Ok(Self {
            api,
            sender,
            handle,
            profiles: Arc::new(RequestSequencer::new()),
            searches: Arc::new(RequestSequencer::new()),
            details: Arc::new(RequestSequencer::new()),
        })
    }

    /// Get reference to the underlying API client
    pub fn api(&self) -> &GithubApi {
        &self.api
    }

    /// Fetch a profile and one page of its repositories in parallel
    ///
    /// Both requests must succeed; the first failure is returned and the
    /// other outcome is dropped.
    #[instrument(skip(self), fields(page = query.page, per_page = query.per_page))]
    pub async fn fetch_profile(
        &self,
        username: &str,
        query: &RepoListQuery,
    ) -> Result<UserOverview> {
        fetch_overview(&self.api, username, query).await
    }

    /// Fetch a profile with its repositories in the background
    ///
    /// A failure event names whichever of the two requests failed; transport
    /// and decode failures are reported against the profile lookup.
    pub fn spawn_fetch_profile(
        &self,
        username: impl Into<CompactString>,
        query: RepoListQuery,
    ) -> Ticket {
        let api = Arc::clone(&self.api);
        let username = username.into();
        info!(username = %username, page = query.page, "Fetching profile from GitHub");

        self.spawn_latest(
            &self.profiles,
            Operation::GetUser,
            async move { fetch_overview(&api, &username, &query).await },
            |ticket, overview| AppEvent::ProfileLoaded { ticket, overview: Box::new(overview) },
        )
    }

    /// Search repositories in the background, superseding any search in flight
    pub fn spawn_search(&self, query: SearchQuery) -> Ticket {
        let api = Arc::clone(&self.api);
        info!(q = %query.query, page = query.page, "Searching repositories on GitHub");

        self.spawn_latest(
            &self.searches,
            Operation::SearchRepos,
            {
                let query = query.clone();
                async move { api.search_repos(&query).await }
            },
            move |ticket, result| AppEvent::SearchLoaded { ticket, query, result },
        )
    }

    /// Fetch repository details in the background
    pub fn spawn_fetch_repo(&self, slug: RepoSlug) -> Ticket {
        let api = Arc::clone(&self.api);
        info!(repo = %slug, "Fetching repository details from GitHub");

        self.spawn_latest(
            &self.details,
            Operation::GetRepo,
            {
                let slug = slug.clone();
                async move { api.get_repo(slug.owner(), slug.name()).await }
            },
            move |ticket, repository| AppEvent::RepositoryLoaded {
                ticket,
                slug,
                repository: Box::new(repository),
            },
        )
    }

    /// Abandon the profile request in flight, if any
    pub fn cancel_profile(&self) {
        self.profiles.cancel();
    }

    /// Abandon the search in flight, if any
    pub fn cancel_search(&self) {
        self.searches.cancel();
    }

    /// Abandon the repository detail request in flight, if any
    pub fn cancel_repo(&self) {
        self.details.cancel();
    }

    /// Spawn `request`, dispatching its outcome only while its ticket is current
    fn spawn_latest<T, Fut, F>(
        &self,
        sequencer: &Arc<RequestSequencer>,
        operation: Operation,
        request: Fut,
        on_success: F,
    ) -> Ticket
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        F: FnOnce(Ticket, T) -> AppEvent + Send + 'static,
    {
        let ticket = sequencer.issue();
        let current = Arc::clone(sequencer);
        let sender = self.sender.clone();

        let task = self.handle.spawn(async move {
            let (event, failure) = match request.await {
                Ok(value) => (on_success(ticket, value), None),
                Err(e) => {
                    let operation = e.operation().unwrap_or(operation);
                    let event =
                        AppEvent::RequestFailed { ticket, operation, error: AppError::from(&e) };
                    (event, Some((operation, e)))
                },
            };

            if !current.dispatch_if_current(ticket, event, &sender) {
                debug!(%ticket, %operation, "Discarding stale response");
                return;
            }

            match failure {
                Some((operation, e)) => warn!(%ticket, %operation, error = %e, "Request failed"),
                None => debug!(%ticket, %operation, "Request completed"),
            }
        });

        sequencer.track(ticket, task.abort_handle());
        ticket
    }
}

async fn fetch_overview(
    api: &GithubApi,
    username: &str,
    query: &RepoListQuery,
) -> Result<UserOverview> {
    let (profile, repositories) =
        tokio::try_join!(api.get_user(username), api.list_user_repos(username, query))?;

    debug!(
        login = %profile.login,
        repo_count = repositories.len(),
        "Successfully fetched profile"
    );
    Ok(UserOverview { profile, repositories })
}

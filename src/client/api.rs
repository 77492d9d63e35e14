//! Core HTTP client for GitHub API

use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{
    config::{ClientConfig, MAX_PER_PAGE, RepoListQuery, SearchQuery},
    error::{ClientError, Operation, Result, SEARCH_RESULT_WINDOW},
};
use crate::domain::{Repository, SearchResult, UserProfile};

/// Media type pinned on every request
pub const ACCEPT: &str = "application/vnd.github+json";

pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// REST API version pinned on every request
pub const API_VERSION: &str = "2022-11-28";

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Stateless HTTP client for the GitHub REST API
///
/// Every operation maps to exactly one GET request. Nothing is cached or
/// mutated between calls, so a single instance can be shared behind an `Arc`
/// and driven from several tasks at once.
#[derive(Debug, Clone)]
pub struct GithubApi {
    client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl GithubApi {
    /// Create a client; the token is checked per operation, not here
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_http_client(config, client)
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(config: ClientConfig, client: Client) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL cannot carry path segments",
            ));
        }

        Ok(Self { client, base_url, config })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Fetch a user profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, username: &str) -> Result<UserProfile> {
        let token = self.config.token()?;
        let url = self.user_url(username)?;
        self.get_json(Operation::GetUser, url, token).await
    }

    /// List a user's repositories, most recently updated first
    #[instrument(skip(self), fields(page = query.page, per_page = query.per_page))]
    pub async fn list_user_repos(
        &self,
        username: &str,
        query: &RepoListQuery,
    ) -> Result<Vec<Repository>> {
        let token = self.config.token()?;
        let url = self.user_repos_url(username, query)?;
        let repos: Vec<Repository> = self.get_json(Operation::ListUserRepos, url, token).await?;
        debug!(repo_count = repos.len(), "Successfully fetched repositories");
        Ok(repos)
    }

    /// Search repositories
    #[instrument(
        skip(self),
        fields(
            q = %query.query,
            page = query.page,
            per_page = query.per_page,
            sort = %query.sort,
            order = %query.order
        )
    )]
    pub async fn search_repos(&self, query: &SearchQuery) -> Result<SearchResult<Repository>> {
        let token = self.config.token()?;
        let url = self.search_url(query)?;
        let result: SearchResult<Repository> =
            self.get_json(Operation::SearchRepos, url, token).await?;
        debug!(
            total_count = result.total_count,
            item_count = result.items.len(),
            incomplete = result.incomplete,
            "Successfully searched repositories"
        );
        Ok(result)
    }

    /// Fetch a single repository
    #[instrument(skip(self))]
    pub async fn get_repo(&self, owner: &str, name: &str) -> Result<Repository> {
        let token = self.config.token()?;
        let url = self.repo_url(owner, name)?;
        self.get_json(Operation::GetRepo, url, token).await
    }

    /// URL for `GET /users/{username}`
    pub fn user_url(&self, username: &str) -> Result<Url> {
        require_non_empty("username", username)?;
        self.endpoint(&["users", username])
    }

    /// URL for `GET /users/{username}/repos`
    pub fn user_repos_url(&self, username: &str, query: &RepoListQuery) -> Result<Url> {
        require_non_empty("username", username)?;
        check_paging(query.page, query.per_page)?;

        let mut url = self.endpoint(&["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("per_page", &query.per_page.to_string())
            .append_pair("sort", "updated");
        Ok(url)
    }

    /// URL for `GET /search/repositories`
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url> {
        require_non_empty("query", &query.query)?;
        check_paging(query.page, query.per_page)?;
        check_result_window(query.page, query.per_page)?;

        let mut url = self.endpoint(&["search", "repositories"])?;
        url.query_pairs_mut()
            .append_pair("q", &query.query)
            .append_pair("page", &query.page.to_string())
            .append_pair("per_page", &query.per_page.to_string())
            .append_pair("sort", query.sort.as_str())
            .append_pair("order", query.order.as_str());
        Ok(url)
    }

    /// URL for `GET /repos/{owner}/{name}`
    pub fn repo_url(&self, owner: &str, name: &str) -> Result<Url> {
        require_non_empty("owner", owner)?;
        require_non_empty("name", name)?;
        self.endpoint(&["repos", owner, name])
    }

    /// Append path segments to the base URL, keeping any path prefix it has
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::config_validation("base_url", "Base URL cannot carry path segments")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform authenticated GET request and deserialize JSON response
    async fn get_json<T>(&self, operation: Operation, url: Url, token: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%operation, url = %url, "Sending request");
        let response = self.authenticated_request(url, token).send().await?;
        self.handle_response(operation, response).await
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, url: Url, token: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, ACCEPT)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, operation: Operation, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(
                %operation,
                status = status.as_u16(),
                path = %url_path,
                body = %body,
                "Request failed"
            );
            return Err(ClientError::from_status(operation, status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(%operation, path = %url_path, error = %e, "Failed to parse response");
            ClientError::json_parse(url_path, "Failed to parse response", e)
        })
    }
}

/// Reject blank arguments; the value itself is sent as given
fn require_non_empty(argument: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid_argument(argument, "must not be empty"));
    }
    Ok(())
}

fn check_paging(page: u32, per_page: u32) -> Result<()> {
    if page == 0 {
        return Err(ClientError::invalid_argument("page", "pages start at 1"));
    }
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ClientError::invalid_argument(
            "per_page",
            format!("must be between 1 and {MAX_PER_PAGE}"),
        ));
    }
    Ok(())
}

/// Reject pages that start past the provider's search window
fn check_result_window(page: u32, per_page: u32) -> Result<()> {
    let first_index = u64::from(page - 1) * u64::from(per_page);
    if first_index >= u64::from(SEARCH_RESULT_WINDOW) {
        return Err(ClientError::ResultWindowExceeded { page, per_page });
    }
    Ok(())
}

//! Configuration management for the GitHub client

use std::{fmt, str::FromStr};

use compact_str::CompactString;

use super::error::{ClientError, Result};
use crate::config::AppConfig;

/// Default GitHub REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "GITHUB_API_URL";

pub const DEFAULT_PER_PAGE: u32 = 30;

/// GitHub caps `per_page` at 100 on every listing endpoint
pub const MAX_PER_PAGE: u32 = 100;

/// Main configuration for the GitHub client
#[derive(Clone)]
pub struct ClientConfig {
    /// GitHub API base URL
    pub base_url: CompactString,
    /// Bearer token; every operation fails fast while this is absent
    pub token: Option<CompactString>,
    /// Request configuration
    pub request: RequestConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Number of items per page when a query does not say otherwise
    pub per_page: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { per_page: DEFAULT_PER_PAGE }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request", &self.request)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            token: None,
            request: RequestConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            token: Some(token.into()),
            request: RequestConfig::default(),
        }
    }

    /// Read the token and base URL override from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay_lookup(lookup)
    }

    /// Apply token and base URL from a variable lookup on top of this configuration
    pub fn overlay_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().into();
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.token = Some(token.trim().into());
        }
        self
    }

    /// Whether a usable token is present
    pub fn has_token(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// The configured token, or [`ClientError::MissingToken`]
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingToken)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_base_url()?;
        self.token()?;

        if self.request.per_page == 0 || self.request.per_page > MAX_PER_PAGE {
            return Err(ClientError::config_validation(
                "per_page",
                format!("per_page must be between 1 and {MAX_PER_PAGE}"),
            ));
        }

        Ok(())
    }

    /// Parse the base URL, checking it is an absolute http(s) URL
    pub fn parsed_base_url(&self) -> Result<url::Url> {
        self.validate_base_url()?;
        url::Url::parse(&self.base_url).map_err(|e| {
            ClientError::config_validation("base_url", format!("Base URL is not valid: {e}"))
        })
    }

    fn validate_base_url(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL cannot be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(ClientError::config_validation(
                "base_url",
                "Base URL is not a valid URL format",
            ));
        }

        Ok(())
    }

    /// Default repository listing query using the configured page size
    pub fn default_repo_list_query(&self) -> RepoListQuery {
        RepoListQuery::default().with_per_page(self.request.per_page)
    }

    /// Default search query for `query` using the configured page size
    pub fn default_search_query(&self, query: impl Into<CompactString>) -> SearchQuery {
        SearchQuery::new(query).with_per_page(self.request.per_page)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<CompactString>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set or clear the token
    pub fn with_token(mut self, token: Option<CompactString>) -> Self {
        self.token = token;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }
}

impl From<AppConfig> for ClientConfig {
    fn from(config: AppConfig) -> Self {
        Self::default()
            .with_base_url(config.base_url)
            .with_request(RequestConfig { per_page: config.per_page })
    }
}

/// Query parameters for listing a user's repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoListQuery {
    /// 1-based page number
    pub page: u32,
    /// Number of results per page
    pub per_page: u32,
}

impl Default for RepoListQuery {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

impl RepoListQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set per page limit
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Field the search endpoint sorts by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    #[default]
    Stars,
    Forks,
    Updates,
    HelpWantedIssues,
}

impl SearchSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchSort::Stars => "stars",
            SearchSort::Forks => "forks",
            SearchSort::Updates => "updates",
            SearchSort::HelpWantedIssues => "help-wanted-issues",
        }
    }
}

impl FromStr for SearchSort {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stars" => Ok(SearchSort::Stars),
            "forks" => Ok(SearchSort::Forks),
            "updates" => Ok(SearchSort::Updates),
            "help-wanted-issues" => Ok(SearchSort::HelpWantedIssues),
            other => Err(ClientError::invalid_argument(
                "sort",
                format!("'{other}' is not one of stars, forks, updates, help-wanted-issues"),
            )),
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ClientError::invalid_argument(
                "order",
                format!("'{other}' is not one of asc, desc"),
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for searching repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw GitHub search expression, sent as one opaque parameter
    pub query: CompactString,
    pub page: u32,
    pub per_page: u32,
    pub sort: SearchSort,
    pub order: SortOrder,
}

impl SearchQuery {
    pub fn new(query: impl Into<CompactString>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: SearchSort::default(),
            order: SortOrder::default(),
        }
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set per page limit
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::client::ErrorKind;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_public_api_without_token() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.has_token());
        assert_eq!(config.token().unwrap_err().kind(), ErrorKind::Configuration);
        assert!(matches!(config.validate(), Err(ClientError::MissingToken)));
    }

    #[test]
    fn reads_token_and_base_url_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            (TOKEN_ENV, "ghp_abc"),
            (BASE_URL_ENV, "https://ghe.example.com/api/v3"),
        ]));
        assert_eq!(config.token().unwrap(), "ghp_abc");
        assert_eq!(config.base_url, "https://ghe.example.com/api/v3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let config = ClientConfig::from_lookup(lookup(&[(TOKEN_ENV, "   ")]));
        assert!(!config.has_token());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig::new("ftp://example.com", "token");
        assert!(matches!(
            config.validate(),
            Err(ClientError::ConfigValidation { ref field, .. }) if field == "base_url"
        ));
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = ClientConfig::new(DEFAULT_BASE_URL, "ghp_secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn search_query_defaults() {
        let query = SearchQuery::new("react");
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 30);
        assert_eq!(query.sort, SearchSort::Stars);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn sort_and_order_parse() {
        assert_eq!(
            "help-wanted-issues".parse::<SearchSort>().unwrap(),
            SearchSort::HelpWantedIssues
        );
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("popularity".parse::<SearchSort>().is_err());
        assert!("up".parse::<SortOrder>().is_err());
    }
}

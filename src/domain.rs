use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Deserialize;

/// A GitHub user profile as returned by `GET /users/{username}`
///
/// Only `login` and `id` are guaranteed; everything else falls back to an
/// empty or zero value when the provider omits it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub login: CompactString,
    pub id: u64,
    #[serde(default)]
    pub avatar_url: CompactString,
    #[serde(default)]
    pub name: Option<CompactString>,
    #[serde(default)]
    pub bio: Option<CompactString>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub company: Option<CompactString>,
    #[serde(default)]
    pub location: Option<CompactString>,
    #[serde(default)]
    pub blog: Option<CompactString>,
    #[serde(rename = "html_url", default)]
    pub profile_url: CompactString,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RepositoryOwner {
    pub login: CompactString,
    #[serde(default)]
    pub avatar_url: CompactString,
}

/// A repository as returned by the user repos, search and repo detail endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: CompactString,
    #[serde(default)]
    pub full_name: Option<CompactString>,
    #[serde(rename = "html_url", default)]
    pub url: CompactString,
    #[serde(default)]
    pub description: Option<CompactString>,
    #[serde(rename = "stargazers_count", default)]
    pub stargazer_count: u32,
    #[serde(rename = "forks_count", default)]
    pub fork_count: u32,
    #[serde(rename = "language", default)]
    pub primary_language: Option<CompactString>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    #[serde(default)]
    pub owner: RepositoryOwner,
}

impl Repository {
    /// `owner/name` when the provider sent it, the bare name otherwise
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|full_name| !full_name.is_empty())
            .unwrap_or(self.name.as_str())
    }
}

/// One page of a search, with the provider's total match count
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult<T> {
    /// Matches reported by the provider; usually larger than `items.len()`
    pub total_count: u64,
    #[serde(rename = "incomplete_results", default)]
    pub incomplete: bool,
    pub items: Vec<T>,
}

impl<T> SearchResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A profile together with one page of that user's repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOverview {
    pub profile: UserProfile,
    pub repositories: Vec<Repository>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_profile_requires_only_login_and_id() {
        let user: UserProfile =
            serde_json::from_value(json!({ "login": "octocat", "id": 1 })).unwrap();

        assert_eq!(user.login, "octocat");
        assert_eq!(user.id, 1);
        assert_eq!(user.name, None);
        assert_eq!(user.followers, 0);
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn user_profile_maps_wire_names() {
        let user: UserProfile = serde_json::from_value(json!({
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat",
            "name": "The Octocat",
            "bio": null,
            "public_repos": 8,
            "public_gists": 8,
            "followers": 17000,
            "following": 9,
            "company": "@github",
            "location": "San Francisco",
            "blog": "https://github.blog",
            "created_at": "2011-01-25T18:44:36Z",
            "type": "User"
        }))
        .unwrap();

        assert_eq!(user.profile_url, "https://github.com/octocat");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert_eq!(user.bio, None);
        assert_eq!(user.followers, 17000);
        assert_eq!(
            user.created_at.map(|d| d.to_rfc3339()),
            Some("2011-01-25T18:44:36+00:00".to_string())
        );
    }

    #[test]
    fn repository_maps_wire_names() {
        let repo: Repository = serde_json::from_value(json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "html_url": "https://github.com/octocat/Hello-World",
            "description": "My first repository on GitHub!",
            "stargazers_count": 80,
            "forks_count": 9,
            "language": "Rust",
            "updated_at": "2011-01-26T19:14:43Z",
            "private": false,
            "owner": { "login": "octocat", "avatar_url": "https://example.test/a.png", "id": 1 }
        }))
        .unwrap();

        assert_eq!(repo.stargazer_count, 80);
        assert_eq!(repo.fork_count, 9);
        assert_eq!(repo.primary_language.as_deref(), Some("Rust"));
        assert!(!repo.is_private);
        assert_eq!(repo.owner.login, "octocat");
        assert_eq!(repo.display_name(), "octocat/Hello-World");
    }

    #[test]
    fn display_name_falls_back_to_name() {
        let repo: Repository =
            serde_json::from_value(json!({ "id": 7, "name": "solo" })).unwrap();

        assert_eq!(repo.display_name(), "solo");
    }

    #[test]
    fn search_total_count_is_independent_of_items() {
        let items: Vec<_> = (0..30)
            .map(|i| json!({ "id": i, "name": format!("repo-{i}") }))
            .collect();
        let result: SearchResult<Repository> = serde_json::from_value(json!({
            "total_count": 5000,
            "incomplete_results": true,
            "items": items
        }))
        .unwrap();

        assert_eq!(result.total_count, 5000);
        assert_eq!(result.items.len(), 30);
        assert!(result.incomplete);
    }
}

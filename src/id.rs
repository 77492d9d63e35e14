use std::{fmt, str::FromStr};

use compact_str::CompactString;

/// `owner/name` pair identifying a repository
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct RepoSlug {
    owner: CompactString,
    name: CompactString,
}

impl RepoSlug {
    pub fn new<O, N>(owner: O, name: N) -> Self
    where
        O: Into<CompactString>,
        N: Into<CompactString>,
    {
        Self { owner: owner.into(), name: name.into() }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRepoSlugError(CompactString);

impl fmt::Display for ParseRepoSlugError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected owner/name, got '{}'", self.0)
    }
}

impl std::error::Error for ParseRepoSlugError {}

impl FromStr for RepoSlug {
    type Err = ParseRepoSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoSlug::new(owner, name))
            },
            _ => Err(ParseRepoSlugError(s.into())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let slug: RepoSlug = "octocat/Hello-World".parse().unwrap();
        assert_eq!(slug.owner(), "octocat");
        assert_eq!(slug.name(), "Hello-World");
        assert_eq!(slug.to_string(), "octocat/Hello-World");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for input in ["octocat", "/repo", "owner/", "a/b/c", ""] {
            assert!(input.parse::<RepoSlug>().is_err(), "{input} should not parse");
        }
    }
}

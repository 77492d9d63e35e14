#![allow(dead_code)]

use octolens::client::{ClientConfig, GithubApi};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test_token";

pub fn api_for(server: &MockServer) -> GithubApi {
    GithubApi::new(ClientConfig::new(server.uri(), TEST_TOKEN)).unwrap()
}

pub fn api_without_token(server: &MockServer) -> GithubApi {
    let config = ClientConfig::new(server.uri(), TEST_TOKEN).with_token(None);
    GithubApi::new(config).unwrap()
}

pub fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4",
        "html_url": format!("https://github.com/{login}"),
        "name": "The Octocat",
        "bio": null,
        "public_repos": 8,
        "public_gists": 8,
        "followers": 17000,
        "following": 9,
        "company": "@github",
        "location": "San Francisco",
        "blog": "https://github.blog",
        "created_at": "2011-01-25T18:44:36Z"
    })
}

pub fn repo_json(id: u64, owner: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "html_url": format!("https://github.com/{owner}/{name}"),
        "description": "My first repository on GitHub!",
        "stargazers_count": 80,
        "forks_count": 9,
        "language": "Rust",
        "updated_at": "2011-01-26T19:14:43Z",
        "private": false,
        "owner": {
            "login": owner,
            "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4"
        }
    })
}

//! Look up GitHub user profiles and search repositories over the GitHub REST API.
//!
//! [`client::GithubApi`] performs the four operations (get user, list user
//! repositories, search repositories, get repository) and classifies failures
//! into [`client::ClientError`]. [`client::GithubService`] runs them in the
//! background for an interactive consumer, discarding superseded results.

pub mod app_init;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod event;
pub mod format;
pub mod id;
pub mod logging;
pub mod result;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use itertools::Itertools;
use octolens::{
    app_init::{AppComponents, StartupOptions, initialize_app},
    client::{RepoListQuery, SearchQuery, SearchSort, SortOrder, Ticket},
    config::{AppConfig, default_config_path, save_config},
    domain::{Repository, SearchResult, UserOverview},
    event::AppEvent,
    format::{format_number, format_optional_date, total_pages},
    id::RepoSlug,
    result::AppError,
};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "octolens", version, about = "Look up GitHub users and search repositories")]
struct Cli {
    /// GitHub API base URL (overrides GITHUB_API_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a user's profile and repositories, most recently updated first
    User {
        username: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Search repositories using GitHub search syntax
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
        /// stars, forks, updates or help-wanted-issues
        #[arg(long, default_value = "stars")]
        sort: SearchSort,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },
    /// Show details of one repository
    Repo {
        /// Repository as owner/name
        repo: RepoSlug,
    },
    /// Show the effective configuration, optionally updating the config file
    Config {
        #[arg(long)]
        per_page: Option<u32>,
        #[arg(long)]
        log_level: Option<String>,
        /// Write the resulting settings to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let app = initialize_app(StartupOptions {
        config_path: config_path.clone(),
        base_url: cli.base_url.as_deref().map(Into::into),
        verbose: cli.verbose,
    })
    .await?;

    match cli.command {
        Command::User { username, page, per_page } => {
            let query = app
                .service
                .api()
                .config()
                .default_repo_list_query()
                .with_page(page);
            let query = match per_page {
                Some(per_page) => query.with_per_page(per_page),
                None => query,
            };
            show_user(&app, &username, &query).await
        },
        Command::Search { query, page, per_page, sort, order } => {
            let query = app
                .service
                .api()
                .config()
                .default_search_query(query)
                .with_page(page)
                .with_sort(sort)
                .with_order(order);
            let query = match per_page {
                Some(per_page) => query.with_per_page(per_page),
                None => query,
            };
            let ticket = app.service.spawn_search(query);
            print_event(wait_for(&app, ticket)?)
        },
        Command::Repo { repo } => {
            let ticket = app.service.spawn_fetch_repo(repo);
            print_event(wait_for(&app, ticket)?)
        },
        Command::Config { per_page, log_level, save } => {
            let mut config = app.config.clone();
            if let Some(base_url) = cli.base_url {
                config.base_url = base_url.into();
            }
            if let Some(per_page) = per_page {
                config.per_page = per_page;
            }
            if let Some(log_level) = log_level {
                config.log_level = Some(log_level.into());
            }
            show_config(&config, &config_path, app.service.api().config().has_token());
            if save {
                save_config(&config_path, &config)?;
                println!("Saved to {}", config_path.display());
            }
            Ok(())
        },
    }
}

async fn show_user(app: &AppComponents, username: &str, query: &RepoListQuery) -> Result<()> {
    let overview = app
        .service
        .fetch_profile(username, query)
        .await
        .map_err(|e| eyre!(AppError::from(&e).display_message()))?;

    print_overview(&overview, query.page);
    Ok(())
}

/// Block until the event answering `ticket` arrives
fn wait_for(app: &AppComponents, ticket: Ticket) -> Result<AppEvent> {
    tokio::task::block_in_place(|| {
        loop {
            let event = app
                .events
                .recv()
                .map_err(|_| eyre!("request task ended without a result"))?;
            if event.ticket() == ticket {
                return Ok(event);
            }
            debug!(event = event.variant_name(), "Ignoring event for another request");
        }
    })
}

fn print_event(event: AppEvent) -> Result<()> {
    match event {
        AppEvent::ProfileLoaded { overview, .. } => print_overview(&overview, 1),
        AppEvent::SearchLoaded { query, result, .. } => print_search(&query, &result),
        AppEvent::RepositoryLoaded { repository, .. } => print_repository(&repository, true),
        AppEvent::RequestFailed { error, .. } => return Err(eyre!(error.display_message())),
    }
    Ok(())
}

fn print_overview(overview: &UserOverview, page: u32) {
    let profile = &overview.profile;

    match &profile.name {
        Some(name) => println!("{name} (@{})", profile.login),
        None => println!("@{}", profile.login),
    }
    if !profile.profile_url.is_empty() {
        println!("{}", profile.profile_url);
    }
    if let Some(bio) = &profile.bio {
        println!("{bio}");
    }
    println!(
        "Repos {} · Gists {} · Followers {} · Following {}",
        format_number(profile.public_repos.into()),
        format_number(profile.public_gists.into()),
        format_number(profile.followers.into()),
        format_number(profile.following.into()),
    );

    let contact = [&profile.company, &profile.location, &profile.blog]
        .into_iter()
        .flatten()
        .filter(|value| !value.is_empty())
        .join(" · ");
    if !contact.is_empty() {
        println!("{contact}");
    }
    println!("Joined {}", format_optional_date(profile.created_at.as_ref()));

    println!();
    if overview.repositories.is_empty() {
        println!("No repositories on page {page}");
        return;
    }
    println!("Repositories (page {page}):");
    for repo in &overview.repositories {
        print_repository(repo, false);
    }
}

fn print_search(query: &SearchQuery, result: &SearchResult<Repository>) {
    let pages = total_pages(result.total_count, query.per_page);
    println!(
        "{} repositories match '{}' (page {} of {}, sorted by {} {})",
        format_number(result.total_count),
        query.query,
        query.page,
        pages.max(1),
        query.sort,
        query.order,
    );
    if result.incomplete {
        println!("GitHub stopped searching early; results may be incomplete");
    }

    println!();
    for repo in &result.items {
        print_repository(repo, true);
    }
}

fn print_repository(repo: &Repository, show_owner: bool) {
    let visibility = if repo.is_private { " [private]" } else { "" };
    let name = if show_owner { repo.display_name() } else { repo.name.as_str() };

    let details = [
        Some(format!("★ {}", format_number(repo.stargazer_count.into()))),
        Some(format!("forks {}", format_number(repo.fork_count.into()))),
        repo.primary_language.as_ref().map(ToString::to_string),
        Some(format!("updated {}", format_optional_date(repo.updated_at.as_ref()))),
    ]
    .into_iter()
    .flatten()
    .join("  ");

    println!("  {name}{visibility}  {details}");
    if let Some(description) = &repo.description {
        println!("      {description}");
    }
    if !repo.url.is_empty() {
        println!("      {}", repo.url);
    }
}

fn show_config(config: &AppConfig, path: &std::path::Path, has_token: bool) {
    println!("config file: {}", path.display());
    println!("base_url:    {}", config.base_url);
    println!("per_page:    {}", config.per_page);
    println!(
        "log_level:   {}",
        config.log_level.as_deref().unwrap_or("(default)")
    );
    println!("token:       {}", if has_token { "set" } else { "missing (set GITHUB_TOKEN)" });
}

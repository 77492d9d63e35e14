use std::{
    path::PathBuf,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
};

use compact_str::CompactString;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    client::{ClientConfig, GithubApi, GithubService},
    config::{AppConfig, load_config},
    event::AppEvent,
    logging::{LoggingConfig, init_logging},
    result::Result,
};

pub struct AppComponents {
    pub config: AppConfig,
    pub service: GithubService,
    pub events: Receiver<AppEvent>,
    pub _log_guard: Option<WorkerGuard>,
}

/// Options coming from the command line that shape start-up
#[derive(Debug, Default, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub base_url: Option<CompactString>,
    pub verbose: u8,
}

pub async fn initialize_app(options: StartupOptions) -> Result<AppComponents> {
    let config = load_config(&options.config_path)?;

    let log_guard = initialize_logging(&config, options.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "octolens starting up");

    let (sender, events) = mpsc::channel();
    let client_config = client_config(&config, options.base_url);
    let service = create_github_service(sender, client_config)?;

    Ok(AppComponents { config, service, events, _log_guard: log_guard })
}

fn initialize_logging(config: &AppConfig, verbose: u8) -> Result<Option<WorkerGuard>> {
    let logging_config = LoggingConfig::from_env()
        .with_level_name(config.log_level.as_deref())
        .with_verbosity(verbose);

    init_logging(logging_config)
}

/// Config file first, then the environment, then an explicit command-line override
fn client_config(config: &AppConfig, base_url: Option<CompactString>) -> ClientConfig {
    let client_config =
        ClientConfig::from(config.clone()).overlay_lookup(|key| std::env::var(key).ok());

    match base_url {
        Some(base_url) => client_config.with_base_url(base_url),
        None => client_config,
    }
}

fn create_github_service(
    sender: Sender<AppEvent>,
    client_config: ClientConfig,
) -> Result<GithubService> {
    let api = Arc::new(GithubApi::new(client_config)?);
    Ok(GithubService::from_api(api, sender)?)
}

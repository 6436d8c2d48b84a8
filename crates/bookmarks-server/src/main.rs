use bookmarks_app::state::AppConfig;
use bookmarks_server::{config::ServerConfig, logging::init_logging, run::run, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;
    init_logging(config.environment, config.log_file.as_deref())?;

    let bookmarks_path = AppConfig::from(&config).bookmarks_path();
    info!(
        "Starting bookmarks server ({:?}), API at {}",
        config.environment,
        config.base_url()?.join(&bookmarks_path)?
    );

    run(config).await
}

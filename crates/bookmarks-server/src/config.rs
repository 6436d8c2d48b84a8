use std::path::PathBuf;

use crate::error::Result;
use bookmarks_app::state::AppConfig;
pub use clap::Parser;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "Bookmarks REST API server")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 8000,
        env = "BOOKMARKS_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "BOOKMARKS_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "BOOKMARKS_DATABASE_URL",
        default_value = "sqlite://bookmarks.db?mode=rwc",
        help = "Database URL e.g. sqlite://file.db"
    )]
    pub database_url: String,

    #[arg(
        long,
        value_enum,
        env = "BOOKMARKS_ENV",
        default_value_t = Environment::Development,
        help = "Runtime environment, production logs only to the log file"
    )]
    pub environment: Environment,

    #[arg(
        long,
        env = "BOOKMARKS_API_PREFIX",
        default_value = "",
        help = "Path prefix for the bookmarks API, e.g. /api"
    )]
    pub api_prefix: String,

    #[arg(
        long,
        env = "BOOKMARKS_LOG_FILE",
        help = "File to append JSON formatted logs to"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        env = "BOOKMARKS_MIGRATE",
        help = "Create bookmarks table on start, if it does not exist"
    )]
    pub migrate: bool,

    #[arg(long, env = "BOOKMARKS_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&format!("http://{}:{}/", self.listen_address, self.port))?;
        Ok(url)
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            api_prefix: config.api_prefix.clone(),
        }
    }
}

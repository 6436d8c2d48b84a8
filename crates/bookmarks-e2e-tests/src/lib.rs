use std::{path::Path, time::Duration};

use anyhow::{Result, anyhow};
use bookmarks_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};
use url::Url;

pub mod rest;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Keeps test database alive and stops the server when dropped.
pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub fn test_config(
    test_name: &str,
    base_dir: &Path,
    extra_args: &[&str],
) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let database_url = format!(
        "sqlite://{}?mode=rwc",
        tmp_data_dir.path().join("bookmarks.db").display()
    );
    let port = random_port()?.to_string();
    let mut args = vec![
        "bookmarks-e2e-tests",
        "--database-url",
        &database_url,
        "--port",
        &port,
        "--environment",
        "test",
        "--migrate",
    ];
    args.extend_from_slice(extra_args);
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
            shutdown: None,
        },
    ))
}

pub async fn prepare_env(test_name: &str, extra_args: &[&str]) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name, &std::env::temp_dir(), extra_args)
}

/// Starts server in background and waits until it answers health check.
pub async fn launch_env(
    args: ServerConfig,
    guard: &mut ConfigGuard,
) -> Result<(reqwest::Client, Url)> {
    let base_url = args.base_url()?;
    let (tx, rx) = oneshot::channel::<()>();
    guard.shutdown = Some(tx);

    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        let res: Result<()> = async {
            let state = bookmarks_server::run::build_state(&args).await?;
            bookmarks_server::run::run_graceful_with_state(args, state, shutdown).await
        }
        .await;
        if let Err(e) = res {
            error!("Server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    let health_url = base_url.join("health")?;
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok((client, base_url)),
            Ok(response) => debug!("Health check status {}", response.status()),
            Err(e) => debug!("Server not ready: {e}"),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    Err(anyhow!("Server did not start"))
}

pub fn extend_url(url: &Url, id: impl std::fmt::Display) -> Url {
    let mut url = url.clone();
    url.path_segments_mut()
        .map(|mut segments| {
            segments.push(&id.to_string());
        })
        .ok();
    url
}

//! Process wide logging.
//!
//! JSON lines go to the log file when one is configured. Outside of
//! production events are also printed to the console in compact form.
//! Filtering follows `RUST_LOG` and defaults to `info`.

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::anyhow;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use crate::{config::Environment, error::Result};

pub fn init_logging(environment: Environment, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = log_file
        .map(|path| -> Result<_> {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)))
        })
        .transpose()?;

    let console_layer =
        (!environment.is_production()).then(|| tracing_subscriber::fmt::layer().compact());

    // production without a log file still needs some output
    let stdout_json_layer = (environment.is_production() && log_file.is_none())
        .then(|| tracing_subscriber::fmt::layer().json());

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .with(stdout_json_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
}

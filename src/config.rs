// Runtime configuration - CLI flags, each overridable by env var

use crate::catalog::{DEFAULT_API_URL, DEFAULT_LIMIT};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

const APP_DIR: &str = "pokedex-favorites";

#[derive(Debug, Clone, Parser)]
#[command(name = "pokedex-favorites", version, about = "Browse a Pokémon catalog and keep favorites")]
pub struct Config {
    /// Catalog index endpoint
    #[arg(long, env = "POKEDEX_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Number of entities fetched from the index
    #[arg(long, env = "POKEDEX_LIMIT", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// SQLite file holding the favorites snapshot
    #[arg(long, env = "POKEDEX_DB")]
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Data directory for the database and log file
    pub fn data_dir(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
            None => default_data_dir(),
        }
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("favorites.db"))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Install the global tracing subscriber
///
/// Filter comes from `POKEDEX_LOG` (default `info`). With `log_file` set,
/// output goes to that file without ANSI colours so a full-screen UI stays
/// intact; otherwise to stderr.
pub fn init_logging(log_file: Option<&std::path::Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("POKEDEX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {:?}", parent))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;

            builder
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

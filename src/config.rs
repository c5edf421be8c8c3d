//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BLOCKWAVE_GRID_SIZE` | 25 | Grid edge length in tiles (1..=64) |
//! | `BLOCKWAVE_SEED` | 1 | Spawner seed |
//! | `BLOCKWAVE_SPAWN_INTERVAL_MS` | 2000 | Time between enemies, 0 disables |
//! | `BLOCKWAVE_LOG_PATH` | unset | Log file; logging is off when unset |
//!
//! Unparseable values fall back to the default.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::WorldConfig;
use crate::types::{ENEMY_SPAWN_INTERVAL_MS, GRID_SIZE};

const MAX_GRID_SIZE: i32 = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let grid_size = lookup("BLOCKWAVE_GRID_SIZE")
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|n| (1..=MAX_GRID_SIZE).contains(n))
            .unwrap_or(GRID_SIZE);

        let seed = lookup("BLOCKWAVE_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        let spawn_interval_ms = lookup("BLOCKWAVE_SPAWN_INTERVAL_MS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(ENEMY_SPAWN_INTERVAL_MS);

        let log_path = lookup("BLOCKWAVE_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            world: WorldConfig {
                grid_size,
                seed,
                spawn_interval_ms,
            },
            log_path,
        }
    }
}

/// Send `log` output to the configured file.
///
/// The terminal is the game screen, so nothing is logged to stdout/stderr.
/// Without a log path this is a no-op. `RUST_LOG` sets the filter (default `info`).
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = config.log_path.as_ref() else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;

    log::info!("logging to {}", path.display());
    Ok(())
}

//! FILENAME: app/src/config.rs
// PURPOSE: Startup configuration: defaults, optional JSON file, CLI overrides.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use market_data::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_SYMBOLS: [&str; 4] = ["SOLUSDT", "BTCUSD", "ETCUSD", "JUPUSD"];
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_LIMIT: u32 = 365;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ============================================================================
// COMMAND LINE
// ============================================================================

#[derive(Parser, Debug, Default)]
#[command(name = "candleview")]
#[command(about = "Fetch crypto klines and explore them as a table", long_about = None)]
pub struct Args {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated symbols (e.g. SOLUSDT,BTCUSD)
    #[arg(short, long, value_delimiter = ',')]
    pub symbols: Option<Vec<String>>,

    /// Kline interval (1m, 1h, 1d, ...)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Candles per symbol
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// REST API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Read commands from a file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Also write log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

// ============================================================================
// APP CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub symbols: Vec<String>,
    pub interval: String,
    pub limit: u32,
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Rows printed by a bare `show`.
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            interval: DEFAULT_INTERVAL.to_string(),
            limit: DEFAULT_LIMIT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            page_size: 20,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Defaults, then the config file, then the environment level, then flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let env_level = std::env::var(crate::logging::LOG_ENV_VAR).ok();
        Self::resolve_with_env(args, env_level)
    }

    pub fn resolve_with_env(args: &Args, env_level: Option<String>) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(level) = env_level.filter(|l| !l.trim().is_empty()) {
            config.log_level = level;
        }
        if let Some(symbols) = &args.symbols {
            config.symbols = symbols
                .iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(interval) = &args.interval {
            config.interval = interval.clone();
        }
        if let Some(limit) = args.limit {
            config.limit = limit;
        }
        if let Some(url) = &args.base_url {
            config.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(path) = &args.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("no symbols configured");
        }
        if self.limit == 0 {
            anyhow::bail!("limit must be at least 1");
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", self.log_level))
    }
}

//! FILENAME: app/src/lib.rs
// PURPOSE: CandleView terminal front end.

pub mod commands;
pub mod config;
pub mod logging;
pub mod session;
pub mod table;

pub use commands::{parse_command, Command, CommandError};
pub use config::{AppConfig, Args};
pub use session::{Flow, Session, SessionError};

use anyhow::Context;
use market_data::{load_dataset, BinanceClient};
use std::fs::File;
use std::io::{self, BufReader};
use std::time::Duration;
use view_engine::ViewEngine;

/// Loads the configured symbols once and runs the command session.
pub fn run(args: Args) -> anyhow::Result<()> {
    let config = AppConfig::resolve(&args)?;
    logging::init(config.level_filter()?, config.log_file.as_deref()).map_err(anyhow::Error::msg)?;
    log_info!(
        "SYS",
        "candleview starting: symbols={:?} interval={} limit={}",
        config.symbols,
        config.interval,
        config.limit
    );

    let client = BinanceClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))
        .context("Failed to create HTTP client")?;
    let (dataset, report) = load_dataset(&client, &config.symbols, &config.interval, config.limit)?;

    eprintln!("{}", report.summary());
    for (symbol, error) in &report.failed {
        log_warn!("SYS", "{} skipped: {}", symbol, error);
    }
    if report.all_failed() {
        eprintln!("no data could be fetched; the table is empty");
    }

    let engine = ViewEngine::new(dataset);
    let stdout = io::stdout();
    let mut session = Session::new(engine, report, stdout.lock()).with_page_size(config.page_size);

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            session.run(BufReader::new(file), false)?;
        }
        None => session.run(io::stdin().lock(), true)?,
    }

    log_info!("SYS", "candleview finished");
    log::logger().flush();
    Ok(())
}

//! FILENAME: app/src/main.rs
// PURPOSE: Terminal entry point. Loads the klines once, then runs the command session.
// FORMAT: seq|level|category|message (log lines, stderr and optional log file)

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = app_lib::Args::parse();
    app_lib::run(args)
}

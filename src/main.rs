mod config;
mod db;
mod export;
mod models;
mod review;
mod run;
mod validate;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    let db = db::Database::open(&config.db_path)?;
    run::as_cli(&args, &db, &config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("organizeplus=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::fs::OpenOptions;

use anyhow::Context;

use scribe_proto::config::{self, Config};

use crate::app::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to a file — stdout belongs to the terminal UI.
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let log_path = data_dir.join("scribe.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    eprintln!("scribe log: {}", log_path.display());
    tracing::info!("scribe starting");

    let config = Config::load().context("loading configuration")?;

    let app = App::new(&config);
    app.run().await
}

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use focusbrowser::app::AppContext;
use focusbrowser::{config, window};

/// Single-window kiosk browser restricted to a whitelist of URL patterns.
#[derive(Parser, Debug)]
#[command(name = "focusbrowser", version, about)]
struct Cli {
    /// URL to load instead of the configured default.
    url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_dir = config::config_dir();
    let settings = config::load_settings(&config_dir).context("could not load settings")?;
    let ctx = AppContext::new(config_dir, settings)?;
    let start_url = ctx.start_url(cli.url);
    window::run(ctx, start_url)
}

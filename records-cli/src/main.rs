mod render;

use std::path::PathBuf;

use clap::Parser;
use records_core::{Config, LoadOutcome};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "records")]
struct Args {
    /// Path to a YAML config file. Without it, RECORDS_* env vars (and .env) are used.
    #[arg(long, env = "RECORDS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of pages to load. 0 loads every page.
    #[arg(long, default_value = "1")]
    pages: usize,

    /// Only show records matching this text.
    #[arg(long)]
    search: Option<String>,

    /// Write the effective config as YAML to this file (or `records.yaml`
    /// inside this directory) and exit.
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn configure_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() {
    configure_logging();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).unwrap_or_else(|e| {
        error!("failed to load config: {e}");
        std::process::exit(1);
    });

    if let Some(target) = &args.write_config {
        let path = if target.is_dir() {
            Config::path_in(target)
        } else {
            target.clone()
        };
        if let Err(e) = config.save_to_yaml(&path) {
            error!("failed to write config to {}: {e}", path.display());
            std::process::exit(1);
        }
        info!("wrote config to {}", path.display());
        return;
    }

    let session = records_core::connect(&config).unwrap_or_else(|e| {
        error!("failed to create HTTP client: {e}");
        std::process::exit(1);
    });

    let mut loaded = 0;
    while args.pages == 0 || loaded < args.pages {
        match session.load_next_page().await {
            Ok(LoadOutcome::Appended(_)) => loaded += 1,
            Ok(LoadOutcome::Exhausted | LoadOutcome::InFlight) => break,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        }
    }
    info!("loaded {} page(s)", loaded);

    if let Some(search) = &args.search {
        session.commit_search(search);
    }

    print!("{}", render::render(&session.snapshot()));
}

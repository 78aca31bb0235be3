//! `equity-profile`: build equity profiles from the command line.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures::{StreamExt, stream};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use equity::{EquityProfile, ProfileBuilder, ProfileConfig, Symbol, TracingProgressSink};

/// Build point-in-time equity profiles from annual filings and quote data.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbols to profile
    #[arg(required = true)]
    symbols: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User agent sent to SEC EDGAR (overrides the configuration file)
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Maximum number of profiles built at once
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Installs the `tracing` subscriber. Reads filters from `RUST_LOG` and
/// defaults to `info`.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(args: &Args) -> Result<ProfileConfig> {
    let mut config = match &args.config {
        Some(path) => ProfileConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProfileConfig::default(),
    };

    if let Some(user_agent) = &args.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn render(profile: &EquityProfile, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(profile)
    } else {
        serde_json::to_string(profile)
    };
    json.context("Failed to serialize profile")
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args = Args::parse();
    let config = load_config(&args)?;

    let builder = ProfileBuilder::from_config(&config)
        .context("Failed to create profile builder")?
        .with_progress_sink(Arc::new(TracingProgressSink));

    info!(
        symbols = args.symbols.len(),
        concurrency = args.concurrency,
        "Building equity profiles"
    );

    let results: Vec<(Symbol, equity::Result<EquityProfile>)> = stream::iter(args.symbols.iter())
        .map(|raw| {
            let builder = &builder;
            let symbol = Symbol::new(raw.as_str());
            async move {
                let result = builder.build(&symbol).await;
                (symbol, result)
            }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;

    let mut failures = 0usize;
    for (symbol, result) in results {
        match result {
            Ok(profile) => println!("{}", render(&profile, args.pretty)?),
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Failed to build profile");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} profiles failed", failures, args.symbols.len());
    }

    Ok(())
}

use clap::Parser;
use realestate_crawler::{query::SearchQuery, run_search, CrawlConfig};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Realestate search results as csv on stdout.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// One of buy, rent or sold
    command: String,

    /// Free text location, e.g. "North Sydney, NSW"
    search: String,

    /// Pages fetched concurrently
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Per request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retries for network errors and 5xx responses
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    let query = match SearchQuery::parse(&args.command, &args.search) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let config = CrawlConfig {
        workers: args.workers,
        timeout: Duration::from_secs(args.timeout),
        retries: args.retries,
        ..CrawlConfig::default()
    };

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    match run_search(&query, &config, std::io::stdout(), shutdown).await {
        Ok(summary) => {
            info!("Wrote {} listings", summary.records);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_broken_pipe() => ExitCode::SUCCESS,
        Err(e) => {
            error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

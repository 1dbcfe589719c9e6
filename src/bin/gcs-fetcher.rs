use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use gcs_fetcher::utils::logging::{self, LogLevel};
use gcs_fetcher::{load_config, load_credentials, GcsFetcher};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL-encoded object name to fetch from the configured bucket
    object: String,
    #[arg(short, long, env = "CONFIG", default_value = "gcs-fetcher.yaml")]
    config: String,
    /// Write the object here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Parse arguments, load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = load_config(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Resolve credentials and build the fetcher
    // -------------------------------

    let credentials = load_credentials(&service_config.credentials).await?;
    let fetcher = GcsFetcher::new(&service_config.fetch, credentials)?;

    // -------------------------------
    // 3. Fetch the object and write it out
    // -------------------------------

    let bytes = fetcher.fetch_file(&args.object).await?;
    info!(
        object = %args.object,
        bucket = %service_config.fetch.bucket_name,
        size = bytes.len(),
        "object fetched"
    );

    match &args.output {
        Some(path) => tokio::fs::write(path, &bytes).await?,
        None => std::io::stdout().write_all(&bytes)?,
    }

    Ok(())
}

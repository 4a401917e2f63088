use std::path::Path;

pub mod config;
pub mod error;
pub mod fetcher;
pub mod probe;
pub mod writer;

pub use config::Config;
pub use error::{Error, Result};

use fetcher::{atlas::AtlasFetcher, ProbeFetcher};
use writer::OutputFormat;

/// Fetches every probe listed at the configured endpoint and writes them to
/// the configured output. Returns the number of probes written.
pub async fn run(config: &Config) -> Result<usize> {
    let fetcher = AtlasFetcher::from_config(config)?;
    fetch_and_write(&fetcher, &config.output, config.format).await
}

/// Nothing is written unless the fetch completes.
pub async fn fetch_and_write<F: ProbeFetcher>(
    fetcher: &F,
    output: &Path,
    format: OutputFormat,
) -> Result<usize> {
    let probes = fetcher.fetch().await?;
    tracing::info!("Fetched details of {} probes", probes.len());

    writer::write_probes(&probes, output, format)?;
    tracing::info!("Wrote {}", output.display());

    Ok(probes.len())
}

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::{
    fetcher::atlas::{API_PROBES, MAX_PAGE_SIZE},
    writer::OutputFormat,
};

/// List all RIPE Atlas probes.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Relative/absolute path of output file.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Representation written to the output file.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,

    /// Probe listing endpoint.
    #[arg(long, env = "ATLAS_API_URL", default_value = API_PROBES)]
    pub api_url: Url,

    /// Probes requested per page.
    #[arg(
        long,
        default_value_t = MAX_PAGE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..=MAX_PAGE_SIZE as i64)
    )]
    pub page_size: u16,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Config;
    use crate::writer::OutputFormat;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["list-probes", "-o", "probes.jsonl"]).unwrap();
        assert_eq!(config.output.to_str(), Some("probes.jsonl"));
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert_eq!(config.page_size, 500);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.api_url.host_str(), Some("atlas.ripe.net"));
    }

    #[test]
    fn test_output_is_required() {
        assert!(Config::try_parse_from(["list-probes"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "list-probes",
            "--output",
            "probes.csv",
            "--format",
            "csv",
            "--api-url",
            "http://localhost:8080/probes/",
            "--page-size",
            "100",
            "--timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/probes/");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_page_size_bounds() {
        for size in ["0", "501"] {
            let parsed = Config::try_parse_from(["list-probes", "-o", "out", "--page-size", size]);
            assert!(parsed.is_err(), "page size {size} accepted");
        }
    }
}

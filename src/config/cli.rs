use crate::config::Overrides;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "matrix-scrape")]
#[command(about = "Crawl a listing page and write one results spreadsheet per linked page")]
pub struct CliConfig {
    /// Working directory served over HTTP as the listing page [default: ./test data]
    #[arg(short = 'd', long = "dir")]
    pub working_dir: Option<String>,

    /// Directory for the generated .csv files [default: ./results]
    #[arg(short = 'o', long = "output-dir", visible_alias = "outputDir")]
    pub output_dir: Option<String>,

    /// Number of pages processed concurrently, clamped to 1..=100 [default: 1]
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub concurrency: Option<i64>,

    /// Crawl this listing URL instead of serving --dir
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Also append logs to this file
    #[arg(long)]
    pub log_file: Option<String>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            working_dir: self.working_dir.clone(),
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let cli = CliConfig::parse_from(["matrix-scrape", "-d", "fixtures", "-o", "out", "-c", "-3"]);

        assert_eq!(cli.working_dir.as_deref(), Some("fixtures"));
        assert_eq!(cli.output_dir.as_deref(), Some("out"));
        assert_eq!(cli.concurrency, Some(-3));
        assert!(cli.url.is_none());
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = CliConfig::parse_from([
            "matrix-scrape",
            "--outputDir",
            "legacy-out",
            "--url",
            "http://host/list",
            "--concurrency",
            "12",
            "--verbose",
        ]);

        let overrides = cli.overrides();
        assert_eq!(overrides.output_dir.as_deref(), Some("legacy-out"));
        assert_eq!(overrides.url.as_deref(), Some("http://host/list"));
        assert_eq!(overrides.concurrency, Some(12));
        assert!(cli.verbose);
    }
}

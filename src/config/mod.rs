#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::engine::clamp_concurrency;
use crate::core::extract::ExtractRules;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_crawl_target, validate_path, validate_range, validate_selector, Validate,
};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::FileConfig;

pub const DEFAULT_WORKING_DIR: &str = "./test data";
pub const DEFAULT_OUTPUT_DIR: &str = "./results";
pub const DEFAULT_CONCURRENCY: i64 = 1;

/// Where the listing page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlSource {
    Url(String),
    /// Served over HTTP by the local file server before crawling.
    Directory(PathBuf),
}

/// Values given explicitly on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub working_dir: Option<String>,
    pub output_dir: Option<String>,
    pub concurrency: Option<i64>,
}

/// Effective configuration after merging CLI, file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: CrawlSource,
    pub output_dir: String,
    pub concurrency: usize,
    pub request_timeout: Option<Duration>,
    pub rules: ExtractRules,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = ExtractRules::default();

        // 命令列的 URL/目錄優先於檔案，同一層內 URL 優先於目錄
        let source = match (overrides.url, overrides.working_dir) {
            (Some(url), _) => CrawlSource::Url(url),
            (None, Some(dir)) => CrawlSource::Directory(PathBuf::from(dir)),
            (None, None) => match (file.crawl.target, file.crawl.working_dir) {
                (Some(url), _) => CrawlSource::Url(url),
                (None, dir) => CrawlSource::Directory(PathBuf::from(
                    dir.unwrap_or_else(|| DEFAULT_WORKING_DIR.to_string()),
                )),
            },
        };

        let requested = overrides
            .concurrency
            .or(file.crawl.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        let concurrency = clamp_concurrency(requested);
        if concurrency as i64 != requested {
            tracing::warn!("⚠️ Concurrency {} clamped to {}", requested, concurrency);
        }

        Self {
            source,
            output_dir: overrides
                .output_dir
                .or(file.output.dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            concurrency,
            request_timeout: file.crawl.request_timeout_seconds.map(Duration::from_secs),
            rules: ExtractRules {
                link_selector: file.page.link_selector.unwrap_or(defaults.link_selector),
                table_selector: file.page.table_selector.unwrap_or(defaults.table_selector),
            },
        }
    }
}

impl ConfigProvider for Settings {
    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn link_selector(&self) -> &str {
        &self.rules.link_selector
    }

    fn table_selector(&self) -> &str {
        &self.rules.table_selector
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        match &self.source {
            CrawlSource::Url(url) => validate_crawl_target("crawl.target", url)?,
            CrawlSource::Directory(dir) => {
                validate_path("crawl.working_dir", &dir.to_string_lossy())?
            }
        }
        validate_path("output.dir", &self.output_dir)?;
        validate_selector("page.link_selector", &self.rules.link_selector)?;
        validate_selector("page.table_selector", &self.rules.table_selector)?;
        if let Some(timeout) = self.request_timeout {
            validate_range("crawl.request_timeout_seconds", timeout.as_secs(), 1, 3600)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(Overrides::default(), None);

        assert_eq!(
            settings.source,
            CrawlSource::Directory(PathBuf::from(DEFAULT_WORKING_DIR))
        );
        assert_eq!(settings.output_dir, DEFAULT_OUTPUT_DIR);
        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.rules, ExtractRules::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_toml_str(
            r#"
[crawl]
target = "http://file.example/list"
concurrency = 4

[output]
dir = "./from-file"

[page]
table_selector = "table.results"
"#,
        )
        .unwrap();

        let overrides = Overrides {
            url: Some("http://cli.example/list".to_string()),
            concurrency: Some(250),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, Some(file));

        assert_eq!(
            settings.source,
            CrawlSource::Url("http://cli.example/list".to_string())
        );
        assert_eq!(settings.concurrency, 100);
        assert_eq!(settings.output_dir, "./from-file");
        assert_eq!(settings.table_selector(), "table.results");
        assert_eq!(settings.link_selector(), "a[href]");
    }

    #[test]
    fn test_cli_dir_beats_file_target() {
        let file = FileConfig::from_toml_str(
            "[crawl]\ntarget = \"http://file.example/list\"\nworking_dir = \"./file-dir\"\n",
        )
        .unwrap();

        let overrides = Overrides {
            working_dir: Some("./cli-dir".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, Some(file.clone()));
        assert_eq!(
            settings.source,
            CrawlSource::Directory(PathBuf::from("./cli-dir"))
        );

        // 命令列同時給 URL 與目錄時 URL 優先
        let overrides = Overrides {
            url: Some("http://cli.example/list".to_string()),
            working_dir: Some("./cli-dir".to_string()),
            ..Overrides::default()
        };
        assert_eq!(
            Settings::resolve(overrides, Some(file.clone())).source,
            CrawlSource::Url("http://cli.example/list".to_string())
        );

        assert_eq!(
            Settings::resolve(Overrides::default(), Some(file)).source,
            CrawlSource::Url("http://file.example/list".to_string())
        );

        let dir_only = FileConfig::from_toml_str("[crawl]\nworking_dir = \"./file-dir\"\n").unwrap();
        assert_eq!(
            Settings::resolve(Overrides::default(), Some(dir_only)).source,
            CrawlSource::Directory(PathBuf::from("./file-dir"))
        );
    }

    #[test]
    fn test_non_positive_concurrency_clamped() {
        let overrides = Overrides {
            concurrency: Some(0),
            ..Overrides::default()
        };
        assert_eq!(Settings::resolve(overrides, None).concurrency, 1);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::resolve(
            Overrides {
                url: Some("ftp://nope".to_string()),
                ..Overrides::default()
            },
            None,
        );
        assert!(settings.validate().is_err());

        settings.source = CrawlSource::Url("http://ok.example/list#top".to_string());
        assert!(settings.validate().is_err());

        settings.source = CrawlSource::Url("http://ok.example".to_string());
        assert!(settings.validate().is_ok());
        settings.rules.table_selector = "table[".to_string();
        assert!(settings.validate().is_err());

        settings.rules = ExtractRules::default();
        settings.request_timeout = Some(Duration::from_secs(0));
        assert!(settings.validate().is_err());
    }
}

use clap::Parser;
use matrix_scrape::config::toml_config::FileConfig;
use matrix_scrape::utils::error::ErrorSeverity;
use matrix_scrape::utils::{logger, validation::Validate};
use matrix_scrape::{
    CliConfig, CrawlEngine, CrawlSource, HttpFetcher, LocalStorage, ScrapeError, Settings,
    StaticServer,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else if let Err(e) = logger::init_cli_logger(cli.verbose, cli.log_file.as_deref().map(Path::new)) {
        eprintln!("❌ Fail to open log file: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Starting matrix-scrape");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file_config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let settings = Settings::resolve(cli.overrides(), file_config);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&settings, cli.monitor).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("❌ Crawl failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

async fn run(settings: &Settings, monitor: bool) -> Result<(), ScrapeError> {
    let storage = LocalStorage::new(&settings.output_dir);
    storage.ensure_dir().await?;

    // 未指定 URL 時，以本機檔案伺服器提供工作目錄
    let (target, server) = match &settings.source {
        CrawlSource::Url(url) => (url.clone(), None),
        CrawlSource::Directory(dir) => {
            let server = StaticServer::start(dir).await?;
            (server.url(), Some(server))
        }
    };

    let fetcher = HttpFetcher::new(settings.request_timeout)?;
    let engine = CrawlEngine::from_config(fetcher, storage, settings).with_monitoring(monitor);
    let result = engine.run(&target).await;

    if let Some(server) = server {
        server.shutdown().await;
    }
    let summary = result?;

    println!(
        "✅ {} of {} page(s) written to {}",
        summary.written().count(),
        summary.discovered(),
        settings.output_dir
    );
    for (_, error) in summary.failures() {
        println!("⚠️ {}", error.user_friendly_message());
    }

    Ok(())
}

#![cfg(feature = "cli")]

use anyhow::Result;
use matrix_scrape::core::extract::ExtractRules;
use matrix_scrape::core::PageFetcher;
use matrix_scrape::{CrawlEngine, HttpFetcher, LocalStorage, StaticServer};
use tempfile::TempDir;

const BOARD_A: &str = include_str!("fixtures/board_a.html");
const RAGGED: &str = include_str!("fixtures/ragged.html");

#[tokio::test]
async fn test_listing_links_every_file() -> Result<()> {
    let working_dir = TempDir::new()?;
    std::fs::write(working_dir.path().join("board_a.html"), BOARD_A)?;
    std::fs::write(working_dir.path().join("ragged.html"), RAGGED)?;

    let server = StaticServer::start(working_dir.path()).await?;
    let fetcher = HttpFetcher::new(None)?;

    let listing = fetcher.fetch(&server.url()).await?;
    assert!(listing.contains(r#"<a href="board_a.html">"#));
    assert!(listing.contains(r#"<a href="ragged.html">"#));

    let page = fetcher.fetch(&format!("{}/board_a.html", server.url())).await?;
    assert!(page.contains("Board-C"));

    assert!(fetcher.fetch(&format!("{}/nope.html", server.url())).await.is_err());

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_index_html_takes_precedence() -> Result<()> {
    let working_dir = TempDir::new()?;
    std::fs::write(
        working_dir.path().join("index.html"),
        r#"<a href="board_a.html">only this one</a>"#,
    )?;
    std::fs::write(working_dir.path().join("board_a.html"), BOARD_A)?;

    let server = StaticServer::start(working_dir.path()).await?;
    let listing = HttpFetcher::new(None)?.fetch(&server.url()).await?;

    assert_eq!(listing, r#"<a href="board_a.html">only this one</a>"#);
    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crawl_served_directory() -> Result<()> {
    let working_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    std::fs::write(working_dir.path().join("board_a.html"), BOARD_A)?;
    std::fs::write(working_dir.path().join("ragged.html"), RAGGED)?;
    std::fs::write(working_dir.path().join("nightly 2.html"), BOARD_A)?;

    let server = StaticServer::start(working_dir.path()).await?;
    let engine = CrawlEngine::new(
        HttpFetcher::new(None)?,
        LocalStorage::new(output_dir.path()),
        ExtractRules::default(),
        3,
    );

    let summary = engine.run(&server.url()).await?;
    server.shutdown().await;

    assert_eq!(summary.discovered(), 3);
    let mut written: Vec<&str> = summary.written().collect();
    written.sort();
    assert_eq!(written, vec!["board_a.csv", "nightly 2.csv"]);
    assert_eq!(summary.failed_count(), 1);

    let first = std::fs::read_to_string(output_dir.path().join("board_a.csv"))?;
    let second = std::fs::read_to_string(output_dir.path().join("nightly 2.csv"))?;
    assert_eq!(first, second);
    assert!(first.starts_with(";B101;B102;B103\n"));

    Ok(())
}

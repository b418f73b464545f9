pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use adapters::server::StaticServer;
#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use config::{CrawlSource, Settings};
pub use crate::core::{engine::CrawlEngine, report::Report};
pub use utils::error::{Result, ScrapeError};

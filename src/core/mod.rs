pub mod classify;
pub mod column;
pub mod engine;
pub mod extract;
pub mod report;

pub use crate::domain::model::{ColumnHeader, CrawlSummary, PageOutcome, PageTable, SubPageLink};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Storage};
pub use crate::utils::error::Result;

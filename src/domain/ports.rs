use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Fetches a page body. Non-success responses are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn output_dir(&self) -> &str;
    fn concurrency(&self) -> usize;
    fn link_selector(&self) -> &str;
    fn table_selector(&self) -> &str;
}

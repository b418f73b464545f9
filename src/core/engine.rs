use crate::core::extract::{discover_links, extract_table, ExtractRules};
use crate::core::report::Report;
use crate::domain::model::{CrawlSummary, PageOutcome, PageReport, SubPageLink};
use crate::domain::ports::{ConfigProvider, PageFetcher, Storage};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::monitor::ResourceMonitor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 100;

/// Clamps a requested worker count into `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
pub fn clamp_concurrency(requested: i64) -> usize {
    requested.clamp(MIN_CONCURRENCY as i64, MAX_CONCURRENCY as i64) as usize
}

/// Crawls a listing page and writes one report per linked sub-page.
pub struct CrawlEngine<F: PageFetcher, S: Storage> {
    fetcher: Arc<F>,
    storage: Arc<S>,
    rules: Arc<ExtractRules>,
    concurrency: usize,
    monitor: ResourceMonitor,
}

impl<F, S> CrawlEngine<F, S>
where
    F: PageFetcher + 'static,
    S: Storage + 'static,
{
    pub fn new(fetcher: F, storage: S, rules: ExtractRules, concurrency: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            storage: Arc::new(storage),
            rules: Arc::new(rules),
            concurrency: concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY),
            monitor: ResourceMonitor::new(false),
        }
    }

    pub fn from_config<C: ConfigProvider>(fetcher: F, storage: S, config: &C) -> Self {
        let rules = ExtractRules {
            link_selector: config.link_selector().to_string(),
            table_selector: config.table_selector().to_string(),
        };
        Self::new(fetcher, storage, rules, config.concurrency())
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = ResourceMonitor::new(enabled);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns once every discovered sub-page has reached a terminal state.
    /// Only a failure to load `target` itself is returned as an error.
    pub async fn run(&self, target: &str) -> Result<CrawlSummary> {
        tracing::info!("🌐 Visit: {}", target);
        self.monitor.log_stats("crawl start");

        let listing = self
            .fetcher
            .fetch(target)
            .await
            .map_err(|e| ScrapeError::TargetError {
                url: target.to_string(),
                source: Box::new(e),
            })?;

        let links = discover_links(&listing, target, &self.rules)?;
        tracing::info!(
            "🔗 Found {} sub-page(s), running with {} worker(s)",
            links.len(),
            self.concurrency
        );
        warn_on_name_collisions(&links);

        let gate = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(links.len());

        for link in links {
            // 在啟動任務前取得許可，額度用盡時在此等待
            let permit = gate
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ScrapeError::ProcessingError {
                    message: format!("admission gate closed: {}", e),
                })?;

            let fetcher = Arc::clone(&self.fetcher);
            let storage = Arc::clone(&self.storage);
            let rules = Arc::clone(&self.rules);
            let task_link = link.clone();

            let handle = tokio::spawn(async move {
                let result = process_page(fetcher.as_ref(), storage.as_ref(), &rules, &task_link).await;
                drop(permit);
                result
            });
            handles.push((link, handle));
        }

        let mut summary = CrawlSummary {
            target: target.to_string(),
            pages: Vec::with_capacity(handles.len()),
        };

        for (link, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(artifact)) => PageOutcome::Written { artifact },
                Ok(Err(error)) => {
                    tracing::warn!("❌ {}", error);
                    PageOutcome::Failed { error }
                }
                Err(join_error) => {
                    let error = ScrapeError::TaskFailed {
                        url: link.url.clone(),
                        message: join_error.to_string(),
                    };
                    tracing::error!("💥 {}", error);
                    PageOutcome::Failed { error }
                }
            };
            summary.pages.push(PageReport { link, outcome });
        }

        tracing::info!(
            "🏁 Leave: {} ({} written, {} failed)",
            target,
            summary.written().count(),
            summary.failed_count()
        );
        self.monitor.log_final_stats();

        Ok(summary)
    }
}

/// Fetch, extract, build and store one sub-page. Errors are tagged with its URL.
async fn process_page<F, S>(
    fetcher: &F,
    storage: &S,
    rules: &ExtractRules,
    link: &SubPageLink,
) -> Result<String>
where
    F: PageFetcher + ?Sized,
    S: Storage,
{
    tracing::debug!("Start scrape: {}", link);

    let artifact = link.artifact_name().ok_or_else(|| {
        ScrapeError::ArtifactNameError {
            url: link.url.clone(),
        }
        .for_page(&link.url)
    })?;

    let html = fetcher.fetch(&link.url).await.map_err(|e| e.for_page(&link.url))?;

    let report = extract_table(&html, rules)
        .and_then(Report::from_table)
        .map_err(|e| e.for_page(&link.url))?;

    storage
        .write_file(&artifact, report.serialize().as_bytes())
        .await
        .map_err(|e| e.for_page(&link.url))?;

    tracing::info!(
        "📄 {} -> {} ({} rows x {} columns)",
        link,
        artifact,
        report.total_rows(),
        report.total_cols()
    );
    Ok(artifact)
}

/// Returns the artifact names claimed by more than one link.
fn warn_on_name_collisions(links: &[SubPageLink]) -> Vec<String> {
    let mut seen: HashMap<String, &SubPageLink> = HashMap::new();
    let mut collisions = Vec::new();
    for link in links {
        if let Some(name) = link.artifact_name() {
            if let Some(previous) = seen.insert(name.clone(), link) {
                tracing::warn!(
                    "⚠️ {} and {} both write {}; the later one wins",
                    previous,
                    link,
                    name
                );
                if !collisions.contains(&name) {
                    collisions.push(name);
                }
            }
        }
    }
    collisions
}

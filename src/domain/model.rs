use crate::utils::error::ScrapeError;
use std::fmt;

/// A page reachable by one hop from the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubPageLink {
    pub url: String,
}

impl SubPageLink {
    /// 以簡單路徑串接解析 href（非完整 URL 解析）
    pub fn resolve(target: &str, href: &str) -> Self {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            return Self {
                url: href.to_string(),
            };
        }
        Self {
            url: format!(
                "{}/{}",
                target.trim_end_matches('/'),
                href.trim_start_matches('/')
            ),
        }
    }

    /// Last path segment with query/fragment dropped and a trailing `.html` removed.
    pub fn file_stem(&self) -> Option<&str> {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        let stem = segment.strip_suffix(".html").unwrap_or(segment);
        if stem.is_empty() || stem.contains(':') {
            None
        } else {
            Some(stem)
        }
    }

    pub fn artifact_name(&self) -> Option<String> {
        self.file_stem().map(|stem| format!("{}.csv", stem))
    }
}

impl fmt::Display for SubPageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub code: String,
    pub date: String,
}

impl ColumnHeader {
    /// Splits header text such as `"B17 2024-01-01 12:00"`; cells with fewer
    /// than three whitespace tokens carry no column header.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 3 {
            return None;
        }
        Some(Self {
            code: tokens[0].to_string(),
            date: format!("{} {}", tokens[1], tokens[2]),
        })
    }
}

pub type ResultRow = Vec<String>;

/// Everything extracted from one sub-page's results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTable {
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<ResultRow>,
}

impl PageTable {
    pub fn codes(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.code.clone()).collect()
    }

    pub fn dates(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.date.clone()).collect()
    }
}

#[derive(Debug)]
pub enum PageOutcome {
    Written { artifact: String },
    Failed { error: ScrapeError },
}

#[derive(Debug)]
pub struct PageReport {
    pub link: SubPageLink,
    pub outcome: PageOutcome,
}

/// 整次爬取的結果摘要
#[derive(Debug, Default)]
pub struct CrawlSummary {
    pub target: String,
    pub pages: Vec<PageReport>,
}

impl CrawlSummary {
    pub fn discovered(&self) -> usize {
        self.pages.len()
    }

    pub fn written(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().filter_map(|p| match &p.outcome {
            PageOutcome::Written { artifact } => Some(artifact.as_str()),
            PageOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SubPageLink, &ScrapeError)> {
        self.pages.iter().filter_map(|p| match &p.outcome {
            PageOutcome::Failed { error } => Some((&p.link, error)),
            PageOutcome::Written { .. } => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

//! HTML querying for listing pages and results tables.
//!
//! Parsed documents are not `Send`, so everything here is synchronous and
//! returns owned data; callers never hold a document across an `.await`.

use crate::core::classify::{classify, CellClass};
use crate::domain::model::{ColumnHeader, PageTable, SubPageLink};
use crate::utils::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

pub const DEFAULT_LINK_SELECTOR: &str = "a[href]";
pub const DEFAULT_TABLE_SELECTOR: &str =
    ".matrix.table.table-sm.table-less-padding.table-borderless.table-striped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRules {
    pub link_selector: String,
    pub table_selector: String,
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self {
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
        }
    }
}

impl ExtractRules {
    pub fn validate(&self) -> Result<()> {
        parse_selector(&self.link_selector)?;
        parse_selector(&self.table_selector)?;
        Ok(())
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Resolves every matching anchor of the listing page, in document order.
pub fn discover_links(html: &str, target: &str, rules: &ExtractRules) -> Result<Vec<SubPageLink>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(&rules.link_selector)?;

    let links = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(|href| SubPageLink::resolve(target, href))
        .collect();

    Ok(links)
}

pub fn extract_table(html: &str, rules: &ExtractRules) -> Result<PageTable> {
    let document = Html::parse_document(html);
    let table_selector = parse_selector(&rules.table_selector)?;
    let header_row = parse_selector("thead tr")?;
    let header_cell = parse_selector("th")?;
    let body_row = parse_selector("tbody tr")?;
    let body_cell = parse_selector("td")?;

    let mut tables = document.select(&table_selector);
    let table = tables.next().ok_or_else(|| ScrapeError::TableNotFound {
        selector: rules.table_selector.clone(),
    })?;
    let extra = tables.count();
    if extra > 0 {
        tracing::warn!("⚠️ {} extra results table(s) ignored, using the first", extra);
    }

    let headers = table
        .select(&header_row)
        .flat_map(|tr| tr.select(&header_cell))
        .filter_map(|th| ColumnHeader::parse(&element_text(th)))
        .collect();

    let rows = table
        .select(&body_row)
        .map(|tr| {
            tr.select(&body_cell)
                .map(|td| {
                    let class = CellClass::from_class_attr(td.value().attr("class").unwrap_or(""));
                    classify(class, &element_text(td))
                })
                .collect()
        })
        .collect();

    Ok(PageTable { headers, rows })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

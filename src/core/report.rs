//! Per-page spreadsheet report.
//!
//! A report is built in two validated steps, header then body, and can only
//! be serialized once both are present:
//!
//! ```
//! use matrix_scrape::core::report::ReportBuilder;
//!
//! let report = ReportBuilder::new()
//!     .header(vec!["B1".into()], vec!["2024-01-01 08:00".into()])?
//!     .body(vec![vec!["Board-A".into(), "1".into()]])?;
//! assert!(report.serialize().starts_with(";B1\n"));
//! # Ok::<(), matrix_scrape::ScrapeError>(())
//! ```

use crate::core::column::{cell_reference, range_reference};
use crate::core::classify::FAIL_MARK;
use crate::domain::model::{PageTable, ResultRow};
use crate::utils::error::{Result, ScrapeError};

pub const SEPARATOR: &str = ";";

/// 1-based row numbers of the serialized document.
pub mod layout {
    pub const CODE_ROW: usize = 1;
    pub const DATE_ROW: usize = CODE_ROW + 1;
    // 表頭與公式區之間留一列空白
    pub const FAIL_ROW: usize = DATE_ROW + 2;
    pub const PASS_ROW: usize = FAIL_ROW + 1;
    pub const TOTAL_ROW: usize = PASS_ROW + 1;
    pub const RATE_ROW: usize = TOTAL_ROW + 1;
    pub const FIRST_DATA_ROW: usize = RATE_ROW + 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    Fails,
    Passes,
    TotalRuns,
    PassRate,
}

impl Summary {
    /// In layout order.
    pub const ALL: [Summary; 4] = [
        Summary::Fails,
        Summary::Passes,
        Summary::TotalRuns,
        Summary::PassRate,
    ];

    pub fn row(self) -> usize {
        match self {
            Summary::Fails => layout::FAIL_ROW,
            Summary::Passes => layout::PASS_ROW,
            Summary::TotalRuns => layout::TOTAL_ROW,
            Summary::PassRate => layout::RATE_ROW,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Summary::Fails => "fails",
            Summary::Passes => "passes",
            Summary::TotalRuns => "total runs",
            Summary::PassRate => "pass rate",
        }
    }

    /// Formula text for data column `col` whose values span `range`.
    fn formula(self, range: &str, col: usize) -> Result<String> {
        Ok(match self {
            Summary::Fails => format!("=COUNTIF({},\"{}\")", range, FAIL_MARK),
            Summary::Passes => format!("=SUM({})", range),
            Summary::TotalRuns => format!("=COUNTA({})", range),
            Summary::PassRate => {
                let passes = cell_reference(Summary::Passes.row(), col)?;
                let total = cell_reference(Summary::TotalRuns.row(), col)?;
                format!("=IF({}=0,\"N/A\",{}/{})", total, passes, total)
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct Empty;

#[derive(Debug)]
pub struct HeaderSet {
    codes: Vec<String>,
    dates: Vec<String>,
}

/// Ordered construction of a [`Report`]; each stage is a distinct type.
#[derive(Debug, Default)]
pub struct ReportBuilder<S = Empty> {
    stage: S,
}

impl ReportBuilder<Empty> {
    pub fn new() -> Self {
        Self { stage: Empty }
    }

    pub fn header(self, codes: Vec<String>, dates: Vec<String>) -> Result<ReportBuilder<HeaderSet>> {
        if codes.len() != dates.len() {
            return Err(ScrapeError::data_shape(format!(
                "{} column codes but {} dates",
                codes.len(),
                dates.len()
            )));
        }
        Ok(ReportBuilder {
            stage: HeaderSet { codes, dates },
        })
    }
}

impl ReportBuilder<HeaderSet> {
    /// Validates the body against the header and computes the formula block.
    pub fn body(self, rows: Vec<ResultRow>) -> Result<Report> {
        let total_rows = rows.len();
        let total_cols = rows.first().map(Vec::len).unwrap_or(0);

        if total_rows == 0 {
            return Err(ScrapeError::data_shape("table has no body rows"));
        }
        if total_cols < 2 {
            return Err(ScrapeError::data_shape(format!(
                "table needs a name column and at least one data column, found {} column(s)",
                total_cols
            )));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != total_cols) {
            return Err(ScrapeError::data_shape(format!(
                "ragged rows: row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                total_cols
            )));
        }
        let HeaderSet { codes, dates } = self.stage;
        reject_unsafe_cells("header", codes.iter().chain(dates.iter()))?;
        for (index, row) in rows.iter().enumerate() {
            reject_unsafe_cells(&format!("row {}", index + 1), row.iter())?;
        }
        if codes.len() + 1 != total_cols {
            return Err(ScrapeError::data_shape(format!(
                "header has {} columns but body has {} data columns",
                codes.len(),
                total_cols - 1
            )));
        }

        let formulas = formula_block(total_rows, total_cols)?;

        Ok(Report {
            codes,
            dates,
            formulas,
            body: rows,
            total_cols,
        })
    }
}

/// A cell holding the separator or a line break would shift the row layout.
fn reject_unsafe_cells<'a>(place: &str, cells: impl Iterator<Item = &'a String>) -> Result<()> {
    match cells.into_iter().find(|c| c.contains(SEPARATOR) || c.contains(['\n', '\r'])) {
        Some(cell) => Err(ScrapeError::data_shape(format!(
            "{} has a cell with a separator or line break: {:?}",
            place, cell
        ))),
        None => Ok(()),
    }
}

fn formula_block(total_rows: usize, total_cols: usize) -> Result<Vec<Vec<String>>> {
    let first = layout::FIRST_DATA_ROW;
    let last = first + total_rows - 1;

    Summary::ALL
        .iter()
        .map(|&summary| -> Result<Vec<String>> {
            let mut row = Vec::with_capacity(total_cols);
            row.push(summary.label().to_string());
            for col in 2..=total_cols {
                let range = range_reference(first, last, col)?;
                row.push(summary.formula(&range, col)?);
            }
            Ok(row)
        })
        .collect()
}

/// A validated report document, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    codes: Vec<String>,
    dates: Vec<String>,
    formulas: Vec<Vec<String>>,
    body: Vec<ResultRow>,
    total_cols: usize,
}

impl Report {
    pub fn from_table(table: PageTable) -> Result<Self> {
        let codes = table.codes();
        let dates = table.dates();
        ReportBuilder::new().header(codes, dates)?.body(table.rows)
    }

    pub fn total_cols(&self) -> usize {
        self.total_cols
    }

    pub fn total_rows(&self) -> usize {
        self.body.len()
    }

    pub fn formula_rows(&self) -> &[Vec<String>] {
        &self.formulas
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        let blank = vec![String::new(); self.total_cols];

        push_row(&mut out, std::iter::once("").chain(self.codes.iter().map(String::as_str)));
        push_row(&mut out, std::iter::once("").chain(self.dates.iter().map(String::as_str)));
        push_row(&mut out, blank.iter().map(String::as_str));
        for row in &self.formulas {
            push_row(&mut out, row.iter().map(String::as_str));
        }
        push_row(&mut out, blank.iter().map(String::as_str));
        for row in &self.body {
            push_row(&mut out, row.iter().map(String::as_str));
        }

        out
    }
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let cells: Vec<&str> = cells.collect();
    out.push_str(&cells.join(SEPARATOR));
    out.push('\n');
}

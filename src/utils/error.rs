use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    StatusError { url: String, status: u16 },

    #[error("Cannot reach crawl target {url}: {source}")]
    TargetError {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("Page {url} failed: {source}")]
    PageError {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("Task for {url} did not finish: {message}")]
    TaskFailed { url: String, message: String },

    #[error("No results table matching '{selector}'")]
    TableNotFound { selector: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Malformed table data: {message}")]
    DataShapeError { message: String },

    #[error("Column index must be at least 1, got {index}")]
    InvalidColumn { index: usize },

    #[error("Invalid column letters '{letters}'")]
    InvalidColumnLetters { letters: String },

    #[error("Row number must be at least 1, got {row}")]
    InvalidRow { row: usize },

    #[error("Cannot derive a report name from '{url}'")]
    ArtifactNameError { url: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShapeError {
            message: message.into(),
        }
    }

    /// 包裝為單一子頁面的錯誤，保留原始原因
    pub fn for_page(self, url: &str) -> Self {
        match self {
            err @ Self::PageError { .. } => err,
            other => Self::PageError {
                url: url.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PageError { .. }
            | Self::TableNotFound { .. }
            | Self::DataShapeError { .. }
            | Self::StatusError { .. } => ErrorSeverity::Medium,
            Self::HttpError(_) | Self::TargetError { .. } | Self::TaskFailed { .. } => {
                ErrorSeverity::High
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::SelectorError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::ProcessingError { .. } => ErrorSeverity::Critical,
            Self::InvalidColumn { .. }
            | Self::InvalidColumnLetters { .. }
            | Self::InvalidRow { .. }
            | Self::ArtifactNameError { .. } => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::TargetError { url, .. } => format!(
                "Check that {} is reachable, or point --url / --dir at a valid listing page",
                url
            ),
            Self::PageError { source, .. } => source.recovery_suggestion(),
            Self::HttpError(_) | Self::StatusError { .. } => {
                "Check network connectivity and that the page exists".to_string()
            }
            Self::TableNotFound { .. } | Self::SelectorError { .. } => {
                "Check [page].table_selector in the config file".to_string()
            }
            Self::DataShapeError { .. } => {
                "The results table has an unexpected shape; inspect the page source".to_string()
            }
            Self::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Run with --help and review the configuration values".to_string()
            }
            _ => "Re-run with --verbose for more details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TargetError { url, .. } => format!("Could not load the listing page {}", url),
            Self::PageError { url, source } => format!("Skipped {}: {}", url, source),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

use crate::core::extract::parse_selector;
use crate::utils::error::{Result, ScrapeError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ScrapeError {
    ScrapeError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An absolute `http`/`https` URL.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

/// A listing URL that sub-page hrefs can be appended to.
///
/// Links are joined as `<target>/<href>`, so a fragment on the target would
/// swallow every sub-page path.
pub fn validate_crawl_target(field_name: &str, url_str: &str) -> Result<()> {
    let url = validate_url(field_name, url_str)?;
    if url.fragment().is_some() {
        return Err(invalid(
            field_name,
            url_str,
            "Listing URL must not carry a #fragment",
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_selector(field_name: &str, selector: &str) -> Result<()> {
    parse_selector(selector)
        .map(|_| ())
        .map_err(|e| invalid(field_name, selector, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("crawl.target", "https://example.com").is_ok());
        assert!(validate_url("crawl.target", "http://127.0.0.1:8080/runs").is_ok());
        assert!(validate_url("crawl.target", "").is_err());
        assert!(validate_url("crawl.target", "invalid-url").is_err());
        assert!(validate_url("crawl.target", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_crawl_target() {
        assert!(validate_crawl_target("crawl.target", "http://127.0.0.1:8080/runs").is_ok());
        assert!(validate_crawl_target("crawl.target", "http://example.com/runs?day=1").is_ok());

        let err = validate_crawl_target("crawl.target", "http://example.com/runs#latest")
            .unwrap_err();
        match err {
            ScrapeError::InvalidConfigValueError { field, reason, .. } => {
                assert_eq!(field, "crawl.target");
                assert!(reason.contains("fragment"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(validate_crawl_target("crawl.target", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.dir", "./results").is_ok());
        assert!(validate_path("output.dir", "  ").is_err());
        assert!(validate_path("output.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("crawl.concurrency", 5, 1, 100).is_ok());
        assert!(validate_range("crawl.concurrency", 0, 1, 100).is_err());
        assert!(validate_range("crawl.concurrency", 101, 1, 100).is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("page.table_selector", "table.matrix").is_ok());
        assert!(validate_selector("page.table_selector", "table[").is_err());
    }
}

//! Validation for URLs lifted out of post markup

use thiserror::Error;
use url::Url;

/// Why a URL from post content was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    /// Not an absolute URL
    #[error("unparseable URL: {0}")]
    Unparseable(#[from] url::ParseError),
    /// Scheme other than http/https (e.g. `javascript:`)
    #[error("unsupported scheme: {0}")]
    Scheme(String),
    /// No host, or an empty one
    #[error("missing host")]
    MissingHost,
}

/// Parse `raw` as an absolute `http`/`https` URL with a non-empty host
pub fn validate_web_url(raw: &str) -> Result<Url, UrlRejection> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlRejection::Scheme(other.to_string())),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlRejection::MissingHost);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_web_urls() {
        assert!(validate_web_url("https://example.com/a?b=c").is_ok());
        assert!(validate_web_url("http://example.com").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_web_url("javascript:alert(1)"),
            Err(UrlRejection::Scheme("javascript".to_string()))
        );
        assert!(matches!(
            validate_web_url("ftp://example.com/file"),
            Err(UrlRejection::Scheme(_))
        ));
    }

    #[test]
    fn test_rejects_relative_urls() {
        assert!(matches!(
            validate_web_url("/tags/rust"),
            Err(UrlRejection::Unparseable(_))
        ));
    }
}

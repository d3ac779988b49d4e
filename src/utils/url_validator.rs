//! Target URL validation for outbound links.

use url::Url;

/// Maximum accepted length of a link target.
pub const MAX_URL_LEN: usize = 2048;

/// Errors that can occur while validating a link target.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL exceeds {MAX_URL_LEN} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http` or `https` URL with a host.
///
/// The URL is stored exactly as submitted; this function does not
/// normalize it.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes, which
/// would otherwise be served from the public profile and redirect endpoint.
///
/// # Errors
///
/// Returns [`UrlValidationError`] describing the first rule violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_target_url("https://example.com/a?b=c").is_ok());
/// assert!(validate_target_url("javascript:alert(1)").is_err());
/// assert!(validate_target_url("example.com").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().count() > MAX_URL_LEN {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

/// Adapter for `#[validate(custom(function = ...))]` on request DTOs.
pub fn validate_url_field(input: &str) -> Result<(), validator::ValidationError> {
    validate_target_url(input).map_err(|e| {
        let mut err = validator::ValidationError::new("url");
        err.message = Some("Invalid URL".into());
        err.add_param("reason".into(), &e.to_string());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_target_url("http://example.com").is_ok());
        assert!(validate_target_url("https://example.com/path?q=1#frag").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in ["javascript:alert(1)", "ftp://example.com", "file:///etc/passwd", "data:text/html,x"] {
            assert!(
                matches!(
                    validate_target_url(input),
                    Err(UrlValidationError::UnsupportedProtocol)
                        | Err(UrlValidationError::InvalidFormat(_))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_target_url("example.com/page"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_too_long() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
        assert!(matches!(
            validate_target_url(&long),
            Err(UrlValidationError::TooLong)
        ));
    }

    #[test]
    fn test_field_adapter_message() {
        let err = validate_url_field("nope").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Invalid URL"));
    }
}

//! Client configuration.
//!
//! Centralizes the endpoint table and defaults, and provides [`ClientConfig`],
//! the value injected into every [`HttpClient`](crate::HttpClient). Nothing here
//! is process-global: two clients with different configurations can coexist.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Endpoints
// =============================================================================

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const SYSTEM_INFO: &str = "/api/system-info";
    pub const LIST: &str = "/api/list";
    pub const OPERATION: &str = "/api/operation";
    pub const PREVIEW: &str = "/api/preview";
    pub const SAVE: &str = "/api/save";
    pub const UPLOAD: &str = "/api/upload";
    pub const DOWNLOAD: &str = "/api/download";
    pub const MOVE: &str = "/api/move";
    pub const COPY: &str = "/api/copy";
}

// =============================================================================
// Defaults
// =============================================================================

/// Request timeout applied to every call, downloads included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Content type sent with JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type announced for the multipart upload.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

// =============================================================================
// ClientConfig
// =============================================================================

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid client configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A zero timeout would fail every request immediately.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    /// Both `timeout_secs` and `timeout_ms` were given.
    #[error("set either timeout_secs or timeout_ms, not both")]
    ConflictingTimeout,
    /// A default header value that is not a string.
    #[error("default header `{name}` must be a string")]
    InvalidHeader { name: String },
}

/// Transport configuration: base location, timeout and default headers.
///
/// ```toml
/// base_url = "https://files.example.com"
/// timeout_secs = 30        # or timeout_ms = 1500
///
/// [default_headers]
/// Content-Type = "application/json"
/// X-Requested-With = "gfinder"
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every endpoint. Empty means same-origin relative URLs.
    pub base_url: String,
    /// Upper bound for a single request, body included.
    pub timeout: Duration,
    /// Headers sent with every JSON request.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())],
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Document {
            base_url: Option<String>,
            timeout_secs: Option<u64>,
            timeout_ms: Option<u64>,
            default_headers: Option<toml::Table>,
        }

        let doc: Document = toml::from_str(source)?;
        let mut config = Self::default();

        if let Some(base_url) = doc.base_url {
            config.base_url = base_url;
        }
        let timeout = match (doc.timeout_secs, doc.timeout_ms) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingTimeout),
            (Some(secs), None) => Some(Duration::from_secs(secs)),
            (None, Some(ms)) => Some(Duration::from_millis(ms)),
            (None, None) => None,
        };
        if let Some(timeout) = timeout {
            if timeout.is_zero() {
                return Err(ConfigError::ZeroTimeout);
            }
            config.timeout = timeout;
        }
        if let Some(headers) = doc.default_headers {
            config.default_headers = headers
                .into_iter()
                .map(|(name, value)| match value {
                    toml::Value::String(value) => Ok((name, value)),
                    _ => Err(ConfigError::InvalidHeader { name }),
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the request timeout. Zero is raised to one millisecond.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Add or replace a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    /// Request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an endpoint with a percent-encoded query string.
    ///
    /// Query values are encoded with `encodeURIComponent` semantics, so
    /// `/` inside a path value becomes `%2F`.
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.base_url, "");
        assert_eq!(
            config.default_headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn test_url_without_query() {
        let config = ClientConfig::default();
        assert_eq!(config.url(endpoints::SYSTEM_INFO, &[]), "/api/system-info");
    }

    #[test]
    fn test_url_trims_base_slash() {
        let config = ClientConfig::default().with_base_url("https://files.example.com/");
        assert_eq!(
            config.url(endpoints::LIST, &[("path", "docs")]),
            "https://files.example.com/api/list?path=docs"
        );
    }

    #[test]
    fn test_url_encodes_query_values() {
        let config = ClientConfig::default();
        assert_eq!(
            config.url(
                endpoints::DOWNLOAD,
                &[("path", "a b/c"), ("filename", "r&d.pdf")]
            ),
            "/api/download?path=a%20b%2Fc&filename=r%26d.pdf"
        );
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let config = ClientConfig::default().with_header("content-type", "text/plain");
        assert_eq!(
            config.default_headers,
            vec![("content-type".to_string(), "text/plain".to_string())]
        );
    }

    #[test]
    fn test_from_toml() {
        let config = ClientConfig::from_toml(
            r#"
            base_url = "http://localhost:8000"
            timeout_secs = 5

            [default_headers]
            X-Requested-With = "gfinder"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.default_headers,
            vec![("X-Requested-With".to_string(), "gfinder".to_string())]
        );
    }

    #[test]
    fn test_from_toml_keeps_defaults() {
        let config = ClientConfig::from_toml("base_url = \"/files\"").unwrap();
        assert_eq!(config.base_url, "/files");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.default_headers, ClientConfig::default().default_headers);
    }

    #[test]
    fn test_from_toml_rejects_zero_timeout() {
        let err = ClientConfig::from_toml("timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_with_timeout_keeps_millis() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), Duration::from_millis(1));
    }

    #[test]
    fn test_from_toml_timeout_ms() {
        let config = ClientConfig::from_toml("timeout_ms = 1500").unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(1500));

        let err = ClientConfig::from_toml("timeout_secs = 2\ntimeout_ms = 1500").unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingTimeout));
    }

    #[test]
    fn test_from_toml_rejects_non_string_header() {
        let err = ClientConfig::from_toml("[default_headers]\nX-Retry = 3").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { ref name } if name == "X-Retry"));
        assert_eq!(err.to_string(), "default header `X-Retry` must be a string");
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(ClientConfig::from_toml("retries = 3").is_err());
    }
}

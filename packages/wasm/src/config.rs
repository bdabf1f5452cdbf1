//! View configuration supplied by the host page.

use std::time::Duration;

use serde::Deserialize;

/// Default hard timeout for the remote layout request.
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5_000;

/// Default quiet period before a rebuild runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Configuration for a cluster view.
///
/// Deserialized from a plain JavaScript object; every field is optional.
///
/// ```json
/// { "layoutEndpoint": "/api/cluster-layout", "remoteTimeoutMs": 5000, "debounceMs": 100 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// URL of the remote layout service. `None` disables the remote strategy.
    pub layout_endpoint: Option<String>,
    /// Remote request timeout in milliseconds (default: 5000).
    pub remote_timeout_ms: u64,
    /// Rebuild debounce window in milliseconds (default: 100).
    pub debounce_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            layout_endpoint: None,
            remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ViewConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The endpoint, ignoring blank strings.
    pub fn endpoint(&self) -> Option<&str> {
        self.layout_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: ViewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.remote_timeout(), Duration::from_secs(5));
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert!(config.endpoint().is_none());
    }

    #[test]
    fn test_camel_case_fields() {
        let config: ViewConfig = serde_json::from_str(
            r#"{"layoutEndpoint": "/api/layout", "remoteTimeoutMs": 250, "debounceMs": 0}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint(), Some("/api/layout"));
        assert_eq!(config.remote_timeout(), Duration::from_millis(250));
        assert_eq!(config.debounce(), Duration::ZERO);
    }

    #[test]
    fn test_blank_endpoint_disables_remote() {
        let config = ViewConfig {
            layout_endpoint: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.endpoint().is_none());
    }
}

//! Client configuration (env-backed, builder-style overrides).

use std::time::Duration;

/// Fallback backend base URL used when `VANTAGE_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Minimum elapsed time between successive refresh network calls.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_millis(2000);

/// How long a resolved refresh handle lingers before being cleared.
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(500);

/// Client-side timeout applied by chart/dashboard data call sites.
pub const DATA_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`ApiClient`](crate::http::ApiClient) and
/// [`RefreshCoordinator`](crate::refresh::RefreshCoordinator).
///
/// The two refresh delays carry the values observed in production; they are
/// tunable, not sacred.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; relative request paths are resolved against it.
    pub base_url: String,
    /// Cooldown after a successful refresh during which further refresh
    /// calls short-circuit to success.
    pub refresh_cooldown: Duration,
    /// Trailing delay before a resolved refresh handle is cleared.
    pub clear_delay: Duration,
    /// Timeout applied to every request unless overridden per call.
    pub default_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            clear_delay: DEFAULT_CLEAR_DELAY,
            default_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load from environment variables (`.env` honored if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VANTAGE_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = delay;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Resolve a request path against the base URL. Absolute URLs pass
    /// through untouched.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_observed_delays() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.refresh_cooldown, Duration::from_millis(2000));
        assert_eq!(config.clear_delay, Duration::from_millis(500));
        assert!(config.default_timeout.is_none());
    }

    #[test]
    fn endpoint_joins_relative_paths() {
        let config = ClientConfig::default().with_base_url("http://api.example.com/");
        assert_eq!(
            config.endpoint("/api/auth/login"),
            "http://api.example.com/api/auth/login"
        );
        assert_eq!(
            config.endpoint("api/auth/login"),
            "http://api.example.com/api/auth/login"
        );
    }

    #[test]
    fn endpoint_passes_absolute_urls_through() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("https://elsewhere.example.com/x"),
            "https://elsewhere.example.com/x"
        );
    }

    #[test]
    fn builder_overrides_apply() {
        let config = ClientConfig::default()
            .with_refresh_cooldown(Duration::from_millis(10))
            .with_clear_delay(Duration::from_millis(5))
            .with_default_timeout(Some(DATA_FETCH_TIMEOUT));
        assert_eq!(config.refresh_cooldown, Duration::from_millis(10));
        assert_eq!(config.clear_delay, Duration::from_millis(5));
        assert_eq!(config.default_timeout, Some(Duration::from_secs(10)));
    }
}

//! Settings for fetching the published snapshot

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::middleware::RetryConfig;

const CONNECT_TIMEOUT_CAP: Duration = Duration::from_secs(10);
const SNAPSHOT_REDIRECTS: usize = 5;

/// HTTP client settings
///
/// The connect timeout never exceeds the request timeout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Retries after the first attempt
    pub retry_count: u32,
    /// First backoff delay; doubles per retry
    pub retry_delay: Duration,
    /// `User-Agent` header
    pub user_agent: String,
    /// Redirects followed before giving up; 0 disables them
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::for_snapshot(Duration::from_secs(30))
    }
}

impl HttpConfig {
    /// Default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for a snapshot fetch bounded by `timeout`
    ///
    /// Published snapshots usually sit behind static hosting, which may
    /// redirect a few times.
    pub fn for_snapshot(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(CONNECT_TIMEOUT_CAP),
            retry_count: 2,
            retry_delay: Duration::from_millis(500),
            user_agent: format!("notodash/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: SNAPSHOT_REDIRECTS,
        }
    }

    /// Set the request timeout, shrinking the connect timeout to fit
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    /// Set the retry count
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Set the first backoff delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set how many redirects are followed
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub(crate) fn redirect_policy(&self) -> reqwest::redirect::Policy {
        match self.max_redirects {
            0 => reqwest::redirect::Policy::none(),
            limit => reqwest::redirect::Policy::limited(limit),
        }
    }

    pub(crate) fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_count,
            initial_delay: self.retry_delay,
            max_delay: self.timeout.max(self.retry_delay),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_redirects, 5);
        assert!(config.user_agent.starts_with("notodash/"));
    }

    #[test]
    fn test_connect_timeout_fits_request_timeout() {
        assert_eq!(
            HttpConfig::for_snapshot(Duration::from_secs(3)).connect_timeout,
            Duration::from_secs(3)
        );
        let config = HttpConfig::new().with_timeout(Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_retry_config_follows_settings() {
        let retry = HttpConfig::new()
            .with_retry_count(4)
            .with_retry_delay(Duration::from_millis(50))
            .retry_config();
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(retry.initial_delay, Duration::from_millis(50));
        assert_eq!(retry.max_delay, Duration::from_secs(30));
    }
}

//! Client configuration: registry location, credentials, poll policy.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the registry base URL.
pub const ENV_BASE_URL: &str = "GOAT";
/// Environment variable holding the application token.
pub const ENV_TOKEN: &str = "GOAT_APP_TOKEN";
/// Environment variable holding the poll interval, in (fractional) seconds.
pub const ENV_WAIT_INTERVAL: &str = "GOAT_WAIT_INTERVAL";
/// Environment variable holding the maximum number of poll attempts.
pub const ENV_MAX_POLLS: &str = "GOAT_MAX_POLLS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("registry base URL is not set (expected `GOAT`)")]
    MissingBaseUrl,
    #[error("invalid poll interval {value:?}: expected non-negative seconds")]
    InvalidPollInterval { value: String },
    #[error("invalid max poll attempts {value:?}: expected a positive integer")]
    InvalidMaxAttempts { value: String },
    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

/// Bounds for the 202 poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between a 202 response and the next attempt.
    pub interval: Duration,
    /// Total GETs allowed, the first request included. Always at least 1.
    pub max_attempts: u32,
    /// Optional cap on wall time across all attempts.
    pub max_elapsed: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 60,
            max_elapsed: None,
        }
    }
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }
}

/// Per-client configuration, threaded into every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: Option<String>,
    poll: PollPolicy,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            token: None,
            poll: PollPolicy::default(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        let mut config = Self::new(base_url.trim());

        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            config.token = Some(token);
        }
        if let Some(raw) = lookup(ENV_WAIT_INTERVAL) {
            config.poll.interval = parse_interval(&raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_POLLS) {
            config.poll.max_attempts = parse_max_attempts(&raw)?;
        }

        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn poll(&self) -> &PollPolicy {
        &self.poll
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// `{base}/{segment}/`
    pub fn url_for(&self, segment: &str) -> String {
        format!("{}/{}/", self.base_url, segment.trim_matches('/'))
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim_end_matches('/').to_string()
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidPollInterval {
        value: raw.to_string(),
    };
    let secs: f64 = raw.trim().parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

fn parse_max_attempts(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidMaxAttempts {
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn url_for_joins_without_double_slashes() {
        let config = ClientConfig::new("http://goat.goat/goat/");
        assert_eq!(config.base_url(), "http://goat.goat/goat");
        assert_eq!(config.url_for("concept"), "http://goat.goat/goat/concept/");
        assert_eq!(
            config.url_for("concept/search"),
            "http://goat.goat/goat/concept/search/"
        );
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://127.0.0.1:8000"),
            (ENV_TOKEN, "d22bbda9b5b507dc6cd032d80d6a3d299fda10fe"),
            (ENV_WAIT_INTERVAL, "0.001"),
            (ENV_MAX_POLLS, "12"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert_eq!(config.token(), Some("d22bbda9b5b507dc6cd032d80d6a3d299fda10fe"));
        assert_eq!(config.poll().interval, Duration::from_millis(1));
        assert_eq!(config.poll().max_attempts, 12);
    }

    #[test]
    fn defaults_apply_when_optional_variables_are_absent() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "http://x")])).unwrap();
        assert_eq!(config.token(), None);
        assert_eq!(*config.poll(), PollPolicy::default());
    }

    #[test]
    fn base_url_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TOKEN, "t")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingBaseUrl);
    }

    #[test]
    fn rejects_bad_poll_settings() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://x"),
            (ENV_WAIT_INTERVAL, "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPollInterval { .. }));

        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://x"),
            (ENV_MAX_POLLS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxAttempts { .. }));
    }

    #[test]
    fn max_attempts_never_drops_below_one() {
        assert_eq!(PollPolicy::default().with_max_attempts(0).max_attempts, 1);
    }
}

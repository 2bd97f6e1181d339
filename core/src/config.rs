//! Connection configuration and its layered resolution.
//!
//! # Design
//! Each setting resolves as explicit option, then environment override, then
//! hardcoded default. The environment is passed in as a lookup function so
//! resolution stays pure and tests never touch the process environment.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.danubeai.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const ENV_API_KEY: &str = "DANUBE_API_KEY";
pub const ENV_BASE_URL: &str = "DANUBE_API_URL";
pub const ENV_TIMEOUT: &str = "DANUBE_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "DANUBE_MAX_RETRIES";

/// Caller-supplied settings. Anything left unset is resolved from the
/// environment or the defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

/// Resolved, immutable connection configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    base_url: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Config {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
            max_retries,
        }
    }

    /// Resolve options against an arbitrary environment lookup.
    pub fn resolve<F>(options: ClientOptions, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_setting(options.api_key, lookup(ENV_API_KEY), String::new());
        let base_url = resolve_setting(
            options.base_url,
            lookup(ENV_BASE_URL),
            DEFAULT_BASE_URL.to_string(),
        );
        let timeout = resolve_setting(
            options.timeout,
            parse_env(ENV_TIMEOUT, lookup(ENV_TIMEOUT), parse_seconds),
            DEFAULT_TIMEOUT,
        );
        let max_retries = resolve_setting(
            options.max_retries,
            parse_env(ENV_MAX_RETRIES, lookup(ENV_MAX_RETRIES), |s| s.parse().ok()),
            DEFAULT_MAX_RETRIES,
        );
        Self::new(base_url, api_key, timeout, max_retries)
    }

    /// Resolve options against the process environment.
    pub fn from_env(options: ClientOptions) -> Self {
        Self::resolve(options, |key| std::env::var(key).ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// First present value wins.
pub fn resolve_setting<T>(explicit: Option<T>, env: Option<T>, default: T) -> T {
    explicit.or(env).unwrap_or(default)
}

fn parse_env<T>(key: &str, raw: Option<String>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = raw?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring unparseable environment override");
    }
    parsed
}

fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::resolve(ClientOptions::new(), env(&[]));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), "");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 3);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::resolve(
            ClientOptions::new(),
            env(&[
                (ENV_API_KEY, "dk_env"),
                (ENV_BASE_URL, "https://staging.danubeai.com/"),
                (ENV_TIMEOUT, "2.5"),
                (ENV_MAX_RETRIES, "0"),
            ]),
        );
        assert_eq!(config.api_key(), "dk_env");
        assert_eq!(config.base_url(), "https://staging.danubeai.com");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn explicit_options_beat_environment() {
        let options = ClientOptions::new()
            .with_api_key("dk_explicit")
            .with_base_url("http://localhost:8000//")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);
        let config = Config::resolve(
            options,
            env(&[(ENV_API_KEY, "dk_env"), (ENV_MAX_RETRIES, "9")]),
        );
        assert_eq!(config.api_key(), "dk_explicit");
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.max_retries(), 1);
    }

    #[test]
    fn malformed_overrides_fall_back_to_defaults() {
        let config = Config::resolve(
            ClientOptions::new(),
            env(&[(ENV_TIMEOUT, "soon"), (ENV_MAX_RETRIES, "-1")]),
        );
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn debug_hides_the_credential() {
        let config = Config::new(DEFAULT_BASE_URL, "dk_secret", DEFAULT_TIMEOUT, 3);
        assert!(!format!("{config:?}").contains("dk_secret"));
    }
}

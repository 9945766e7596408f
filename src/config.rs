//! Environment configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

fn parse_number<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", key, v))),
        None => Ok(default),
    }
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Room for a full batch of phone photos
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base address of the captioning/story API, always ending in `/`
    pub api_host: String,
    /// Enables PDF export when set
    pub pdf_render_url: Option<String>,
    pub bind_addr: String,
    /// Request body limit for one image batch
    pub max_upload_bytes: usize,
    /// Sessions untouched for longer than this are dropped
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut api_host = get("API_HOST")
            .ok_or_else(|| AppError::Config("API_HOST must be set".to_string()))?;
        if !api_host.ends_with('/') {
            api_host.push('/');
        }

        Ok(Self {
            api_host,
            pdf_render_url: get("PDF_RENDER_URL"),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_upload_bytes: parse_number(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            session_idle: Duration::from_secs(parse_number(
                "SESSION_IDLE_SECS",
                get("SESSION_IDLE_SECS"),
                DEFAULT_SESSION_IDLE_SECS,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_api_host_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_lookup(lookup(&[("API_HOST", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn api_host_gets_trailing_slash() {
        let config = Config::from_lookup(lookup(&[("API_HOST", "http://api:8000")])).unwrap();
        assert_eq!(config.api_host, "http://api:8000/");

        let config = Config::from_lookup(lookup(&[("API_HOST", "http://api:8000/")])).unwrap();
        assert_eq!(config.api_host, "http://api:8000/");
    }

    #[test]
    fn optional_values_default() {
        let config = Config::from_lookup(lookup(&[("API_HOST", "http://api/")])).unwrap();
        assert_eq!(config.pdf_render_url, None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.session_idle, Duration::from_secs(DEFAULT_SESSION_IDLE_SECS));

        let config = Config::from_lookup(lookup(&[
            ("API_HOST", "http://api/"),
            ("PDF_RENDER_URL", "http://pdf/render"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("MAX_UPLOAD_BYTES", "1048576"),
            ("SESSION_IDLE_SECS", "300"),
        ]))
        .unwrap();
        assert_eq!(config.pdf_render_url.as_deref(), Some("http://pdf/render"));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.session_idle, Duration::from_secs(300));
    }

    #[test]
    fn non_numeric_limits_are_fatal() {
        let err = Config::from_lookup(lookup(&[
            ("API_HOST", "http://api/"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

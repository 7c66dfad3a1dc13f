use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAPILLARY_BASE_URL: &str = "https://graph.mapillary.com";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Imagery provider
    pub mapillary_access_token: Option<String>,
    pub mapillary_base_url: String,
    pub provider_timeout: Duration,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // CORS
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    ///
    /// A missing access token is not an error here: every image request
    /// reports it instead, so the server still starts and answers 500s.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            mapillary_access_token: env::var("MAPILLARY_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            mapillary_base_url: env::var("MAPILLARY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MAPILLARY_BASE_URL.to_string()),
            provider_timeout: Duration::from_secs(
                env::var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_PROVIDER_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("WEB_PORT must be a number")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }

    /// Config for tests and local tooling: no token, default provider.
    pub fn for_provider(token: Option<String>, base_url: &str) -> Self {
        Self {
            mapillary_access_token: token,
            mapillary_base_url: base_url.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test ,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn provider_config_defaults() {
        let config = Config::for_provider(None, "http://localhost:1");
        assert!(config.mapillary_access_token.is_none());
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
    }
}

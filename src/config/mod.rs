//! Configuration module for the notice board client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use crate::errors::ClientError;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the notice board server, without the `/api` suffix
    pub api_url: String,
    /// Bearer token for an existing session
    pub token: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Plain text or JSON log lines
    pub log_format: LogFormat,
    /// How long to wait for a TCP connection before reporting a network failure
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            token: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_url = env::var("NOTICEBOARD_API_URL").unwrap_or(defaults.api_url);
        let api_url = normalize_api_url(&api_url)?;

        let token = env::var("NOTICEBOARD_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let log_level = env::var("NOTICEBOARD_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("NOTICEBOARD_LOG_FORMAT") {
            Ok(value) => parse_log_format(&value)?,
            Err(_) => defaults.log_format,
        };

        let connect_timeout = match env::var("NOTICEBOARD_CONNECT_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    ClientError::Config(format!(
                        "Invalid NOTICEBOARD_CONNECT_TIMEOUT_SECS value: {}",
                        value
                    ))
                })?,
            Err(_) => defaults.connect_timeout,
        };

        Ok(Self {
            api_url,
            token,
            log_level,
            log_format,
            connect_timeout,
        })
    }
}

/// Validate the server URL and strip trailing slashes.
pub fn normalize_api_url(raw: &str) -> Result<String, ClientError> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| ClientError::Config(format!("Invalid NOTICEBOARD_API_URL {}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ClientError::Config(format!(
            "NOTICEBOARD_API_URL must be http or https, got {}",
            url.scheme()
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_log_format(value: &str) -> Result<LogFormat, ClientError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ClientError::Config(format!(
            "Invalid NOTICEBOARD_LOG_FORMAT value: {}",
            other
        ))),
    }
}

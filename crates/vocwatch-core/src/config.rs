use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. No variable is strictly
/// required: every setting has a default or is optional.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let data_path = PathBuf::from(or_default("VOCWATCH_DATA_PATH", "./data/mentions.csv"));
    let terms_path = PathBuf::from(or_default("VOCWATCH_TERMS_PATH", "./config/terms.yaml"));
    let log_level = or_default("VOCWATCH_LOG_LEVEL", "info");

    let youtube_api_key = lookup("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());
    let slack_webhook_urls = lookup("SLACK_WEBHOOK_URLS")
        .map(|raw| split_webhook_urls(&raw))
        .unwrap_or_default();
    let dashboard_url = lookup("VOCWATCH_DASHBOARD_URL")
        .ok()
        .filter(|u| !u.is_empty());

    let request_timeout_secs = parse_u64("VOCWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "VOCWATCH_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    );
    let inter_request_delay_ms = parse_u64("VOCWATCH_INTER_REQUEST_DELAY_MS", "2000")?;
    let max_retries = parse_u32("VOCWATCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("VOCWATCH_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        data_path,
        terms_path,
        log_level,
        youtube_api_key,
        slack_webhook_urls,
        dashboard_url,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Split a comma-separated webhook list, trimming whitespace and dropping
/// empty segments.
fn split_webhook_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

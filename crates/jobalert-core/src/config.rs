use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, DetailSourceKind, Environment, SmtpCredentials};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("JOBALERT_ENV", "development"))?;
    let log_level = or_default("JOBALERT_LOG_LEVEL", env.default_log_level());

    let ledger_path = PathBuf::from(or_default("JOBALERT_LEDGER_PATH", "./seen_jobs.txt"));
    let skills_path = optional("JOBALERT_SKILLS_PATH").map(PathBuf::from);

    let webdriver_url = or_default("JOBALERT_WEBDRIVER_URL", "http://localhost:4444");
    let search_base_url = or_default(
        "JOBALERT_SEARCH_BASE_URL",
        "https://www.linkedin.com/jobs/search/",
    );
    let max_postings: usize = parse_var(
        &or_default("JOBALERT_MAX_POSTINGS", "25"),
        "JOBALERT_MAX_POSTINGS",
    )?;
    let page_settle_secs = parse_var(
        &or_default("JOBALERT_PAGE_SETTLE_SECS", "5"),
        "JOBALERT_PAGE_SETTLE_SECS",
    )?;
    let scroll_pause_secs = parse_var(
        &or_default("JOBALERT_SCROLL_PAUSE_SECS", "3"),
        "JOBALERT_SCROLL_PAUSE_SECS",
    )?;
    let scroll_max_attempts = parse_var(
        &or_default("JOBALERT_SCROLL_MAX_ATTEMPTS", "50"),
        "JOBALERT_SCROLL_MAX_ATTEMPTS",
    )?;
    let detail_settle_secs = parse_var(
        &or_default("JOBALERT_DETAIL_SETTLE_SECS", "2"),
        "JOBALERT_DETAIL_SETTLE_SECS",
    )?;
    let detail_source = parse_detail_source(&or_default("JOBALERT_DETAIL_SOURCE", "browser"))?;
    let subscriber_delay_secs = parse_var(
        &or_default("JOBALERT_SUBSCRIBER_DELAY_SECS", "10"),
        "JOBALERT_SUBSCRIBER_DELAY_SECS",
    )?;

    let http_timeout_secs = parse_var(
        &or_default("JOBALERT_HTTP_TIMEOUT_SECS", "30"),
        "JOBALERT_HTTP_TIMEOUT_SECS",
    )?;
    let http_user_agent = or_default("JOBALERT_HTTP_USER_AGENT", "jobalert/0.1 (job-digest)");
    let http_max_retries = parse_var(
        &or_default("JOBALERT_HTTP_MAX_RETRIES", "2"),
        "JOBALERT_HTTP_MAX_RETRIES",
    )?;
    let http_retry_backoff_base_secs = parse_var(
        &or_default("JOBALERT_HTTP_RETRY_BACKOFF_BASE_SECS", "2"),
        "JOBALERT_HTTP_RETRY_BACKOFF_BASE_SECS",
    )?;

    // Both halves or neither: a sender without a password cannot authenticate.
    let smtp = match (optional("SENDER_EMAIL"), optional("EMAIL_PASSWORD")) {
        (Some(sender_email), Some(password)) => Some(SmtpCredentials {
            sender_email,
            password,
        }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::MissingEnvVar("EMAIL_PASSWORD".to_string())),
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar("SENDER_EMAIL".to_string())),
    };
    let smtp_host = or_default("JOBALERT_SMTP_HOST", "smtp.gmail.com");
    let smtp_port = parse_var(&or_default("JOBALERT_SMTP_PORT", "587"), "JOBALERT_SMTP_PORT")?;
    let schedule = or_default("JOBALERT_SCHEDULE", "0 0 8 * * *");

    let db_max_connections = parse_var(
        &or_default("JOBALERT_DB_MAX_CONNECTIONS", "5"),
        "JOBALERT_DB_MAX_CONNECTIONS",
    )?;
    let db_min_connections = parse_var(
        &or_default("JOBALERT_DB_MIN_CONNECTIONS", "1"),
        "JOBALERT_DB_MIN_CONNECTIONS",
    )?;
    let db_acquire_timeout_secs = parse_var(
        &or_default("JOBALERT_DB_ACQUIRE_TIMEOUT_SECS", "10"),
        "JOBALERT_DB_ACQUIRE_TIMEOUT_SECS",
    )?;

    if max_postings == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "JOBALERT_MAX_POSTINGS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        ledger_path,
        skills_path,
        webdriver_url,
        search_base_url,
        max_postings,
        page_settle_secs,
        scroll_pause_secs,
        scroll_max_attempts,
        detail_settle_secs,
        detail_source,
        subscriber_delay_secs,
        http_timeout_secs,
        http_user_agent,
        http_max_retries,
        http_retry_backoff_base_secs,
        smtp,
        smtp_host,
        smtp_port,
        schedule,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_var<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JOBALERT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_detail_source(s: &str) -> Result<DetailSourceKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "browser" => Ok(DetailSourceKind::Browser),
        "http" => Ok(DetailSourceKind::Http),
        other => Err(ConfigError::InvalidEnvVar {
            var: "JOBALERT_DETAIL_SOURCE".to_string(),
            reason: format!("expected 'browser' or 'http', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

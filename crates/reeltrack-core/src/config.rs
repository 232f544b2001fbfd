use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_APIFY_ACTOR_ID: &str = "apify/instagram-reel-scraper";
pub const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com";

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns [`ConfigError`] if a required variable is missing or a value is invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("REELTRACK_ENV", "development"));

    let bind_addr = or_default("REELTRACK_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("REELTRACK_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("REELTRACK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("REELTRACK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("REELTRACK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("REELTRACK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let daily_run_hour = parse_u32("DAILY_RUN_HOUR", "9")?;
    if daily_run_hour > 23 {
        return Err(invalid(
            "DAILY_RUN_HOUR",
            format!("hour must be between 0 and 23, got {daily_run_hour}"),
        ));
    }

    let enable_internal_scheduler = parse_flag(&or_default("ENABLE_INTERNAL_SCHEDULER", "1"));
    let manual_poll_enabled = parse_flag(&or_default("MANUAL_POLL_ENABLED", "1"));
    let cron_secret = optional("CRON_SECRET");

    let apify_token = optional("APIFY_TOKEN");
    let apify_actor_id =
        optional("APIFY_ACTOR_ID").unwrap_or_else(|| DEFAULT_APIFY_ACTOR_ID.to_string());
    let apify_base_url =
        optional("APIFY_BASE_URL").unwrap_or_else(|| DEFAULT_APIFY_BASE_URL.to_string());
    let apify_timeout_secs = parse_u64("APIFY_TIMEOUT_SECS", "120")?;
    let apify_max_concurrent_runs = parse_usize("APIFY_MAX_CONCURRENT_RUNS", "1")?.max(1);
    let poll_batch_size = parse_usize("POLL_BATCH_SIZE", "5")?.max(1);
    let fetch_retry_count = parse_u32("FETCH_RETRY_COUNT", "2")?.max(1);

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        daily_run_hour,
        enable_internal_scheduler,
        manual_poll_enabled,
        cron_secret,
        apify_token,
        apify_actor_id,
        apify_base_url,
        apify_timeout_secs,
        apify_max_concurrent_runs,
        poll_batch_size,
        fetch_retry_count,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// `1`, `true` and `yes` switch a feature on; anything else switches it off.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

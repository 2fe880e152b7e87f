use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses `var` into `T`, falling back to `default` when the variable is unset.
fn parse_or_default<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let at_least_one = |var: &str, value: u64| -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    };

    let env = parse_environment(&or_default("RANKGRID_ENV", "development"));
    let bind_addr = parse_or_default(&lookup, "RANKGRID_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RANKGRID_LOG_LEVEL", "info");
    let serper_api_key = optional("SERPER_API_KEY");
    let search_base_url = or_default("RANKGRID_SEARCH_BASE_URL", "https://google.serper.dev");
    let search_timeout_secs = parse_or_default(&lookup, "RANKGRID_SEARCH_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RANKGRID_USER_AGENT", "rankgrid/0.1 (rank-tracking)");
    let default_country = or_default("RANKGRID_DEFAULT_COUNTRY", "us");
    let default_language = or_default("RANKGRID_DEFAULT_LANGUAGE", "en");

    let max_pages: u32 = parse_or_default(&lookup, "RANKGRID_MAX_PAGES", "5")?;
    at_least_one("RANKGRID_MAX_PAGES", u64::from(max_pages))?;
    let batch_size: usize = parse_or_default(&lookup, "RANKGRID_BATCH_SIZE", "5")?;
    at_least_one("RANKGRID_BATCH_SIZE", batch_size as u64)?;
    let batch_delay_ms = parse_or_default(&lookup, "RANKGRID_BATCH_DELAY_MS", "200")?;
    let top_results_limit = parse_or_default(&lookup, "RANKGRID_TOP_RESULTS_LIMIT", "20")?;
    let places_zoom = parse_or_default(&lookup, "RANKGRID_PLACES_ZOOM", "14")?;

    let geocoder_base_url = or_default(
        "RANKGRID_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_cache_capacity: usize =
        parse_or_default(&lookup, "RANKGRID_GEOCODER_CACHE_CAPACITY", "500")?;
    at_least_one(
        "RANKGRID_GEOCODER_CACHE_CAPACITY",
        geocoder_cache_capacity as u64,
    )?;

    let usage_credits = match optional("RANKGRID_USAGE_CREDITS") {
        Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "RANKGRID_USAGE_CREDITS".to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        serper_api_key,
        search_base_url,
        search_timeout_secs,
        user_agent,
        default_country,
        default_language,
        max_pages,
        batch_size,
        batch_delay_ms,
        top_results_limit,
        places_zoom,
        geocoder_base_url,
        geocoder_cache_capacity,
        usage_credits,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

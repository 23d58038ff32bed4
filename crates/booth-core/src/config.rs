use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_value::<u32>(var, &or_default(var, default))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value::<u64>(var, &or_default(var, default))
    };

    let parse_money = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let amount = parse_value::<Decimal>(var, &or_default(var, default))?;
        if amount.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(amount)
    };

    let api_url = require("BOOTH_API_URL")?;
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BOOTH_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_url}'"),
        });
    }
    let asset_url = or_default("BOOTH_ASSET_URL", &api_url);

    let env = parse_environment(&or_default("BOOTH_ENV", "development"))?;
    let log_level = or_default("BOOTH_LOG_LEVEL", "info");
    let api_token = lookup("BOOTH_API_TOKEN").ok().filter(|t| !t.is_empty());

    let request_timeout_secs = parse_u64("BOOTH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BOOTH_USER_AGENT", "booth/0.1 (storefront)");
    let max_retries = parse_u32("BOOTH_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("BOOTH_RETRY_BACKOFF_BASE_MS", "500")?;

    let page_size = parse_u32("BOOTH_PAGE_SIZE", "15")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BOOTH_PAGE_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let shipping_inside = parse_money("BOOTH_SHIPPING_INSIDE", "80")?;
    let shipping_outside = parse_money("BOOTH_SHIPPING_OUTSIDE", "150")?;
    let hub_city = or_default("BOOTH_HUB_CITY", "Dhaka");
    let session_path = PathBuf::from(or_default("BOOTH_SESSION_PATH", "./.booth/session.json"));

    Ok(AppConfig {
        api_url,
        asset_url,
        env,
        log_level,
        api_token,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        page_size,
        shipping_inside,
        shipping_outside,
        hub_city,
        session_path,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
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
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BOOTH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

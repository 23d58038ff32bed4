use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("BOOTH_API_URL", "https://api.example.com/api/v1");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BOOTH_ENV"));
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "BOOTH_API_URL"),
        "expected MissingEnvVar(BOOTH_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_api_url() {
    let mut map = full_env();
    map.insert("BOOTH_API_URL", "ftp://example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_API_URL"),
        "expected InvalidEnvVar(BOOTH_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_url, "https://api.example.com/api/v1");
    assert_eq!(cfg.asset_url, "https://api.example.com/api/v1");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.api_token.is_none());
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "booth/0.1 (storefront)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.page_size, 15);
    assert_eq!(cfg.shipping_inside, Decimal::from(80));
    assert_eq!(cfg.shipping_outside, Decimal::from(150));
    assert_eq!(cfg.hub_city, "Dhaka");
    assert_eq!(cfg.session_path, PathBuf::from("./.booth/session.json"));
}

#[test]
fn asset_url_override() {
    let mut map = full_env();
    map.insert("BOOTH_ASSET_URL", "https://shop.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.asset_url, "https://shop.example.com");
}

#[test]
fn empty_api_token_is_treated_as_absent() {
    let mut map = full_env();
    map.insert("BOOTH_API_TOKEN", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_token.is_none());
}

#[test]
fn debug_output_redacts_api_token() {
    let mut map = full_env();
    map.insert("BOOTH_API_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"), "token leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn request_timeout_override() {
    let mut map = full_env();
    map.insert("BOOTH_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("BOOTH_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BOOTH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("BOOTH_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_MAX_RETRIES"),
        "expected InvalidEnvVar(BOOTH_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn zero_page_size_rejected() {
    let mut map = full_env();
    map.insert("BOOTH_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_PAGE_SIZE"),
        "expected InvalidEnvVar(BOOTH_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn shipping_rates_override() {
    let mut map = full_env();
    map.insert("BOOTH_SHIPPING_INSIDE", "60.50");
    map.insert("BOOTH_SHIPPING_OUTSIDE", "120");
    map.insert("BOOTH_HUB_CITY", "Chattogram");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rates = cfg.shipping_rates();
    assert_eq!(rates.inside, Decimal::new(6050, 2));
    assert_eq!(rates.outside, Decimal::from(120));
    assert_eq!(rates.hub_city, "Chattogram");
}

#[test]
fn negative_shipping_rate_rejected() {
    let mut map = full_env();
    map.insert("BOOTH_SHIPPING_OUTSIDE", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_SHIPPING_OUTSIDE"),
        "expected InvalidEnvVar(BOOTH_SHIPPING_OUTSIDE), got: {result:?}"
    );
}

#[test]
fn unknown_env_rejected() {
    let mut map = full_env();
    map.insert("BOOTH_ENV", "qa");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BOOTH_ENV"),
        "expected InvalidEnvVar(BOOTH_ENV), got: {result:?}"
    );
}

use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    /// Base URL the static `/data/*.json` location documents are served from.
    pub asset_url: String,
    pub env: Environment,
    pub log_level: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub page_size: u32,
    pub shipping_inside: Decimal,
    pub shipping_outside: Decimal,
    pub hub_city: String,
    pub session_path: PathBuf,
}

impl AppConfig {
    /// Shipping rates as configured, ready for [`crate::derive_summary`].
    #[must_use]
    pub fn shipping_rates(&self) -> crate::ShippingRates {
        crate::ShippingRates {
            inside: self.shipping_inside,
            outside: self.shipping_outside,
            hub_city: self.hub_city.clone(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("asset_url", &self.asset_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("page_size", &self.page_size)
            .field("shipping_inside", &self.shipping_inside)
            .field("shipping_outside", &self.shipping_outside)
            .field("hub_city", &self.hub_city)
            .field("session_path", &self.session_path)
            .finish()
    }
}

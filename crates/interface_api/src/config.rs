//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Tax rate applied when a generation request does not carry one
    pub default_tax_rate: Decimal,
    /// Base URL used to build pay-links in notifications
    pub app_base_url: String,
    /// Seconds between notification sweep runs
    pub sweep_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/billing".to_string(),
            log_level: "info".to_string(),
            default_tax_rate: Decimal::new(15, 2), // 0.15
            app_base_url: "http://localhost:3000".to_string(),
            sweep_interval_secs: 3600,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment variables with the `API_` prefix
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Builds configuration from individual environment variables, falling
    /// back to defaults for anything unset
    pub fn from_individual_vars() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            default_tax_rate: std::env::var("INVOICE_TAX_RATE")
                .ok()
                .and_then(|r| Decimal::from_str(&r).ok())
                .unwrap_or(defaults.default_tax_rate),
            app_base_url: std::env::var("APP_BASE_URL").unwrap_or(defaults.app_base_url),
            sweep_interval_secs: std::env::var("API_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sweep_interval_secs),
        }
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_tax_rate_is_fifteen_percent() {
        let config = ApiConfig::default();
        assert_eq!(config.default_tax_rate, dec!(0.15));
    }

    #[test]
    fn test_server_addr() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}

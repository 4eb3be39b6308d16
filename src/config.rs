//! Runtime configuration, read once from the environment at startup.
//!
//! | variable                          | default                  |
//! |-----------------------------------|--------------------------|
//! | `STOREFRONT_BIND`                 | `0.0.0.0:5000`           |
//! | `STRIPE_SECRET_KEY`               | unset (cards disabled)   |
//! | `STRIPE_PUBLISHABLE_KEY`          | `VITE_STRIPE_PUBLIC_KEY` |
//! | `STRIPE_WEBHOOK_SECRET`           | unset (no signature check) |
//! | `STRIPE_API_BASE`                 | `https://api.stripe.com` |
//! | `STOREFRONT_CURRENCY`             | `kes`                    |
//! | `STOREFRONT_PROVIDER_TIMEOUT_MS`  | `10000`                  |
//! | `STOREFRONT_STORE_TIMEOUT_MS`     | `5000`                   |
//! | `STOREFRONT_PROVIDER_RETRIES`     | `3`                      |
//! | `STOREFRONT_PROVIDER_BACKOFF_MS`  | `200`                    |
//! | `STOREFRONT_SEED_CATALOG`         | `true`                   |
//!
//! Blank values are treated as unset.

use crate::payments::{stripe::DEFAULT_API_BASE, RetryPolicy};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub bind: SocketAddr,
    pub stripe_secret_key: Option<String>,
    pub stripe_publishable_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_api_base: String,
    pub currency: String,
    pub provider_timeout: Duration,
    pub store_timeout: Duration,
    pub provider_retry: RetryPolicy,
    pub seed_catalog: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            stripe_secret_key: None,
            stripe_publishable_key: None,
            stripe_webhook_secret: None,
            stripe_api_base: DEFAULT_API_BASE.to_string(),
            currency: "kes".to_string(),
            provider_timeout: Duration::from_secs(10),
            store_timeout: crate::framework::DEFAULT_REQUEST_TIMEOUT,
            provider_retry: RetryPolicy::default(),
            seed_catalog: true,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and by tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let bind = match get("STOREFRONT_BIND") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: "STOREFRONT_BIND",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.bind,
        };

        Ok(Self {
            bind,
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            stripe_publishable_key: get("STRIPE_PUBLISHABLE_KEY")
                .or_else(|| get("VITE_STRIPE_PUBLIC_KEY")),
            stripe_webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
            stripe_api_base: get("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            currency: get("STOREFRONT_CURRENCY")
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or(defaults.currency),
            provider_timeout: millis(&get, "STOREFRONT_PROVIDER_TIMEOUT_MS")?
                .unwrap_or(defaults.provider_timeout),
            store_timeout: millis(&get, "STOREFRONT_STORE_TIMEOUT_MS")?
                .unwrap_or(defaults.store_timeout),
            provider_retry: RetryPolicy {
                max_attempts: number(&get, "STOREFRONT_PROVIDER_RETRIES")?
                    .map(|n| n as usize)
                    .unwrap_or(defaults.provider_retry.max_attempts),
                base_backoff_ms: number(&get, "STOREFRONT_PROVIDER_BACKOFF_MS")?
                    .unwrap_or(defaults.provider_retry.base_backoff_ms),
            },
            seed_catalog: flag(&get, "STOREFRONT_SEED_CATALOG")?.unwrap_or(defaults.seed_catalog),
        })
    }
}

fn number(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    get(key)
        .map(|raw| {
            raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn millis(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match number(get, key)? {
        Some(0) => Err(ConfigError::InvalidValue {
            key,
            value: "0".into(),
            reason: "must be positive".into(),
        }),
        other => Ok(other.map(Duration::from_millis)),
    }
}

fn flag(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    get(key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: "expected a boolean".into(),
            }),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind.port(), 5000);
        assert_eq!(config.currency, "kes");
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert_eq!(config.provider_retry, RetryPolicy::default());
        assert!(config.stripe_secret_key.is_none());
        assert!(config.seed_catalog);
    }

    #[test]
    fn test_blank_secret_counts_as_unset() {
        let config = load(&[("STRIPE_SECRET_KEY", "   ")]).unwrap();
        assert!(config.stripe_secret_key.is_none());
    }

    #[test]
    fn test_publishable_key_falls_back_to_vite_name() {
        let config = load(&[("VITE_STRIPE_PUBLIC_KEY", "pk_test_1")]).unwrap();
        assert_eq!(config.stripe_publishable_key.as_deref(), Some("pk_test_1"));

        let config = load(&[
            ("VITE_STRIPE_PUBLIC_KEY", "pk_test_1"),
            ("STRIPE_PUBLISHABLE_KEY", "pk_test_2"),
        ])
        .unwrap();
        assert_eq!(config.stripe_publishable_key.as_deref(), Some("pk_test_2"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = load(&[("STOREFRONT_BIND", "not-an-address")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "STOREFRONT_BIND", .. }));

        let err = load(&[("STOREFRONT_PROVIDER_TIMEOUT_MS", "0")]).unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = load(&[("STOREFRONT_SEED_CATALOG", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_SEED_CATALOG"));
    }
}

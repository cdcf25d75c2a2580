//! Common utilities shared across examples.

#![allow(dead_code)]

use brcode_payload::MerchantConfig;
use std::env;

/// Payee key used when `PIX_KEY` is not set.
pub const DEFAULT_KEY: &str = "92113026000164";

/// Merchant name used when `PIX_NAME` is not set.
pub const DEFAULT_NAME: &str = "Prodasiq Sistemas";

/// Merchant city used when `PIX_CITY` is not set.
pub const DEFAULT_CITY: &str = "PORTO ALEGRE";

/// Loads the merchant from `PIX_*` environment variables, falling back to
/// the demo merchant for anything unset.
pub fn merchant_config() -> anyhow::Result<MerchantConfig> {
    let config = MerchantConfig::from_lookup(|name| {
        env::var(name).ok().or_else(|| {
            match name {
                "PIX_KEY" => Some(DEFAULT_KEY),
                "PIX_NAME" => Some(DEFAULT_NAME),
                "PIX_CITY" => Some(DEFAULT_CITY),
                _ => None,
            }
            .map(str::to_string)
        })
    })?;
    Ok(config)
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

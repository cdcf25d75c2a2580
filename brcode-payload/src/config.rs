/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Merchant configuration.
//!
//! This module provides the merchant identity and the fixed codes written
//! into every payload. Nothing here is process-global: each
//! [`PayloadBuilder`](crate::payload::PayloadBuilder) owns its configuration.

use brcode_core::error::{BrCodeError, ConfigError};
use brcode_core::types::{MerchantIdentity, PointOfInitiation};
use serde::{Deserialize, Serialize};
use std::env;

/// Globally unique identifier of the Pix domain.
pub const PIX_GUI: &str = "br.gov.bcb.pix";

/// Merchant category code used when none is configured.
pub const DEFAULT_MCC: &str = "0000";

/// ISO 4217 numeric code of the Brazilian Real.
pub const CURRENCY_BRL: &str = "986";

/// ISO 3166-1 alpha-2 code of Brazil.
pub const COUNTRY_BR: &str = "BR";

/// Reference label used when the payer app should not expect a transaction id.
pub const DEFAULT_REFERENCE_LABEL: &str = "***";

/// Maximum reference label length.
pub const REFERENCE_LABEL_MAX_LEN: usize = 25;

/// Environment variable holding the payee key.
pub const ENV_KEY: &str = "PIX_KEY";
/// Environment variable holding the merchant name.
pub const ENV_NAME: &str = "PIX_NAME";
/// Environment variable holding the merchant city.
pub const ENV_CITY: &str = "PIX_CITY";
/// Optional environment variable holding the merchant category code.
pub const ENV_MCC: &str = "PIX_MCC";
/// Optional environment variable holding the reference label.
pub const ENV_REFERENCE_LABEL: &str = "PIX_REFERENCE_LABEL";

/// Configuration for a merchant issuing Pix codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantConfig {
    /// Payee key, name, and city.
    pub identity: MerchantIdentity,
    /// Merchant category code (tag 52), four digits.
    pub merchant_category_code: String,
    /// Transaction currency (tag 53), three digits.
    pub currency: String,
    /// Country code (tag 58), two uppercase letters.
    pub country_code: String,
    /// Reference label (tag 62, sub-field 05).
    pub reference_label: String,
    /// Point of initiation method (tag 01).
    pub point_of_initiation: PointOfInitiation,
}

impl MerchantConfig {
    /// Creates a new configuration with the default codes.
    ///
    /// # Arguments
    /// * `identity` - The merchant identity
    #[must_use]
    pub fn new(identity: MerchantIdentity) -> Self {
        Self {
            identity,
            merchant_category_code: DEFAULT_MCC.to_string(),
            currency: CURRENCY_BRL.to_string(),
            country_code: COUNTRY_BR.to_string(),
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
            point_of_initiation: PointOfInitiation::default(),
        }
    }

    /// Loads the configuration from `PIX_*` environment variables.
    ///
    /// # Errors
    /// Returns `BrCodeError::Config` if a required variable is missing, or
    /// the encode error of an invalid value.
    pub fn from_env() -> Result<Self, BrCodeError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    /// See [`MerchantConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BrCodeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing(name.to_string()))
        };

        let identity = MerchantIdentity::new(
            required(ENV_KEY)?.trim(),
            required(ENV_NAME)?.trim(),
            required(ENV_CITY)?.trim(),
        )?;

        let mut config = Self::new(identity);
        if let Some(mcc) = lookup(ENV_MCC) {
            config.merchant_category_code = mcc.trim().to_string();
        }
        if let Some(label) = lookup(ENV_REFERENCE_LABEL) {
            config.reference_label = label.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the merchant category code.
    #[must_use]
    pub fn with_merchant_category_code(mut self, mcc: impl Into<String>) -> Self {
        self.merchant_category_code = mcc.into();
        self
    }

    /// Sets the reference label.
    #[must_use]
    pub fn with_reference_label(mut self, label: impl Into<String>) -> Self {
        self.reference_label = label.into();
        self
    }

    /// Sets the point of initiation method.
    #[must_use]
    pub const fn with_point_of_initiation(mut self, poi: PointOfInitiation) -> Self {
        self.point_of_initiation = poi;
        self
    }

    /// Checks the fixed codes.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "merchant_category_code",
            &self.merchant_category_code,
            |s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()),
            "expected 4 digits",
        )?;
        check(
            "currency",
            &self.currency,
            |s| s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit()),
            "expected 3 digits",
        )?;
        check(
            "country_code",
            &self.country_code,
            |s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_uppercase()),
            "expected 2 uppercase letters",
        )?;
        check(
            "reference_label",
            &self.reference_label,
            |s| {
                s == DEFAULT_REFERENCE_LABEL
                    || (!s.is_empty()
                        && s.len() <= REFERENCE_LABEL_MAX_LEN
                        && s.bytes().all(|b| b.is_ascii_alphanumeric()))
            },
            "expected *** or up to 25 letters and digits",
        )
    }
}

fn check<F>(name: &str, value: &str, ok: F, reason: &str) -> Result<(), ConfigError>
where
    F: Fn(&str) -> bool,
{
    if ok(value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("{reason}, got '{value}'"),
        })
    }
}

/// Builder for merchant configuration.
#[derive(Debug, Default)]
pub struct MerchantConfigBuilder {
    key: Option<String>,
    name: Option<String>,
    city: Option<String>,
    merchant_category_code: Option<String>,
    reference_label: Option<String>,
    point_of_initiation: Option<PointOfInitiation>,
}

impl MerchantConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payee key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the merchant name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the merchant city.
    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the merchant category code.
    #[must_use]
    pub fn merchant_category_code(mut self, mcc: impl Into<String>) -> Self {
        self.merchant_category_code = Some(mcc.into());
        self
    }

    /// Sets the reference label.
    #[must_use]
    pub fn reference_label(mut self, label: impl Into<String>) -> Self {
        self.reference_label = Some(label.into());
        self
    }

    /// Sets the point of initiation method.
    #[must_use]
    pub const fn point_of_initiation(mut self, poi: PointOfInitiation) -> Self {
        self.point_of_initiation = Some(poi);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` if key, name, or city is not set, and
    /// validation errors for invalid values.
    pub fn build(self) -> Result<MerchantConfig, BrCodeError> {
        let key = self.key.ok_or_else(|| ConfigError::Missing("key".to_string()))?;
        let name = self
            .name
            .ok_or_else(|| ConfigError::Missing("name".to_string()))?;
        let city = self
            .city
            .ok_or_else(|| ConfigError::Missing("city".to_string()))?;

        let mut config = MerchantConfig::new(MerchantIdentity::new(&key, &name, &city)?);
        if let Some(mcc) = self.merchant_category_code {
            config.merchant_category_code = mcc;
        }
        if let Some(label) = self.reference_label {
            config.reference_label = label;
        }
        if let Some(poi) = self.point_of_initiation {
            config.point_of_initiation = poi;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brcode_core::error::EncodeError;
    use std::collections::HashMap;

    fn identity() -> MerchantIdentity {
        MerchantIdentity::new("92113026000164", "Prodasiq Sistemas", "PORTO ALEGRE").unwrap()
    }

    #[test]
    fn test_merchant_config_new() {
        let config = MerchantConfig::new(identity());
        assert_eq!(config.merchant_category_code, "0000");
        assert_eq!(config.currency, "986");
        assert_eq!(config.country_code, "BR");
        assert_eq!(config.reference_label, "***");
        assert_eq!(config.point_of_initiation, PointOfInitiation::SingleUse);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merchant_config_invalid_mcc() {
        let config = MerchantConfig::new(identity()).with_merchant_category_code("12A4");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name, .. }) if name == "merchant_category_code"
        ));
    }

    #[test]
    fn test_merchant_config_reference_label() {
        let config = MerchantConfig::new(identity()).with_reference_label("PEDIDO42");
        assert!(config.validate().is_ok());

        let config = MerchantConfig::new(identity()).with_reference_label("PEDIDO 42");
        assert!(config.validate().is_err());

        let config = MerchantConfig::new(identity()).with_reference_label("A".repeat(26));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_KEY, "92113026000164"),
            (ENV_NAME, " Prodasiq Sistemas "),
            (ENV_CITY, "PORTO ALEGRE"),
            (ENV_MCC, "5734"),
        ]);
        let config = MerchantConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.identity.key.as_str(), "92113026000164");
        assert_eq!(config.identity.name.as_str(), "Prodasiq Sistemas");
        assert_eq!(config.merchant_category_code, "5734");
        assert_eq!(config.reference_label, "***");
    }

    #[test]
    fn test_from_lookup_missing() {
        let result = MerchantConfig::from_lookup(|name| {
            (name != ENV_CITY).then(|| "value".to_string())
        });
        assert_eq!(
            result.unwrap_err(),
            BrCodeError::Config(ConfigError::Missing("PIX_CITY".to_string()))
        );
    }

    #[test]
    fn test_from_lookup_blank_is_missing() {
        let result = MerchantConfig::from_lookup(|name| {
            Some(if name == ENV_KEY { "  " } else { "value" }.to_string())
        });
        assert_eq!(
            result.unwrap_err(),
            BrCodeError::Config(ConfigError::Missing("PIX_KEY".to_string()))
        );
    }

    #[test]
    fn test_builder() {
        let config = MerchantConfigBuilder::new()
            .key("92113026000164")
            .name("Prodasiq Sistemas")
            .city("PORTO ALEGRE")
            .merchant_category_code("5734")
            .point_of_initiation(PointOfInitiation::Reusable)
            .build()
            .unwrap();

        assert_eq!(config.identity, identity());
        assert_eq!(config.merchant_category_code, "5734");
        assert_eq!(config.point_of_initiation, PointOfInitiation::Reusable);
    }

    #[test]
    fn test_builder_missing_key() {
        let result = MerchantConfigBuilder::new()
            .name("Prodasiq Sistemas")
            .city("PORTO ALEGRE")
            .build();
        assert_eq!(
            result.unwrap_err(),
            BrCodeError::Config(ConfigError::Missing("key".to_string()))
        );
    }

    #[test]
    fn test_builder_invalid_name() {
        let result = MerchantConfigBuilder::new()
            .key("92113026000164")
            .name("")
            .city("PORTO ALEGRE")
            .build();
        assert_eq!(
            result.unwrap_err(),
            BrCodeError::Encode(EncodeError::EmptyValue { tag: 59 })
        );
    }
}

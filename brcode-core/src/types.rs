/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Core value types for Pix payloads.
//!
//! This module provides the validated values a payload is assembled from:
//! - [`PayeeKey`], [`MerchantName`], [`MerchantCity`]: Bounded text fields
//! - [`MerchantIdentity`]: The three of them together
//! - [`Amount`]: Non-negative amount with exactly two fractional digits
//! - [`PointOfInitiation`]: Value of the point-of-initiation field

use crate::error::EncodeError;
use crate::field::{MAX_VALUE_LEN, tags};
use arrayvec::ArrayString;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum payee key length in bytes.
///
/// The key shares the merchant account template with the 18-byte GUI
/// sub-field and its own 4-byte prefix, all under a 99-byte cap.
pub const PAYEE_KEY_MAX_LEN: usize = 77;

/// Conventional maximum merchant name length.
pub const MERCHANT_NAME_CONVENTIONAL_LEN: usize = 25;

/// Conventional maximum merchant city length.
pub const MERCHANT_CITY_CONVENTIONAL_LEN: usize = 15;

/// Maximum rendered length of the transaction amount field.
pub const AMOUNT_MAX_LEN: usize = 13;

/// Checks that `s` can be carried as the value of field `tag`.
fn validate_text(tag: u8, s: &str, max_len: usize) -> Result<(), EncodeError> {
    if s.is_empty() {
        return Err(EncodeError::EmptyValue { tag });
    }
    if s.len() > max_len {
        return Err(EncodeError::FieldTooLong {
            tag,
            length: s.len(),
            max_length: max_len,
        });
    }
    if let Some(c) = s.chars().find(|c| c.is_control()) {
        return Err(EncodeError::Encoding {
            tag,
            reason: format!("control character U+{:04X}", c as u32),
        });
    }
    Ok(())
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $cap:expr, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(ArrayString<{ $cap }>);

        impl $name {
            /// Creates a validated value.
            ///
            /// # Errors
            /// Returns `EncodeError` if the text is empty, too long, or
            /// contains control characters.
            pub fn new(s: &str) -> Result<Self, EncodeError> {
                validate_text($tag, s, $cap)?;
                ArrayString::from(s)
                    .map(Self)
                    .map_err(|_| EncodeError::FieldTooLong {
                        tag: $tag,
                        length: s.len(),
                        max_length: $cap,
                    })
            }

            /// Returns the value as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns the length in bytes.
            #[inline]
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Always false: empty values are rejected at construction.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EncodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = EncodeError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(&s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }
    };
}

bounded_text!(
    /// Pix key of the payee: tax id, phone, e-mail, or random key.
    PayeeKey,
    PAYEE_KEY_MAX_LEN,
    tags::account::KEY
);

bounded_text!(
    /// Merchant display name (tag 59).
    MerchantName,
    MAX_VALUE_LEN,
    tags::MERCHANT_NAME
);

bounded_text!(
    /// Merchant city (tag 60).
    MerchantCity,
    MAX_VALUE_LEN,
    tags::MERCHANT_CITY
);

impl MerchantName {
    /// Returns true if the name is longer than payer apps usually display.
    #[must_use]
    pub fn exceeds_convention(&self) -> bool {
        self.len() > MERCHANT_NAME_CONVENTIONAL_LEN
    }
}

impl MerchantCity {
    /// Returns true if the city is longer than payer apps usually display.
    #[must_use]
    pub fn exceeds_convention(&self) -> bool {
        self.len() > MERCHANT_CITY_CONVENTIONAL_LEN
    }
}

/// Identity of the receiving merchant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerchantIdentity {
    /// Pix key that receives the payment.
    pub key: PayeeKey,
    /// Display name.
    pub name: MerchantName,
    /// City.
    pub city: MerchantCity,
}

impl MerchantIdentity {
    /// Creates a merchant identity from raw strings.
    ///
    /// # Errors
    /// Returns `EncodeError` if any of the values is invalid.
    pub fn new(key: &str, name: &str, city: &str) -> Result<Self, EncodeError> {
        Ok(Self {
            key: PayeeKey::new(key)?,
            name: MerchantName::new(name)?,
            city: MerchantCity::new(city)?,
        })
    }
}

/// Transaction amount with exactly two fractional digits.
///
/// Amounts are never negative. Construction rounds half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount from a decimal value.
    ///
    /// The length cap is the EMV limit for tag 54, stricter than the 99 bytes
    /// a two-digit length prefix could declare: `9999999999.99` is the
    /// largest amount accepted.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAmount` if the value is negative and
    /// `EncodeError::FieldTooLong` if it renders to more than
    /// [`AMOUNT_MAX_LEN`] characters.
    pub fn new(value: Decimal) -> Result<Self, EncodeError> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(EncodeError::InvalidAmount {
                reason: format!("{value} is negative"),
            });
        }
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        let amount = Self(rounded);
        let length = amount.render_len();
        if length > AMOUNT_MAX_LEN {
            return Err(EncodeError::FieldTooLong {
                tag: tags::TRANSACTION_AMOUNT,
                length,
                max_length: AMOUNT_MAX_LEN,
            });
        }
        Ok(amount)
    }

    /// Creates an amount from a float.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAmount` for NaN, infinities, and
    /// negative values.
    pub fn from_f64(value: f64) -> Result<Self, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::InvalidAmount {
                reason: format!("{value} is not finite"),
            });
        }
        if value < 0.0 {
            return Err(EncodeError::InvalidAmount {
                reason: format!("{value} is negative"),
            });
        }
        let decimal = Decimal::from_f64(value).ok_or_else(|| EncodeError::InvalidAmount {
            reason: format!("{value} is out of range"),
        })?;
        Self::new(decimal)
    }

    /// Creates an amount from an integer number of cents.
    ///
    /// # Errors
    /// Returns `EncodeError::FieldTooLong` if the amount is too large.
    pub fn from_cents(cents: u64) -> Result<Self, EncodeError> {
        Self::new(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Splits the amount into `parts` equal shares, rounded to cents.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAmount` if `parts` is zero.
    pub fn split(self, parts: u32) -> Result<Self, EncodeError> {
        if parts == 0 {
            return Err(EncodeError::InvalidAmount {
                reason: "cannot split into zero parts".to_string(),
            });
        }
        Self::new(self.0 / Decimal::from(parts))
    }

    /// Renders the amount as the value of the transaction amount field.
    #[must_use]
    pub fn to_field_value(self) -> String {
        format!("{:.2}", self.0)
    }

    fn render_len(self) -> usize {
        self.to_field_value().len()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| EncodeError::InvalidAmount {
                reason: format!("'{trimmed}' is not a number"),
            })?;
        Self::new(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = EncodeError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Amount {
    type Error = EncodeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Point of initiation method (tag 01).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
pub enum PointOfInitiation {
    /// Code may be paid any number of times.
    Reusable = 11,
    /// Code is meant to be paid once.
    #[default]
    SingleUse = 12,
}

impl PointOfInitiation {
    /// Returns the two-digit field value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reusable => "11",
            Self::SingleUse => "12",
        }
    }
}

impl fmt::Display for PointOfInitiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_payee_key() {
        let key = PayeeKey::new("92113026000164").unwrap();
        assert_eq!(key.as_str(), "92113026000164");
        assert_eq!(key.len(), 14);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_payee_key_too_long() {
        let long_key = "k".repeat(PAYEE_KEY_MAX_LEN + 1);
        assert_eq!(
            PayeeKey::new(&long_key),
            Err(EncodeError::FieldTooLong {
                tag: tags::account::KEY,
                length: PAYEE_KEY_MAX_LEN + 1,
                max_length: PAYEE_KEY_MAX_LEN,
            })
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        assert_eq!(
            MerchantName::new(""),
            Err(EncodeError::EmptyValue {
                tag: tags::MERCHANT_NAME
            })
        );
    }

    #[test]
    fn test_control_character_rejected() {
        let err = MerchantCity::new("PORTO\nALEGRE").unwrap_err();
        assert!(matches!(err, EncodeError::Encoding { tag: 60, .. }));
    }

    #[test]
    fn test_name_length_counts_bytes() {
        // 50 two-byte characters: 100 bytes
        let name = "é".repeat(50);
        assert!(matches!(
            MerchantName::new(&name),
            Err(EncodeError::FieldTooLong { length: 100, .. })
        ));
    }

    #[test]
    fn test_name_convention() {
        let short = MerchantName::new("Prodasiq Sistemas").unwrap();
        assert!(!short.exceeds_convention());
        let long = MerchantName::new("Prodasiq Desenvolvimento de Sistemas").unwrap();
        assert!(long.exceeds_convention());
        let city = MerchantCity::new("PORTO ALEGRE").unwrap();
        assert!(!city.exceeds_convention());
    }

    #[test]
    fn test_amount_two_decimals() {
        assert_eq!(Amount::from_f64(10.0).unwrap().to_field_value(), "10.00");
        assert_eq!(Amount::from_f64(0.0).unwrap().to_field_value(), "0.00");
        assert_eq!("2.5".parse::<Amount>().unwrap().to_string(), "2.50");
        assert_eq!("1234.567".parse::<Amount>().unwrap().to_string(), "1234.57");
        assert_eq!("0.125".parse::<Amount>().unwrap().to_string(), "0.13");
    }

    #[test]
    fn test_amount_rejects_negative() {
        assert!(matches!(
            Amount::from_f64(-1.0),
            Err(EncodeError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "-0.01".parse::<Amount>(),
            Err(EncodeError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_amount_rejects_non_finite() {
        assert!(Amount::from_f64(f64::NAN).is_err());
        assert!(Amount::from_f64(f64::INFINITY).is_err());
        assert!(Amount::from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_amount_rejects_non_numeric() {
        assert!(matches!(
            "abc".parse::<Amount>(),
            Err(EncodeError::InvalidAmount { .. })
        ));
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn test_amount_negative_zero_is_zero() {
        let amount = Amount::from_f64(-0.0).unwrap();
        assert!(amount.is_zero());
        assert_eq!(amount.to_field_value(), "0.00");
    }

    #[test]
    fn test_amount_too_large() {
        assert!(matches!(
            "12345678901.00".parse::<Amount>(),
            Err(EncodeError::FieldTooLong { tag: 54, .. })
        ));
        assert!("1234567890.00".parse::<Amount>().is_ok());
        assert_eq!(
            "9999999999.99".parse::<Amount>().unwrap().to_field_value().len(),
            AMOUNT_MAX_LEN
        );
    }

    #[test]
    fn test_amount_split() {
        let total = "100.00".parse::<Amount>().unwrap();
        assert_eq!(total.split(4).unwrap().to_string(), "25.00");
        let odd = "10.05".parse::<Amount>().unwrap();
        assert_eq!(odd.split(4).unwrap().to_string(), "2.51");
        assert!(total.split(0).is_err());
    }

    #[test]
    fn test_amount_from_cents() {
        assert_eq!(Amount::from_cents(1999).unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_point_of_initiation() {
        assert_eq!(PointOfInitiation::default(), PointOfInitiation::SingleUse);
        assert_eq!(PointOfInitiation::Reusable.as_str(), "11");
        assert_eq!(
            PointOfInitiation::from_u8(12),
            Some(PointOfInitiation::SingleUse)
        );
        assert_eq!(PointOfInitiation::from_u8(13), None);
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Field types for EMV tag-length-value payloads.
//!
//! This module provides:
//! - [`FieldTag`]: Type-safe wrapper for two-digit field ids
//! - [`FieldRef`]: Zero-copy reference to a field within a payload buffer
//! - [`tags`]: The ids used by a static Pix payload
//!
//! Every field is rendered as `tag(2) length(2) value`, where the length is
//! the byte length of the value, zero-padded to two digits.

use crate::error::{DecodeError, EncodeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value length a two-digit prefix can declare.
pub const MAX_VALUE_LEN: usize = 99;

/// Ids of the fields and sub-fields emitted in a static Pix payload.
pub mod tags {
    /// Payload format indicator.
    pub const PAYLOAD_FORMAT: u8 = 0;
    /// Point of initiation method.
    pub const POINT_OF_INITIATION: u8 = 1;
    /// Merchant account information template for Pix.
    pub const MERCHANT_ACCOUNT_INFO: u8 = 26;
    /// Merchant category code.
    pub const MERCHANT_CATEGORY_CODE: u8 = 52;
    /// Transaction currency (ISO 4217 numeric).
    pub const TRANSACTION_CURRENCY: u8 = 53;
    /// Transaction amount.
    pub const TRANSACTION_AMOUNT: u8 = 54;
    /// Country code (ISO 3166-1 alpha-2).
    pub const COUNTRY_CODE: u8 = 58;
    /// Merchant name.
    pub const MERCHANT_NAME: u8 = 59;
    /// Merchant city.
    pub const MERCHANT_CITY: u8 = 60;
    /// Additional data field template.
    pub const ADDITIONAL_DATA: u8 = 62;
    /// CRC-16 checksum.
    pub const CRC: u8 = 63;

    /// Sub-fields of the merchant account information template.
    pub mod account {
        /// Globally unique identifier of the payment domain.
        pub const GUI: u8 = 0;
        /// Payee key.
        pub const KEY: u8 = 1;
        /// Free-text note shown to the payer.
        pub const NOTE: u8 = 2;
    }

    /// Sub-fields of the additional data template.
    pub mod additional {
        /// Reference label (transaction id).
        pub const REFERENCE_LABEL: u8 = 5;
    }
}

/// Two-digit field id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "u32", into = "u8")]
pub struct FieldTag(u8);

impl FieldTag {
    /// Creates a new field tag.
    ///
    /// # Arguments
    /// * `tag` - The tag number (0-99)
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidTag` if the number needs more than two digits.
    pub fn new(tag: u32) -> Result<Self, EncodeError> {
        u8::try_from(tag)
            .ok()
            .filter(|t| *t <= 99)
            .map(Self)
            .ok_or(EncodeError::InvalidTag { tag })
    }

    /// Returns the raw tag number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the two ASCII digits of this tag.
    #[inline]
    #[must_use]
    pub const fn digits(self) -> [u8; 2] {
        [b'0' + self.0 / 10, b'0' + self.0 % 10]
    }

    /// Returns true if this tag is a template whose value is a sub-field sequence.
    #[inline]
    #[must_use]
    pub const fn is_template(self) -> bool {
        matches!(self.0, 26..=51 | 62 | 80..=99)
    }
}

impl TryFrom<u32> for FieldTag {
    type Error = EncodeError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

impl From<FieldTag> for u8 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Zero-copy reference to a field within a payload buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    /// The field tag number.
    pub tag: u8,
    /// Reference to the field value bytes (without tag and length).
    pub value: &'a [u8],
}

impl<'a> FieldRef<'a> {
    /// Creates a new field reference.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - Reference to the value bytes
    #[inline]
    #[must_use]
    pub const fn new(tag: u8, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Returns the value as a string slice.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidUtf8` if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.value).map_err(DecodeError::from)
    }

    /// Returns the raw bytes of the value.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.value
    }

    /// Returns the length of the value in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the value is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the encoded size of this field: tag, length prefix, and value.
    #[inline]
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        4 + self.value.len()
    }
}

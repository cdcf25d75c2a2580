/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Error types for the BRCode payload codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across encoding, decoding, and configuration.
//! Every error is a deterministic function failure: none of them are
//! retryable and all are raised before any partial payload is returned.

use thiserror::Error;

/// Result type alias using [`BrCodeError`] as the error type.
pub type Result<T> = std::result::Result<T, BrCodeError>;

/// Top-level error type for all BRCode operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrCodeError {
    /// Error while building a payload.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error while parsing or verifying a payload.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid merchant configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur while building a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Amount is negative, non-finite, or not a number.
    #[error("invalid amount: {reason}")]
    InvalidAmount {
        /// Description of why the amount was rejected.
        reason: String,
    },

    /// Value does not fit in a two-digit length prefix.
    #[error("field value too long for tag {tag:02}: {length} bytes exceeds max {max_length}")]
    FieldTooLong {
        /// The tag number of the field.
        tag: u8,
        /// Actual length of the value in bytes.
        length: usize,
        /// Maximum allowed length in bytes.
        max_length: usize,
    },

    /// Value contains text that cannot be carried in a printable payload.
    #[error("unsupported text in tag {tag:02}: {reason}")]
    Encoding {
        /// The tag number of the field.
        tag: u8,
        /// Description of the offending content.
        reason: String,
    },

    /// Tag id outside the two-digit range.
    #[error("invalid tag: {tag} is not a two-digit id")]
    InvalidTag {
        /// The rejected tag number.
        tag: u32,
    },

    /// A required value is empty.
    #[error("missing required value for tag {tag:02}")]
    EmptyValue {
        /// The tag number of the field.
        tag: u8,
    },
}

/// Errors that occur while parsing or verifying a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload ended in the middle of a field.
    #[error("incomplete payload: need {needed} more bytes at offset {offset}")]
    Incomplete {
        /// Offset of the truncated field.
        offset: usize,
        /// Bytes missing to complete the field.
        needed: usize,
    },

    /// Tag is not two ASCII digits.
    #[error("invalid tag at offset {offset}")]
    InvalidTag {
        /// Offset of the tag.
        offset: usize,
    },

    /// Length prefix is not two ASCII digits.
    #[error("invalid length prefix for tag {tag:02} at offset {offset}")]
    InvalidLength {
        /// The tag whose length is invalid.
        tag: u8,
        /// Offset of the length prefix.
        offset: usize,
    },

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated:04X}, declared {declared:04X}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u16,
        /// Declared checksum value in the payload.
        declared: u16,
    },

    /// Checksum field is missing, not last, or not 4 hex digits.
    #[error("invalid checksum field: {reason}")]
    InvalidChecksum {
        /// Description of the problem.
        reason: String,
    },

    /// Missing required field.
    #[error("missing required field: tag {tag:02}")]
    MissingField {
        /// The tag number of the missing field.
        tag: u8,
    },

    /// Invalid UTF-8 in a field value.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Errors in merchant configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("missing setting: {0}")]
    Missing(String),

    /// A setting has an invalid value.
    #[error("invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
}

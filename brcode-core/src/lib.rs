/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! # BRCode Core
//!
//! Core types, field definitions, and error types for the BRCode Pix payload codec.
//!
//! This crate provides the fundamental building blocks used across all BRCode crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: `FieldTag`, `FieldRef`, and the tag ids of a Pix payload
//! - **Value types**: `PayeeKey`, `MerchantName`, `MerchantCity`, `Amount`
//!
//! Every value type validates on construction, so a payload assembled from
//! them can only fail on combined lengths.

pub mod error;
pub mod field;
pub mod types;

pub use error::{BrCodeError, ConfigError, DecodeError, EncodeError, Result};
pub use field::{FieldRef, FieldTag, MAX_VALUE_LEN, tags};
pub use types::{
    Amount, MerchantCity, MerchantIdentity, MerchantName, PayeeKey, PointOfInitiation,
};

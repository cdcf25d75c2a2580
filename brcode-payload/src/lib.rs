/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! # BRCode Payload
//!
//! Static Pix payment payload assembly.
//!
//! This crate turns a merchant identity, an amount, and an optional note
//! into the text encoded in a Pix QR code ("copia e cola"):
//!
//! - [`config`]: Merchant identity and fixed codes
//! - [`sanitize`]: Note normalization
//! - [`payload`]: Field assembly and checksum
//! - [`plan`]: Upfront and down payment plans
//! - [`display`]: Amount rendering for messages shown to people
//!
//! Payload building is a pure function of its inputs: identical inputs
//! always produce the identical string.
//!
//! ## Example
//!
//! ```rust
//! use brcode_payload::{MerchantConfigBuilder, PayloadBuilder};
//!
//! let config = MerchantConfigBuilder::new()
//!     .key("92113026000164")
//!     .name("Prodasiq Sistemas")
//!     .city("PORTO ALEGRE")
//!     .build()
//!     .unwrap();
//! let builder = PayloadBuilder::new(config).unwrap();
//! let payload = builder.build("10.00".parse().unwrap(), None).unwrap();
//! assert!(payload.as_str().contains("540510.00"));
//! ```

pub mod config;
pub mod display;
pub mod payload;
pub mod plan;
pub mod sanitize;

pub use config::{MerchantConfig, MerchantConfigBuilder};
pub use display::format_brl;
pub use payload::{Payload, PayloadBuilder, PixRequest, encode, verify_checksum};
pub use plan::{Charge, PaymentPlan};
pub use sanitize::{NOTE_MAX_CHARS, Note, sanitize_note};

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! # BRCode
//!
//! Generation and verification of static Pix payment payloads for Rust.
//!
//! A Pix payload is an EMV tag-length-value string closed by a CRC-16. It is
//! what a payer app reads from a Pix QR code, and what "Pix copia e cola"
//! pastes.
//!
//! ## Features
//!
//! - **Pure**: Building a payload has no I/O and no shared state
//! - **Validated**: Lengths are checked before anything is returned
//! - **Byte-exact**: Lengths and checksum follow the UTF-8 bytes
//! - **Verifiable**: Payloads decode back into fields with checksum checks
//!
//! ## Quick Start
//!
//! ```rust
//! use brcode::prelude::*;
//!
//! let config = MerchantConfigBuilder::new()
//!     .key("92113026000164")
//!     .name("Prodasiq Sistemas")
//!     .city("PORTO ALEGRE")
//!     .build()?;
//! let payload = PayloadBuilder::new(config)?
//!     .build_for_plan(PaymentPlan::Upfront, "10.00".parse()?, None)?;
//! assert!(verify_checksum(payload.as_str()).is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Errors, field ids, and validated value types
//! - [`tlv`]: Tag-length-value encoding, decoding, and CRC-16
//! - [`payload`]: Merchant configuration and payload assembly

pub mod core {
    //! Errors, field ids, and validated value types.
    pub use brcode_core::*;
}

pub mod tlv {
    //! Tag-length-value encoding, decoding, and CRC-16.
    pub use brcode_tlv::*;
}

pub mod payload {
    //! Merchant configuration and payload assembly.
    pub use brcode_payload::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use brcode_core::{
        Amount, BrCodeError, ConfigError, DecodeError, EncodeError, FieldRef, FieldTag,
        MerchantCity, MerchantIdentity, MerchantName, PayeeKey, PointOfInitiation, Result, tags,
    };

    // Tag-length-value encoding
    pub use brcode_tlv::{DecodedPayload, Decoder, Encoder, calculate_crc16, encode_field};

    // Payload assembly
    pub use brcode_payload::{
        Charge, MerchantConfig, MerchantConfigBuilder, Note, Payload, PayloadBuilder,
        PaymentPlan, PixRequest, encode, format_brl, sanitize_note, verify_checksum,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _amount = Amount::ZERO;
        let _plan = PaymentPlan::ONE_PLUS_THREE;
        let _poi = PointOfInitiation::default();
    }

    #[test]
    fn test_field_round_trip_through_prelude() {
        assert_eq!(encode_field(tags::COUNTRY_CODE, "BR").unwrap(), "5802BR");
        assert_eq!(calculate_crc16(b"123456789"), 0x29B1);
    }
}

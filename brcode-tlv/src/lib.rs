/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! # BRCode TLV
//!
//! Tag-length-value encoding and decoding for BRCode payloads.
//!
//! Every field is written as a two-digit tag, a two-digit byte length, and
//! the value. Payloads end with a CRC-16/CCITT-FALSE field (`6304XXXX`).
//!
//! ## Features
//!
//! - **Nested templates**: Build fields whose value is a field sequence
//! - **Zero-copy parsing**: Decoded values reference the original buffer
//! - **Checksum calculation**: CRC-16 over the UTF-8 bytes of the payload

pub mod checksum;
pub mod decoder;
pub mod encoder;

pub use checksum::{calculate_crc16, format_crc16, parse_crc16};
pub use decoder::{DecodedPayload, Decoder, Fields, decode_fields};
pub use encoder::{Encoder, encode_field};

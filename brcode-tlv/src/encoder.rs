/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! EMV tag-length-value encoder.
//!
//! This module provides an encoder for building payloads in the
//! `tag(2) length(2) value` format used by Pix codes. Templates (fields whose
//! value is itself a field sequence) are built with [`Encoder::put_group`].

use crate::checksum::{calculate_crc16, format_crc16};
use brcode_core::error::EncodeError;
use brcode_core::field::{FieldTag, MAX_VALUE_LEN, tags};
use bytes::{BufMut, BytesMut};

/// Tag and length of the checksum field, hashed together with the payload.
pub const CRC_PREFIX: &[u8; 4] = b"6304";

/// Encodes a single field as `tag + zero_pad(byte_len, 2) + value`.
///
/// # Errors
/// Returns `EncodeError::InvalidTag` for tags above 99,
/// `EncodeError::FieldTooLong` for values of 100 bytes or more, and
/// `EncodeError::Encoding` for values with control characters.
///
/// # Example
/// ```
/// use brcode_tlv::encode_field;
///
/// assert_eq!(encode_field(54, "10.00").unwrap(), "540510.00");
/// ```
pub fn encode_field(tag: u8, value: &str) -> Result<String, EncodeError> {
    let mut encoder = Encoder::with_capacity(4 + value.len());
    encoder.put_str(tag, value)?;
    encoder.into_text(tag)
}

/// Checks that a text value can be declared with a two-digit length.
fn check_value(tag: u8, value: &str) -> Result<(), EncodeError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(EncodeError::FieldTooLong {
            tag,
            length: value.len(),
            max_length: MAX_VALUE_LEN,
        });
    }
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(EncodeError::Encoding {
            tag,
            reason: format!("control character U+{:04X}", c as u32),
        });
    }
    Ok(())
}

/// Renders a length below 100 as two ASCII digits.
#[inline]
fn length_digits(len: usize) -> [u8; 2] {
    debug_assert!(len <= MAX_VALUE_LEN);
    [b'0' + (len / 10) as u8, b'0' + (len % 10) as u8]
}

/// Tag-length-value payload encoder.
///
/// The encoder appends fields in call order. A failed `put_*` call leaves
/// the buffer untouched, so a payload is either complete or not returned.
#[derive(Debug, Default)]
pub struct Encoder {
    /// Encoded fields so far.
    buf: BytesMut,
}

impl Encoder {
    /// Creates a new, empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(128),
        }
    }

    /// Creates a new encoder with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial buffer capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends a field with a text value.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - The field value; its UTF-8 byte length is declared
    ///
    /// # Errors
    /// See [`encode_field`].
    pub fn put_str(&mut self, tag: u8, value: &str) -> Result<(), EncodeError> {
        check_value(tag, value)?;
        self.put_raw(tag, value.as_bytes())
    }

    /// Appends a field with raw bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::Encoding` if the bytes are not UTF-8, and the
    /// tag and length errors of [`encode_field`].
    pub fn put_raw(&mut self, tag: u8, value: &[u8]) -> Result<(), EncodeError> {
        let tag = FieldTag::new(u32::from(tag))?;
        if value.len() > MAX_VALUE_LEN {
            return Err(EncodeError::FieldTooLong {
                tag: tag.value(),
                length: value.len(),
                max_length: MAX_VALUE_LEN,
            });
        }
        if let Err(e) = std::str::from_utf8(value) {
            return Err(EncodeError::Encoding {
                tag: tag.value(),
                reason: e.to_string(),
            });
        }

        self.buf.reserve(4 + value.len());
        self.buf.put_slice(&tag.digits());
        self.buf.put_slice(&length_digits(value.len()));
        self.buf.put_slice(value);
        Ok(())
    }

    /// Appends a template field whose value is the sequence built by `build`.
    ///
    /// # Arguments
    /// * `tag` - The outer field tag number
    /// * `build` - Appends the sub-fields to a fresh encoder
    ///
    /// # Errors
    /// Returns any error from `build`, or `EncodeError::FieldTooLong` if
    /// the sub-fields together exceed 99 bytes.
    ///
    /// # Example
    /// ```
    /// use brcode_tlv::Encoder;
    ///
    /// let mut encoder = Encoder::new();
    /// encoder
    ///     .put_group(62, |group| group.put_str(5, "***"))
    ///     .unwrap();
    /// assert_eq!(encoder.as_bytes(), b"62070503***");
    /// ```
    pub fn put_group<F>(&mut self, tag: u8, build: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Encoder) -> Result<(), EncodeError>,
    {
        let mut group = Encoder::with_capacity(MAX_VALUE_LEN);
        build(&mut group)?;
        self.put_raw(tag, &group.buf)
    }

    /// Finalizes the payload and returns it as text.
    ///
    /// This method appends the checksum tag and length (`6304`), computes
    /// the CRC over the whole buffer including that prefix, and appends the
    /// 4 hex digits.
    ///
    /// # Errors
    /// Returns `EncodeError::Encoding` if the buffer is not valid UTF-8.
    pub fn finish(mut self) -> Result<String, EncodeError> {
        self.buf.put_slice(CRC_PREFIX);
        let crc = calculate_crc16(&self.buf);
        self.buf.put_slice(&format_crc16(crc));
        self.into_text(tags::CRC)
    }

    /// Converts the buffer into text, blaming `tag` if it is not UTF-8.
    fn into_text(self, tag: u8) -> Result<String, EncodeError> {
        String::from_utf8(self.buf.to_vec()).map_err(|e| EncodeError::Encoding {
            tag,
            reason: e.to_string(),
        })
    }

    /// Returns the bytes encoded so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes encoded so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been encoded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Clears the encoder for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

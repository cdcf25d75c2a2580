/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Zero-copy payload decoder.
//!
//! This module parses a payload back into its fields without copying field
//! values. Field values are returned as references to the original buffer.
//! Decoding checks every declared length against the bytes that follow it
//! and, unless disabled, the trailing CRC-16.

use crate::checksum::{calculate_crc16, parse_crc16};
use brcode_core::error::DecodeError;
use brcode_core::field::{FieldRef, tags};
use smallvec::SmallVec;

/// Fields of a payload or template, inline up to a typical Pix payload.
pub type Fields<'a> = SmallVec<[FieldRef<'a>; 16]>;

/// Zero-copy payload decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Current position in the buffer.
    offset: usize,
    /// Whether to validate checksums.
    validate_checksum: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    ///
    /// # Arguments
    /// * `input` - The payload bytes to decode
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            validate_checksum: true,
        }
    }

    /// Sets whether to validate the checksum during decoding.
    #[inline]
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Decodes a complete payload from the buffer.
    ///
    /// # Errors
    /// Returns `DecodeError` if a field is malformed or truncated, the
    /// payload does not start with the format indicator, the checksum field
    /// is missing or not last, or the checksum does not match.
    pub fn decode(&mut self) -> Result<DecodedPayload<'a>, DecodeError> {
        let start = self.offset;
        let mut fields = Fields::new();
        while let Some(field) = self.next_field()? {
            if fields.last().is_some_and(|f: &FieldRef<'a>| f.tag == tags::CRC) {
                return Err(DecodeError::InvalidChecksum {
                    reason: "checksum field is not last".to_string(),
                });
            }
            fields.push(field);
        }

        match fields.first() {
            Some(first) if first.tag == tags::PAYLOAD_FORMAT => {}
            _ => {
                return Err(DecodeError::MissingField {
                    tag: tags::PAYLOAD_FORMAT,
                });
            }
        }

        let crc_field = fields
            .last()
            .filter(|f| f.tag == tags::CRC)
            .ok_or(DecodeError::MissingField { tag: tags::CRC })?;
        if crc_field.len() != 4 {
            return Err(DecodeError::InvalidChecksum {
                reason: format!("expected 4 digits, found {}", crc_field.len()),
            });
        }
        let declared = parse_crc16(crc_field.value).ok_or_else(|| DecodeError::InvalidChecksum {
            reason: "checksum is not hexadecimal".to_string(),
        })?;

        let raw = &self.input[start..self.offset];
        if self.validate_checksum {
            let calculated = calculate_crc16(&raw[..raw.len() - 4]);
            if calculated != declared {
                return Err(DecodeError::ChecksumMismatch {
                    calculated,
                    declared,
                });
            }
        }

        Ok(DecodedPayload {
            raw,
            fields,
            crc: declared,
        })
    }

    /// Parses the next field from the buffer.
    ///
    /// # Returns
    /// The next field, or `None` if the buffer is exhausted.
    ///
    /// # Errors
    /// Returns `DecodeError` if the tag or length is not two digits, or the
    /// buffer ends before the declared value does.
    pub fn next_field(&mut self) -> Result<Option<FieldRef<'a>>, DecodeError> {
        let remaining = &self.input[self.offset.min(self.input.len())..];
        if remaining.is_empty() {
            return Ok(None);
        }
        if remaining.len() < 4 {
            return Err(DecodeError::Incomplete {
                offset: self.offset,
                needed: 4 - remaining.len(),
            });
        }

        let tag = parse_two_digits(&remaining[..2])
            .ok_or(DecodeError::InvalidTag { offset: self.offset })?;
        let len = parse_two_digits(&remaining[2..4]).ok_or(DecodeError::InvalidLength {
            tag,
            offset: self.offset + 2,
        })? as usize;

        let end = 4 + len;
        if remaining.len() < end {
            return Err(DecodeError::Incomplete {
                offset: self.offset,
                needed: end - remaining.len(),
            });
        }

        self.offset += end;
        Ok(Some(FieldRef::new(tag, &remaining[4..end])))
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if the buffer has been fully consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Resets the decoder to the beginning of the buffer.
    #[inline]
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Splits a field sequence (a whole payload or a template value) into fields.
///
/// # Errors
/// Returns `DecodeError` if any field is malformed or truncated.
pub fn decode_fields(input: &[u8]) -> Result<Fields<'_>, DecodeError> {
    let mut decoder = Decoder::new(input);
    let mut fields = Fields::new();
    while let Some(field) = decoder.next_field()? {
        fields.push(field);
    }
    Ok(fields)
}

/// A decoded payload with zero-copy access to its fields.
#[derive(Debug, Clone)]
pub struct DecodedPayload<'a> {
    raw: &'a [u8],
    fields: Fields<'a>,
    crc: u16,
}

impl<'a> DecodedPayload<'a> {
    /// Returns all top-level fields in payload order, checksum included.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldRef<'a>] {
        &self.fields
    }

    /// Returns the first top-level field with the given tag.
    #[must_use]
    pub fn field(&self, tag: u8) -> Option<FieldRef<'a>> {
        self.fields.iter().copied().find(|f| f.tag == tag)
    }

    /// Returns the value of a top-level field as text.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingField` if the field is absent and
    /// `DecodeError::InvalidUtf8` if it is not text.
    pub fn value(&self, tag: u8) -> Result<&'a str, DecodeError> {
        self.field(tag)
            .ok_or(DecodeError::MissingField { tag })?
            .as_str()
    }

    /// Returns the sub-fields of a template field.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingField` if the template is absent, or a
    /// parse error if its value is not a valid field sequence.
    pub fn group(&self, tag: u8) -> Result<Fields<'a>, DecodeError> {
        let field = self.field(tag).ok_or(DecodeError::MissingField { tag })?;
        decode_fields(field.value)
    }

    /// Returns the declared checksum.
    #[inline]
    #[must_use]
    pub const fn crc(&self) -> u16 {
        self.crc
    }

    /// Returns the raw payload bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }
}

/// Parses two ASCII digits.
#[inline]
fn parse_two_digits(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [hi @ b'0'..=b'9', lo @ b'0'..=b'9'] => Some((hi - b'0') * 10 + (lo - b'0')),
        _ => None,
    }
}

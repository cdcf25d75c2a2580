/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! CRC-16 checksum calculation.
//!
//! Pix payloads end with a CRC-16/CCITT-FALSE over every byte before the
//! four checksum digits, including the `6304` tag and length of the
//! checksum field itself. The result is rendered as 4 uppercase hex digits.
//!
//! The checksum covers the UTF-8 bytes of the payload, the same bytes the
//! length prefixes count.

/// Generator polynomial (x^16 + x^12 + x^5 + 1).
pub const POLYNOMIAL: u16 = 0x1021;

/// Initial register value.
pub const INITIAL: u16 = 0xFFFF;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Calculates the CRC-16/CCITT-FALSE checksum for the given data.
///
/// # Arguments
/// * `data` - The payload bytes to checksum (up to and including `6304`)
///
/// # Returns
/// The 16-bit register after all bytes are consumed.
///
/// # Example
/// ```
/// use brcode_tlv::calculate_crc16;
///
/// assert_eq!(calculate_crc16(b"123456789"), 0x29B1);
/// ```
#[inline]
#[must_use]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    data.iter().fold(INITIAL, |crc, &byte| update(crc, byte))
}

/// Feeds one byte through the register, most significant bit first.
#[inline]
fn update(mut crc: u16, byte: u8) -> u16 {
    crc ^= u16::from(byte) << 8;
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ POLYNOMIAL
        } else {
            crc << 1
        };
    }
    crc
}

/// Formats a checksum as 4 uppercase hex digits, zero-padded.
///
/// # Arguments
/// * `crc` - The checksum value
#[inline]
#[must_use]
pub fn format_crc16(crc: u16) -> [u8; 4] {
    [
        HEX_DIGITS[usize::from(crc >> 12)],
        HEX_DIGITS[usize::from((crc >> 8) & 0xF)],
        HEX_DIGITS[usize::from((crc >> 4) & 0xF)],
        HEX_DIGITS[usize::from(crc & 0xF)],
    ]
}

/// Parses 4 hex digits into a checksum value.
///
/// Lowercase digits are accepted.
///
/// # Returns
/// `Some(crc)` if valid, `None` otherwise.
#[inline]
#[must_use]
pub fn parse_crc16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }

    bytes.iter().try_fold(0u16, |acc, &b| {
        let digit = (b as char).to_digit(16)?;
        Some((acc << 4) | digit as u16)
    })
}

/// Computes the checksum of `payload` and renders it as 4 uppercase hex digits.
///
/// # Example
/// ```
/// use brcode_tlv::checksum::checksum;
///
/// assert_eq!(checksum("123456789"), "29B1");
/// ```
#[must_use]
pub fn checksum(payload: &str) -> String {
    let digits = format_crc16(calculate_crc16(payload.as_bytes()));
    digits.iter().map(|&b| b as char).collect()
}

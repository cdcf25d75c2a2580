/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Static Pix payload assembly.
//!
//! A payload is the following fixed sequence of fields, closed by the CRC:
//!
//! | Tag | Field                         | Value                         |
//! |-----|-------------------------------|-------------------------------|
//! | 00  | Payload format indicator      | `01`                          |
//! | 01  | Point of initiation method    | `12` (or `11`)                |
//! | 26  | Merchant account information  | GUI, payee key, optional note |
//! | 52  | Merchant category code        | `0000` by default             |
//! | 53  | Transaction currency          | `986`                         |
//! | 54  | Transaction amount            | two fractional digits         |
//! | 58  | Country code                  | `BR`                          |
//! | 59  | Merchant name                 |                               |
//! | 60  | Merchant city                 |                               |
//! | 62  | Additional data               | reference label `***`         |
//! | 63  | CRC-16                        | 4 hex digits                  |

use crate::config::{MerchantConfig, PIX_GUI};
use crate::plan::PaymentPlan;
use crate::sanitize::Note;
use brcode_core::error::{DecodeError, Result};
use brcode_core::field::tags;
use brcode_core::types::{Amount, MerchantIdentity};
use brcode_tlv::{DecodedPayload, Decoder, Encoder};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Value of the payload format indicator.
pub const PAYLOAD_FORMAT_VERSION: &str = "01";

/// An encoded Pix payload, ready to be rendered as a QR code or copied.
///
/// Deserialized payloads are decoded first, so lengths and checksum hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Payload(String);

impl Payload {
    /// Returns the payload text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the payload and returns its text.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the payload length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a payload contains at least the checksum field.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the 4 checksum digits at the end of the payload.
    #[must_use]
    pub fn crc(&self) -> &str {
        self.0
            .get(self.0.len().saturating_sub(4)..)
            .unwrap_or_default()
    }

    /// Parses the payload back into fields, verifying lengths and checksum.
    ///
    /// # Errors
    /// Returns `DecodeError` if the payload is malformed.
    pub fn decode(&self) -> std::result::Result<DecodedPayload<'_>, DecodeError> {
        Decoder::new(self.0.as_bytes()).decode()
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Payload {
    type Error = DecodeError;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        Decoder::new(text.as_bytes()).decode()?;
        Ok(Self(text))
    }
}

impl From<Payload> for String {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Builds payloads for one merchant.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    config: MerchantConfig,
}

impl PayloadBuilder {
    /// Creates a builder for the given merchant.
    ///
    /// # Errors
    /// Returns `BrCodeError::Config` if the configuration is invalid.
    pub fn new(config: MerchantConfig) -> Result<Self> {
        config.validate()?;
        if config.identity.name.exceeds_convention() {
            warn!(
                name = %config.identity.name,
                "merchant name is longer than payer apps usually display"
            );
        }
        if config.identity.city.exceeds_convention() {
            warn!(
                city = %config.identity.city,
                "merchant city is longer than payer apps usually display"
            );
        }
        Ok(Self { config })
    }

    /// Returns the merchant configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MerchantConfig {
        &self.config
    }

    /// Builds a payload charging `amount`, with an optional note.
    ///
    /// The note is sanitized first; a note that sanitizes to nothing is the
    /// same as no note.
    ///
    /// # Errors
    /// Returns `EncodeError::FieldTooLong` if the merchant account template
    /// (GUI, key, and note) exceeds 99 bytes.
    pub fn build(&self, amount: Amount, note: Option<&str>) -> Result<Payload> {
        let note = note.and_then(Note::new);
        self.build_with_note(amount, note.as_ref())
    }

    /// Builds a payload for an order `total` charged under `plan`.
    ///
    /// # Errors
    /// Returns the errors of [`PaymentPlan::charge`] and
    /// [`PayloadBuilder::build`].
    pub fn build_for_plan(
        &self,
        plan: PaymentPlan,
        total: Amount,
        remark: Option<&str>,
    ) -> Result<Payload> {
        let charge = plan.charge(total, remark)?;
        debug!(%plan, total = %charge.total, amount = %charge.amount, "charging plan");
        self.build(charge.amount, Some(&charge.note))
    }

    /// Builds a payload from an already sanitized note.
    ///
    /// # Errors
    /// See [`PayloadBuilder::build`].
    pub fn build_with_note(&self, amount: Amount, note: Option<&Note>) -> Result<Payload> {
        let config = &self.config;
        let identity = &config.identity;
        let amount_value = amount.to_field_value();

        let mut encoder = Encoder::with_capacity(160);
        encoder.put_str(tags::PAYLOAD_FORMAT, PAYLOAD_FORMAT_VERSION)?;
        encoder.put_str(
            tags::POINT_OF_INITIATION,
            config.point_of_initiation.as_str(),
        )?;
        encoder.put_group(tags::MERCHANT_ACCOUNT_INFO, |account| {
            account.put_str(tags::account::GUI, PIX_GUI)?;
            account.put_str(tags::account::KEY, identity.key.as_str())?;
            if let Some(note) = note {
                account.put_str(tags::account::NOTE, note.as_str())?;
            }
            Ok(())
        })?;
        encoder.put_str(
            tags::MERCHANT_CATEGORY_CODE,
            &config.merchant_category_code,
        )?;
        encoder.put_str(tags::TRANSACTION_CURRENCY, &config.currency)?;
        encoder.put_str(tags::TRANSACTION_AMOUNT, &amount_value)?;
        encoder.put_str(tags::COUNTRY_CODE, &config.country_code)?;
        encoder.put_str(tags::MERCHANT_NAME, identity.name.as_str())?;
        encoder.put_str(tags::MERCHANT_CITY, identity.city.as_str())?;
        encoder.put_group(tags::ADDITIONAL_DATA, |additional| {
            additional.put_str(tags::additional::REFERENCE_LABEL, &config.reference_label)
        })?;

        let payload = Payload(encoder.finish()?);
        debug!(
            len = payload.len(),
            amount = %amount_value,
            note_len = note.map_or(0, Note::len),
            crc = payload.crc(),
            "built pix payload"
        );
        Ok(payload)
    }
}

/// Plain input record for a single payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixRequest {
    /// Pix key that receives the payment.
    pub payee_key: String,
    /// Merchant display name.
    pub payee_name: String,
    /// Merchant city.
    pub payee_city: String,
    /// Amount to charge.
    pub amount: Amount,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Encodes a payload from a plain request using the default codes.
///
/// # Errors
/// Returns `BrCodeError::Encode` if any value is invalid or too long.
///
/// # Example
/// ```
/// use brcode_payload::{PixRequest, encode};
///
/// let request = PixRequest {
///     payee_key: "92113026000164".to_string(),
///     payee_name: "Prodasiq Sistemas".to_string(),
///     payee_city: "PORTO ALEGRE".to_string(),
///     amount: "10.00".parse().unwrap(),
///     note: None,
/// };
/// let payload = encode(&request).unwrap();
/// assert!(payload.as_str().ends_with("6304F3CE"));
/// ```
pub fn encode(request: &PixRequest) -> Result<Payload> {
    let identity = MerchantIdentity::new(
        &request.payee_key,
        &request.payee_name,
        &request.payee_city,
    )?;
    PayloadBuilder::new(MerchantConfig::new(identity))?
        .build(request.amount, request.note.as_deref())
}

/// Recomputes the checksum of `payload` and compares it with its last 4 characters.
///
/// # Errors
/// Returns `DecodeError::Incomplete` if the payload is too short to carry a
/// checksum field, `DecodeError::InvalidChecksum` if the last 4 characters
/// are not hex digits, and `DecodeError::ChecksumMismatch` if they differ.
pub fn verify_checksum(payload: &str) -> Result<()> {
    if payload.len() < 8 {
        return Err(DecodeError::Incomplete {
            offset: payload.len(),
            needed: 8 - payload.len(),
        }
        .into());
    }
    if !payload.is_char_boundary(payload.len() - 4) {
        return Err(DecodeError::InvalidChecksum {
            reason: "checksum digits are not ASCII".to_string(),
        }
        .into());
    }
    let (body, digits) = payload.split_at(payload.len() - 4);
    let calculated = brcode_tlv::calculate_crc16(body.as_bytes());
    let declared = brcode_tlv::parse_crc16(digits.as_bytes()).ok_or_else(|| {
        DecodeError::InvalidChecksum {
            reason: format!("'{digits}' is not hexadecimal"),
        }
    })?;
    if calculated != declared {
        return Err(DecodeError::ChecksumMismatch {
            calculated,
            declared,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brcode_core::error::{BrCodeError, EncodeError};
    use brcode_core::types::PointOfInitiation;

    const REFERENCE: &str = "00020101021226360014br.gov.bcb.pix011492113026000164\
        520400005303986540510.005802BR5917Prodasiq Sistemas6012PORTO ALEGRE\
        62070503***6304F3CE";

    fn builder() -> PayloadBuilder {
        let identity =
            MerchantIdentity::new("92113026000164", "Prodasiq Sistemas", "PORTO ALEGRE").unwrap();
        PayloadBuilder::new(MerchantConfig::new(identity)).unwrap()
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_reference_payload() {
        let payload = builder().build(amount("10.00"), None).unwrap();
        assert_eq!(payload.as_str(), REFERENCE);
        assert_eq!(payload.crc(), "F3CE");
    }

    #[test]
    fn test_payload_with_note() {
        let payload = builder()
            .build(amount("10.00"), Some("Pagamento à vista Pedido 42"))
            .unwrap();
        assert_eq!(
            payload.as_str(),
            "00020101021226670014br.gov.bcb.pix0114921130260001640227Pagamento a vista Pedido 42\
             520400005303986540510.005802BR5917Prodasiq Sistemas6012PORTO ALEGRE\
             62070503***63047D1D"
        );
    }

    #[test]
    fn test_zero_amount() {
        let payload = builder().build(Amount::ZERO, None).unwrap();
        assert!(payload.as_str().contains("54040.00"));
        assert!(payload.as_str().ends_with("63043A38"));
    }

    #[test]
    fn test_plan_payload() {
        let payload = builder()
            .build_for_plan(PaymentPlan::ONE_PLUS_THREE, amount("100"), Some("Pedido 42"))
            .unwrap();
        assert_eq!(
            payload.as_str(),
            "00020101021226600014br.gov.bcb.pix0114921130260001640220Entrada 13 Pedido 42\
             520400005303986540525.005802BR5917Prodasiq Sistemas6012PORTO ALEGRE\
             62070503***630412D8"
        );
    }

    #[test]
    fn test_empty_note_matches_no_note() {
        let b = builder();
        let none = b.build(amount("10.00"), None).unwrap();
        assert_eq!(b.build(amount("10.00"), Some("")).unwrap(), none);
        assert_eq!(b.build(amount("10.00"), Some("#!?")).unwrap(), none);
    }

    #[test]
    fn test_reusable_point_of_initiation() {
        let identity =
            MerchantIdentity::new("92113026000164", "Prodasiq Sistemas", "PORTO ALEGRE").unwrap();
        let config =
            MerchantConfig::new(identity).with_point_of_initiation(PointOfInitiation::Reusable);
        let payload = PayloadBuilder::new(config)
            .unwrap()
            .build(amount("1"), None)
            .unwrap();
        assert!(payload.as_str().starts_with("000201010211"));
        assert!(verify_checksum(payload.as_str()).is_ok());
    }

    #[test]
    fn test_account_template_overflow() {
        let key = "k".repeat(60);
        let identity = MerchantIdentity::new(&key, "Loja", "RECIFE").unwrap();
        let b = PayloadBuilder::new(MerchantConfig::new(identity)).unwrap();

        // 18 + 64 = 82 bytes without a note
        assert!(b.build(amount("1"), None).is_ok());
        // 82 + 4 + 20 = 106 bytes with one
        assert_eq!(
            b.build(amount("1"), Some(&"n".repeat(20))).unwrap_err(),
            BrCodeError::Encode(EncodeError::FieldTooLong {
                tag: tags::MERCHANT_ACCOUNT_INFO,
                length: 106,
                max_length: 99,
            })
        );
    }

    #[test]
    fn test_multibyte_name_declares_bytes() {
        let identity = MerchantIdentity::new("92113026000164", "Padaria São José", "MACEIÓ").unwrap();
        let payload = PayloadBuilder::new(MerchantConfig::new(identity))
            .unwrap()
            .build(amount("5"), None)
            .unwrap();
        assert!(payload.as_str().contains("5918Padaria São José"));
        assert!(payload.as_str().contains("6007MACEIÓ"));
        assert!(payload.decode().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let identity =
            MerchantIdentity::new("92113026000164", "Prodasiq Sistemas", "PORTO ALEGRE").unwrap();
        let config = MerchantConfig::new(identity).with_merchant_category_code("00");
        assert!(matches!(
            PayloadBuilder::new(config),
            Err(BrCodeError::Config(_))
        ));
    }

    #[test]
    fn test_encode_request() {
        let request = PixRequest {
            payee_key: "92113026000164".to_string(),
            payee_name: "Prodasiq Sistemas".to_string(),
            payee_city: "PORTO ALEGRE".to_string(),
            amount: amount("10.00"),
            note: None,
        };
        assert_eq!(encode(&request).unwrap().as_str(), REFERENCE);
    }

    #[test]
    fn test_encode_request_invalid_key() {
        let request = PixRequest {
            payee_key: String::new(),
            payee_name: "Prodasiq Sistemas".to_string(),
            payee_city: "PORTO ALEGRE".to_string(),
            amount: Amount::ZERO,
            note: None,
        };
        assert_eq!(
            encode(&request).unwrap_err(),
            BrCodeError::Encode(EncodeError::EmptyValue { tag: 1 })
        );
    }

    #[test]
    fn test_verify_checksum() {
        assert!(verify_checksum(REFERENCE).is_ok());
        let tampered = REFERENCE.replace("PORTO", "PORTA");
        assert!(matches!(
            verify_checksum(&tampered),
            Err(BrCodeError::Decode(DecodeError::ChecksumMismatch { .. }))
        ));
        assert_eq!(
            verify_checksum("63"),
            Err(BrCodeError::Decode(DecodeError::Incomplete {
                offset: 2,
                needed: 6,
            }))
        );
        assert!(matches!(
            verify_checksum("0002éabc"),
            Err(BrCodeError::Decode(DecodeError::InvalidChecksum { .. }))
        ));
    }

    #[test]
    fn test_payload_deserialize_validates() {
        let payload: Payload = serde_json::from_str(&format!("\"{REFERENCE}\"")).unwrap();
        assert_eq!(payload.crc(), "F3CE");
        assert_eq!(serde_json::to_string(&payload).unwrap(), format!("\"{REFERENCE}\""));

        assert!(serde_json::from_str::<Payload>("\"éabc\"").is_err());
        let tampered = REFERENCE.replace("F3CE", "F3CF");
        assert!(serde_json::from_str::<Payload>(&format!("\"{tampered}\"")).is_err());
    }

    #[test]
    fn test_deserialized_note_matches_text_note() {
        let b = builder();
        let text = "Pagamento à vista Pedido 42";
        let note: Note = serde_json::from_str(&format!("\"{text}\"")).unwrap();
        assert_eq!(
            b.build_with_note(amount("10.00"), Some(&note)).unwrap(),
            b.build(amount("10.00"), Some(text)).unwrap()
        );
        assert!(serde_json::from_str::<Note>("\"!!!\"").is_err());
    }

    #[test]
    fn test_payload_decode() {
        let payload = builder().build(amount("10.00"), Some("Obrigado")).unwrap();
        let decoded = payload.decode().unwrap();
        let account = decoded.group(tags::MERCHANT_ACCOUNT_INFO).unwrap();
        assert_eq!(account.len(), 3);
        assert_eq!(account[2].as_str().unwrap(), "Obrigado");
    }
}

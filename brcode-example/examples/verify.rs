//! Pix payload verification example
//!
//! Usage: `verify <payload>`
use anyhow::Context;
use brcode_core::tags;
use brcode_tlv::Decoder;
use tracing::{info, warn};
mod common;
use common::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging();
    let payload = std::env::args()
        .nth(1)
        .context("usage: verify <payload>")?;

    let mut decoder = Decoder::new(payload.trim().as_bytes());
    let decoded = decoder.decode()?;
    info!(crc = %format!("{:04X}", decoded.crc()), "checksum ok");

    for field in decoded.fields() {
        println!("{:02} {:02} {}", field.tag, field.len(), field.as_str()?);
        if matches!(field.tag, tags::MERCHANT_ACCOUNT_INFO | tags::ADDITIONAL_DATA) {
            for sub in decoded.group(field.tag)? {
                println!("   {:02} {:02} {}", sub.tag, sub.len(), sub.as_str()?);
            }
        }
    }

    if decoded.field(tags::TRANSACTION_AMOUNT).is_none() {
        warn!("payload carries no amount; the payer will be asked for one");
    }
    Ok(())
}

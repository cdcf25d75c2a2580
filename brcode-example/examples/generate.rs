//! Pix payload generator example
//!
//! Usage: `generate <total> [avista|aprazo|aprazo:<n>] [remark]`
use anyhow::Context;
use brcode_core::Amount;
use brcode_payload::{PayloadBuilder, PaymentPlan, format_brl};
use tracing::info;
mod common;
use common::{init_logging, merchant_config};

fn main() -> anyhow::Result<()> {
    init_logging();
    let mut args = std::env::args().skip(1);

    let total: Amount = args
        .next()
        .unwrap_or_else(|| "10.00".to_string())
        .parse()
        .context("total must be a non-negative amount")?;
    let plan: PaymentPlan = args
        .next()
        .as_deref()
        .unwrap_or("avista")
        .parse()
        .context("unknown payment plan")?;
    let remark = args.collect::<Vec<_>>().join(" ");

    let config = merchant_config()?;
    info!(
        merchant = %config.identity.name,
        city = %config.identity.city,
        "loaded merchant"
    );

    let builder = PayloadBuilder::new(config)?;
    let charge = plan.charge(total, Some(&remark))?;
    let payload = builder.build(charge.amount, Some(&charge.note))?;

    info!(
        plan = %plan,
        total = %format_brl(charge.total),
        charged = %format_brl(charge.amount),
        "payload ready"
    );
    println!("{payload}");
    Ok(())
}

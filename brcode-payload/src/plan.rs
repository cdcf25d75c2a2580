/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Payment plans.
//!
//! A plan turns an order total and the buyer's remark into the amount
//! charged by a code and the note shown to the payer. Two plans are
//! supported: paying the full total at once, and paying the first of `n`
//! equal installments as a down payment.

use brcode_core::error::{ConfigError, EncodeError};
use brcode_core::types::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note label of an upfront payment.
pub const UPFRONT_LABEL: &str = "Pagamento à vista";

/// How an order total is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentPlan {
    /// Full total in a single payment.
    Upfront,
    /// First of `installments` equal payments.
    DownPayment {
        /// Total number of installments, the down payment included.
        installments: u32,
    },
}

/// Amount and note produced by a [`PaymentPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    /// Amount the code charges.
    pub amount: Amount,
    /// Order total the charge belongs to.
    pub total: Amount,
    /// Unsanitized note for the payer.
    pub note: String,
}

impl PaymentPlan {
    /// One down payment followed by three installments.
    pub const ONE_PLUS_THREE: Self = Self::DownPayment { installments: 4 };

    /// Returns the note label of this plan.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Upfront => UPFRONT_LABEL.to_string(),
            Self::DownPayment { installments } => {
                format!("Entrada (1+{})", installments.saturating_sub(1))
            }
        }
    }

    /// Computes what a code for `total` under this plan charges.
    ///
    /// The note is the plan label followed by `remark`, when one is given.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAmount` if a down payment plan has fewer
    /// than two installments.
    pub fn charge(&self, total: Amount, remark: Option<&str>) -> Result<Charge, EncodeError> {
        let amount = match self {
            Self::Upfront => total,
            Self::DownPayment { installments } if *installments < 2 => {
                return Err(EncodeError::InvalidAmount {
                    reason: format!(
                        "a down payment plan needs at least 2 installments, got {installments}"
                    ),
                });
            }
            Self::DownPayment { installments } => total.split(*installments)?,
        };

        let label = self.label();
        let note = match remark.map(str::trim).filter(|r| !r.is_empty()) {
            Some(remark) => format!("{label} {remark}"),
            None => label,
        };

        Ok(Charge {
            amount,
            total,
            note,
        })
    }
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upfront => f.write_str("avista"),
            Self::DownPayment { installments } => {
                write!(f, "aprazo:{installments}")
            }
        }
    }
}

impl FromStr for PaymentPlan {
    type Err = ConfigError;

    /// Parses `avista`, `aprazo` (1+3), or `aprazo:<installments>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Invalid {
            name: "payment_plan".to_string(),
            reason: format!("unknown plan '{s}'"),
        };
        match s.trim().to_ascii_lowercase().as_str() {
            "avista" => Ok(Self::Upfront),
            "aprazo" => Ok(Self::ONE_PLUS_THREE),
            other => other
                .strip_prefix("aprazo:")
                .and_then(|n| n.parse().ok())
                .map(|installments| Self::DownPayment { installments })
                .ok_or_else(invalid),
        }
    }
}

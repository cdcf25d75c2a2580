/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Human-facing rendering of amounts.

use brcode_core::types::Amount;

/// Formats an amount as Brazilian Real, e.g. `R$ 1.234,56`.
///
/// # Example
/// ```
/// use brcode_core::Amount;
/// use brcode_payload::display::format_brl;
///
/// let amount: Amount = "1234.5".parse().unwrap();
/// assert_eq!(format_brl(amount), "R$ 1.234,50");
/// ```
#[must_use]
pub fn format_brl(amount: Amount) -> String {
    let value = amount.to_field_value();
    let (units, cents) = value.split_once('.').unwrap_or((value.as_str(), "00"));

    let mut out = String::with_capacity(value.len() + 8);
    out.push_str("R$ ");
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    out.push(',');
    out.push_str(cents);
    out
}

//! Rupiah display formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this module only
//! produces the display string.

use rust_decimal::Decimal;

/// Formats an amount as an Indonesian rupiah string, e.g. `Rp 1.250.000`.
///
/// Fractional digits are dropped after rounding to the whole rupiah, and
/// thousands are separated with dots. Negative amounts keep their sign in
/// front of the `Rp` prefix, matching how balances are shown on the
/// transparency page.
#[must_use]
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let negative = rounded.is_sign_negative();
    let digits = rounded.abs().to_string();

    // Insert a dot every three digits from the right.
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

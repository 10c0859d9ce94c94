//! Currency display formatting.

use rust_decimal::Decimal;

/// Format an amount for display: currency prefix, two decimal places.
///
/// A missing amount renders as zero rather than failing; upstream product
/// records sometimes omit the comparison price.
///
/// ```
/// use greengrocer_core::format_amount;
///
/// assert_eq!(format_amount("$", Some("12.5".parse().unwrap())), "$ 12.50");
/// assert_eq!(format_amount("$", None), "$ 0.00");
/// ```
#[must_use]
pub fn format_amount(symbol: &str, amount: Option<Decimal>) -> String {
    format!("{symbol} {:.2}", amount.unwrap_or_default())
}

//! Price parsing, savings derivation, and display formatting.
//!
//! All arithmetic is done in [`Decimal`] so `"$49.99" - "$22.99"` is exactly
//! `27.00`. Rounding is half away from zero throughout.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid percent regex"));

/// Parses a display price such as `"$1,099.99"` or `"USD 19.99"`.
///
/// Everything except ASCII digits and `.` is discarded before parsing, so
/// currency symbols, codes, and thousands separators are ignored. Returns
/// `None` when nothing numeric remains or the remainder is not a number
/// (e.g. `"1.2.3"`).
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parses a discount badge such as `"50% off"` or `"-23%"`.
///
/// Only the number directly before the first `%` is read, so other digits in
/// the badge (`"Up to 50% off 2-pack"`) are ignored. Text without a number
/// followed by `%` yields `None`.
#[must_use]
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let digits = PERCENT_RE.captures(text)?.get(1)?;
    Decimal::from_str(digits.as_str()).ok()
}

/// Savings derived from a price pair, all unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savings {
    /// The reference price the discount applies to.
    pub basis: Decimal,
    pub amount: Decimal,
    pub percent: Decimal,
}

/// Derives savings from a known current price and a known basis price.
///
/// Returns `None` when the basis is not positive, does not exceed the price,
/// or the arithmetic overflows.
#[must_use]
pub fn derive_forward(price: Decimal, basis: Decimal) -> Option<Savings> {
    if basis <= Decimal::ZERO || basis <= price {
        return None;
    }
    let amount = basis.checked_sub(price)?;
    let percent = amount
        .checked_div(basis)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(Savings {
        basis,
        amount,
        percent,
    })
}

/// Derives the basis price from a known current price and a discount
/// percentage: `basis = price / (1 - pct / 100)`.
///
/// Returns `None` when the percentage is outside `(0, 100)`, the price is not
/// positive, or the arithmetic overflows.
#[must_use]
pub fn derive_inverse(price: Decimal, percent: Decimal) -> Option<Savings> {
    if percent <= Decimal::ZERO || percent >= Decimal::ONE_HUNDRED || price <= Decimal::ZERO {
        return None;
    }
    let remaining = Decimal::ONE.checked_sub(percent.checked_div(Decimal::ONE_HUNDRED)?)?;
    let basis = price.checked_div(remaining)?;
    let amount = basis.checked_sub(price)?;
    Some(Savings {
        basis,
        amount,
        percent,
    })
}

fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Display prefix for a currency code; unknown codes render as `"CODE "`.
#[must_use]
pub fn currency_symbol(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "INR" => "₹".to_string(),
        "JPY" => "¥".to_string(),
        other => format!("{other} "),
    }
}

/// `"$49.98"` style price string.
#[must_use]
pub fn format_price(amount: Decimal, currency: &str) -> String {
    format!("{}{}", currency_symbol(currency), round_to(amount, 2))
}

/// `"USD 24.99"` style savings string.
#[must_use]
pub fn format_savings(amount: Decimal, currency: &str) -> String {
    format!("{currency} {}", round_to(amount, 2))
}

/// `"54%"` style percentage string.
#[must_use]
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", round_to(percent, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_price_strips_symbols_and_separators() {
        assert_eq!(parse_price("$1,099.99"), Some(dec("1099.99")));
        assert_eq!(parse_price("USD 19.99"), Some(dec("19.99")));
        assert_eq!(parse_price("  22 "), Some(dec("22")));
    }

    #[test]
    fn parse_price_rejects_non_numeric() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("Currently unavailable"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn parse_percent_requires_percent_sign() {
        assert_eq!(parse_percent("50% off"), Some(dec("50")));
        assert_eq!(parse_percent("-23%"), Some(dec("23")));
        assert_eq!(parse_percent("Limited time deal"), None);
        assert_eq!(parse_percent("50 off"), None);
        assert_eq!(parse_percent("% off"), None);
    }

    #[test]
    fn parse_percent_ignores_unrelated_digits() {
        assert_eq!(parse_percent("Up to 50% off 2-pack"), Some(dec("50")));
        assert_eq!(parse_percent("Save 12.5 % on 3 items"), Some(dec("12.5")));
    }

    #[test]
    fn forward_derivation_computes_amount_and_percent() {
        let savings = derive_forward(dec("80.00"), dec("100.00")).unwrap();
        assert_eq!(format_savings(savings.amount, "USD"), "USD 20.00");
        assert_eq!(format_percent(savings.percent), "20%");
    }

    #[test]
    fn forward_derivation_rounds_percent_half_away_from_zero() {
        // 27 / 49.99 = 54.01...%
        let savings = derive_forward(dec("22.99"), dec("49.99")).unwrap();
        assert_eq!(format_savings(savings.amount, "USD"), "USD 27.00");
        assert_eq!(format_percent(savings.percent), "54%");

        // exactly 12.5%
        let savings = derive_forward(dec("70"), dec("80")).unwrap();
        assert_eq!(format_percent(savings.percent), "13%");
    }

    #[test]
    fn forward_derivation_rejects_basis_not_above_price() {
        assert!(derive_forward(dec("100"), dec("90")).is_none());
        assert!(derive_forward(dec("100"), dec("100")).is_none());
    }

    #[test]
    fn forward_derivation_rejects_non_positive_basis() {
        assert!(derive_forward(dec("-5"), dec("0")).is_none());
        assert!(derive_forward(dec("-10"), dec("-5")).is_none());
    }

    #[test]
    fn inverse_derivation_recovers_basis() {
        let savings = derive_inverse(dec("24.99"), dec("50")).unwrap();
        assert_eq!(format_price(savings.basis, "USD"), "$49.98");
        assert_eq!(format_savings(savings.amount, "USD"), "USD 24.99");
        assert_eq!(format_percent(savings.percent), "50%");
    }

    #[test]
    fn inverse_derivation_rejects_out_of_range_percent() {
        assert!(derive_inverse(dec("10"), dec("100")).is_none());
        assert!(derive_inverse(dec("10"), dec("150")).is_none());
        assert!(derive_inverse(dec("10"), dec("0")).is_none());
    }

    #[test]
    fn inverse_derivation_rejects_non_positive_price() {
        assert!(derive_inverse(dec("0"), dec("50")).is_none());
    }

    #[test]
    fn inverse_derivation_near_full_discount_stays_finite() {
        let savings = derive_inverse(dec("1.00"), dec("99.99")).unwrap();
        assert_eq!(format_price(savings.basis, "USD"), "$10000.00");
    }

    #[test]
    fn currency_symbols() {
        assert_eq!(format_price(dec("5"), "EUR"), "€5.00");
        assert_eq!(format_price(dec("5"), "GBP"), "£5.00");
        assert_eq!(format_price(dec("5"), "CHF"), "CHF 5.00");
        assert_eq!(format_savings(dec("5"), "EUR"), "EUR 5.00");
    }
}

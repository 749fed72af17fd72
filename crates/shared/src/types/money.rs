//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary figures are `rust_decimal::Decimal` with two fractional
//! digits; the helpers here keep stored and rendered values on that scale.

use rust_decimal::Decimal;

/// Fractional digits carried by every monetary figure.
pub const MONEY_SCALE: u32 = 2;

/// Quantizes an amount to the money scale (two fractional digits).
///
/// Uses banker's-free half-up rounding so `0.005` becomes `0.01`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        MONEY_SCALE,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Formats an amount with thousands separators and two decimals,
/// e.g. `12345.5` renders as `"12,345.50"`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let plain = format!("{rounded:.2}");

    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_scale() {
        assert_eq!(round_money(dec!(10)), dec!(10.00));
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(10.004)), dec!(10.00));
        assert_eq!(round_money(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn test_round_money_is_idempotent() {
        let once = round_money(dec!(99.995));
        assert_eq!(round_money(once), once);
    }

    #[rstest]
    #[case(dec!(0), "0.00")]
    #[case(dec!(7.5), "7.50")]
    #[case(dec!(999.99), "999.99")]
    #[case(dec!(1500), "1,500.00")]
    #[case(dec!(12345.5), "12,345.50")]
    #[case(dec!(1234567.89), "1,234,567.89")]
    #[case(dec!(-20500.75), "-20,500.75")]
    fn test_format_money(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_money(amount), expected);
    }
}

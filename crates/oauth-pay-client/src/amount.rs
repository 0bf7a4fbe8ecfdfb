//! Conversion between user-facing decimal amounts and ledger integer units.

use num_bigint::BigUint;

use crate::error::AmountError;

/// Convert a decimal string such as `"12.5"` into ledger units for a token
/// with `decimals` fractional digits.
///
/// The integer part and the fraction (right-padded with zeros to `decimals`)
/// are concatenated and parsed as one integer, so no binary floating-point
/// rounding is involved. A fraction with more significant digits than
/// `decimals` is rejected with [`AmountError::PrecisionOverflow`]; trailing
/// zeros beyond `decimals` are accepted since they carry no value.
pub fn to_ledger_amount(amount: &str, decimals: u8) -> Result<BigUint, AmountError> {
    let trimmed = amount.trim();
    let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }

    let fraction = fraction.trim_end_matches('0');
    let scale = decimals as usize;
    if fraction.len() > scale {
        return Err(AmountError::PrecisionOverflow {
            fraction_digits: fraction.len(),
            decimals,
        });
    }

    let mut digits = String::with_capacity(integer.len() + scale + 1);
    digits.push_str(integer);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat_n('0', scale - fraction.len()));
    if digits.is_empty() {
        digits.push('0');
    }

    digits
        .parse::<BigUint>()
        .map_err(|_| AmountError::InvalidFormat(amount.to_string()))
}

/// Convert a UI floating value into ledger units.
///
/// The value is rendered with its shortest round-trip decimal form (never
/// exponent notation) and passed to [`to_ledger_amount`].
pub fn to_ledger_amount_f64(amount: f64, decimals: u8) -> Result<BigUint, AmountError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }
    // abs() folds -0.0 into 0.0, which would otherwise render as "-0".
    to_ledger_amount(&amount.abs().to_string(), decimals)
}

/// Convert ledger units into a floating decimal by dividing by `10^decimals`.
///
/// Lossy for values beyond the exact integer range of `f64`.
pub fn to_decimal_amount(amount: &BigUint, decimals: u8) -> f64 {
    // A digit string always parses; huge values saturate to infinity.
    let value: f64 = amount.to_string().parse().unwrap_or(f64::INFINITY);
    value / 10f64.powi(i32::from(decimals))
}

/// Render ledger units as an exact decimal string, trailing zeros trimmed.
pub fn format_amount(amount: &BigUint, decimals: u8) -> String {
    let s = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return s;
    }

    let padded = if s.len() <= decimals {
        let mut p = String::with_capacity(decimals + 1);
        p.extend(std::iter::repeat_n('0', decimals + 1 - s.len()));
        p.push_str(&s);
        p
    } else {
        s
    };

    let (integer_part, fraction_part) = padded.split_at(padded.len() - decimals);
    let trimmed = fraction_part.trim_end_matches('0');
    if trimmed.is_empty() {
        integer_part.to_string()
    } else {
        format!("{integer_part}.{trimmed}")
    }
}

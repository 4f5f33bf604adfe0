//! Decimal amount parsing and formatting
//!
//! Balances are persisted as decimal strings in a fixed scientific form
//! (`7E+01`, `1.005E+02`, `5E-01`). Parsing accepts both that form and plain
//! decimal notation, and is exact: no value passes through binary floating point.

use crate::types::LedgerError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest scale a `Decimal` can carry
const MAX_SCALE: u32 = 28;

/// Parse a decimal amount in plain (`100.00`) or scientific (`1E+02`) notation
///
/// Returns `None` for anything that is not a finite decimal number representable
/// without rounding, including empty strings, `NaN`, `Inf`, hex floats and
/// digit separators.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    if input.is_empty()
        || !input
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }

    let (base, exponent) = match input.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
        None => (input, None),
    };

    if !base.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let parsed = Decimal::from_str(base).ok()?;
    // from_str rounds past 28 digits; any digit lost means the input is not exact
    if significant_digits(base) != significant_digits(&parsed.normalize().to_string()) {
        return None;
    }
    let base = parsed;

    match exponent {
        None => Some(base),
        Some(exponent) => {
            if !exponent.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            let exponent: i64 = exponent.parse().ok()?;
            shift_exponent(base, exponent)
        }
    }
}

/// Digits of a plain decimal string without sign, point, or leading and trailing zeros
fn significant_digits(plain: &str) -> String {
    let digits: String = plain.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').to_string()
}

/// Multiply `base` by `10^exponent` exactly, or fail
fn shift_exponent(base: Decimal, exponent: i64) -> Option<Decimal> {
    let mantissa = base.mantissa();
    let scale = i64::from(base.scale());
    let new_scale = scale - exponent;

    if new_scale >= 0 {
        let new_scale = u32::try_from(new_scale).ok()?;
        if new_scale > MAX_SCALE {
            return None;
        }
        Decimal::try_from_i128_with_scale(mantissa, new_scale).ok()
    } else {
        let factor = 10i128.checked_pow(u32::try_from(-new_scale).ok()?)?;
        let mantissa = mantissa.checked_mul(factor)?;
        Decimal::try_from_i128_with_scale(mantissa, 0).ok()
    }
}

/// Parse a non-negative amount argument, naming the argument in the error
pub fn parse_non_negative(input: &str, field: &str) -> Result<Decimal, LedgerError> {
    let value = parse_amount(input).ok_or_else(|| LedgerError::invalid_amount(input, field))?;
    if value < Decimal::ZERO {
        return Err(LedgerError::invalid_amount(input, field));
    }
    Ok(value)
}

/// Render a decimal in the persisted scientific form
///
/// The mantissa has one leading digit and no trailing zeros; the exponent has a
/// sign and at least two digits.
pub fn format_scientific(value: Decimal) -> String {
    let value = value.normalize();
    if value.is_zero() {
        return "0E+00".to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let digits = value.mantissa().unsigned_abs().to_string();
    let significant = digits.trim_end_matches('0');
    let trailing_zeros = (digits.len() - significant.len()) as i64;
    let exponent = (significant.len() as i64 - 1) + trailing_zeros - i64::from(value.scale());

    let (lead, rest) = significant.split_at(1);
    let mantissa = if rest.is_empty() {
        lead.to_string()
    } else {
        format!("{}.{}", lead, rest)
    };
    let exp_sign = if exponent < 0 { '-' } else { '+' };

    format!("{}{}E{}{:02}", sign, mantissa, exp_sign, exponent.abs())
}

/// Render a decimal as its shortest plain form (`70`, `0.5`)
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string()
}

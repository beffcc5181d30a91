//! pt-BR numeric conventions.
//!
//! The calculation form speaks Brazilian Portuguese: a comma is the
//! decimal separator and a dot groups thousands, so "1.234,56" is one
//! thousand two hundred thirty-four and change. Parsing follows that
//! convention strictly; machine-format values belong in the share
//! string, not here.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::round_half_up;

/// Error returned when a string cannot be parsed as a pt-BR [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid pt-BR number '{input}': {source}")]
pub struct ParseBrDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes pt-BR input: trims whitespace, drops thousands dots and
/// turns the decimal comma into a dot.
fn normalize_br_input(s: &str) -> String {
    s.trim().replace('.', "").replace(',', ".")
}

/// Parses a pt-BR formatted string into a [`Decimal`].
///
/// Handles dot as thousands separator and comma as decimal separator
/// (e.g. `"1.234,56"`). Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is invalid.
pub fn parse_br_decimal(s: &str) -> Result<Decimal, ParseBrDecimalError> {
    let normalized = normalize_br_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid pt-BR number: {}", e);
        ParseBrDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a monetary value as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// The value is rounded to centavos half-up first, so a raw figure can
/// be passed straight in.
pub fn format_brl(value: Decimal) -> String {
    let (negative, digits) = grouped_two_places(value);
    if negative {
        format!("-R$ {digits}")
    } else {
        format!("R$ {digits}")
    }
}

/// Formats a percentage with two decimal places, e.g. `13,41%`.
pub fn format_br_percent(value: Decimal) -> String {
    let (negative, digits) = grouped_two_places(value);
    if negative {
        format!("-{digits}%")
    } else {
        format!("{digits}%")
    }
}

/// Rounds to two places and renders "1.234,56"-style digits, returning
/// the sign separately so callers place it around their own prefix.
fn grouped_two_places(value: Decimal) -> (bool, String) {
    let mut rounded = round_half_up(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.rescale(2);

    let plain = rounded.abs().to_string();
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, f),
        None => (plain.as_str(), "00"),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit as char);
    }

    (negative, format!("{grouped},{frac_part}"))
}

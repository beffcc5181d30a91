//! Parsing for numeric command-line arguments.

use rust_decimal::Decimal;
use thiserror::Error;

use difal_core::locale::{self, ParseBrDecimalError};

/// Error returned when a numeric argument cannot be parsed.
#[derive(Debug, Error)]
pub enum ParseNumberError {
    /// pt-BR formatted input (decimal comma) that still failed to parse.
    #[error(transparent)]
    BrFormat(#[from] ParseBrDecimalError),

    /// Plain dot-decimal input that failed to parse.
    #[error("invalid number '{input}': {source}")]
    Plain {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Parses a numeric command-line argument.
///
/// A comma marks pt-BR formatting and switches to the strict pt-BR
/// rules, where the dot only groups thousands (`"1.234,56"`). Without
/// a comma the dot is an ordinary decimal point (`"1234.56"`). Empty
/// or whitespace-only input is treated as 0.
pub fn parse_number(s: &str) -> Result<Decimal, ParseNumberError> {
    if s.contains(',') {
        return Ok(locale::parse_br_decimal(s)?);
    }
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed.parse().map_err(|e| ParseNumberError::Plain {
        input: s.to_string(),
        source: e,
    })
}

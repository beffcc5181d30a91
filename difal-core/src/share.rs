//! Shareable representation of a transaction.
//!
//! A filled-in form can be handed to someone else as a query string;
//! decoding it back and recomputing gives the exact same breakdown.
//! Values travel in machine format (dot decimals, two-letter UF codes)
//! regardless of the display locale, and keys the codec does not know
//! are rejected rather than ignored.

use rust_decimal::Decimal;
use thiserror::Error;
use url::form_urlencoded;

use crate::models::{TransactionInput, Uf};

const KEY_AMOUNT: &str = "amount";
const KEY_ORIGIN: &str = "origin";
const KEY_DESTINATION: &str = "destination";
const KEY_INTERNAL_RATE: &str = "internal_rate";
const KEY_INTERSTATE_RATE: &str = "interstate_rate";
const KEY_FCP_RATE: &str = "fcp_rate";
const KEY_DESTINATION_REDUCTION: &str = "destination_reduction";
const KEY_ORIGIN_REDUCTION: &str = "origin_reduction";
const KEY_MARKUP: &str = "markup";
const KEY_MARKUP_ENABLED: &str = "markup_enabled";
const KEY_IMPORTED_GOODS: &str = "imported_goods";

/// Errors raised while decoding a share string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    /// A required key is absent.
    #[error("missing required key \"{0}\"")]
    MissingKey(&'static str),

    /// A key appears more than once.
    #[error("duplicate key \"{0}\"")]
    DuplicateKey(&'static str),

    /// The string carries a key this codec does not know.
    #[error("unknown key \"{0}\"")]
    UnknownKey(String),

    /// A value failed to parse for its key.
    #[error("invalid value \"{value}\" for key \"{key}\"")]
    InvalidValue { key: &'static str, value: String },
}

/// Encodes a transaction as a query string.
///
/// The amount, UFs and both rates are always written. Optional fields
/// are written only when they differ from their defaults, so a minimal
/// form produces a minimal string.
pub fn encode(input: &TransactionInput) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair(KEY_AMOUNT, &input.amount.to_string());
    query.append_pair(KEY_ORIGIN, input.origin.as_str());
    query.append_pair(KEY_DESTINATION, input.destination.as_str());
    query.append_pair(KEY_INTERNAL_RATE, &input.internal_rate.to_string());
    query.append_pair(KEY_INTERSTATE_RATE, &input.interstate_rate.to_string());
    if !input.fcp_rate.is_zero() {
        query.append_pair(KEY_FCP_RATE, &input.fcp_rate.to_string());
    }
    if !input.destination_reduction.is_zero() {
        query.append_pair(
            KEY_DESTINATION_REDUCTION,
            &input.destination_reduction.to_string(),
        );
    }
    if !input.origin_reduction.is_zero() {
        query.append_pair(KEY_ORIGIN_REDUCTION, &input.origin_reduction.to_string());
    }
    if !input.markup_pct.is_zero() {
        query.append_pair(KEY_MARKUP, &input.markup_pct.to_string());
    }
    if input.markup_enabled {
        query.append_pair(KEY_MARKUP_ENABLED, "1");
    }
    if input.imported_goods {
        query.append_pair(KEY_IMPORTED_GOODS, "1");
    }
    query.finish()
}

/// Decodes a query string back into a transaction.
///
/// Accepts exactly what [`encode`] produces, plus an optional leading
/// `?` so a pasted URL fragment works. Absent optional keys take their
/// defaults (zero rates, markup off, domestic goods).
///
/// # Errors
///
/// Returns [`ShareError`] on a missing required key, a duplicated or
/// unknown key, or a value that does not parse.
pub fn decode(query: &str) -> Result<TransactionInput, ShareError> {
    let query = query.trim();
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut amount = None;
    let mut origin = None;
    let mut destination = None;
    let mut internal_rate = None;
    let mut interstate_rate = None;
    let mut fcp_rate = None;
    let mut destination_reduction = None;
    let mut origin_reduction = None;
    let mut markup_pct = None;
    let mut markup_enabled = None;
    let mut imported_goods = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            KEY_AMOUNT => set_once(&mut amount, KEY_AMOUNT, parse_decimal(KEY_AMOUNT, &value)?)?,
            KEY_ORIGIN => set_once(&mut origin, KEY_ORIGIN, parse_uf(KEY_ORIGIN, &value)?)?,
            KEY_DESTINATION => set_once(
                &mut destination,
                KEY_DESTINATION,
                parse_uf(KEY_DESTINATION, &value)?,
            )?,
            KEY_INTERNAL_RATE => set_once(
                &mut internal_rate,
                KEY_INTERNAL_RATE,
                parse_decimal(KEY_INTERNAL_RATE, &value)?,
            )?,
            KEY_INTERSTATE_RATE => set_once(
                &mut interstate_rate,
                KEY_INTERSTATE_RATE,
                parse_decimal(KEY_INTERSTATE_RATE, &value)?,
            )?,
            KEY_FCP_RATE => set_once(
                &mut fcp_rate,
                KEY_FCP_RATE,
                parse_decimal(KEY_FCP_RATE, &value)?,
            )?,
            KEY_DESTINATION_REDUCTION => set_once(
                &mut destination_reduction,
                KEY_DESTINATION_REDUCTION,
                parse_decimal(KEY_DESTINATION_REDUCTION, &value)?,
            )?,
            KEY_ORIGIN_REDUCTION => set_once(
                &mut origin_reduction,
                KEY_ORIGIN_REDUCTION,
                parse_decimal(KEY_ORIGIN_REDUCTION, &value)?,
            )?,
            KEY_MARKUP => set_once(
                &mut markup_pct,
                KEY_MARKUP,
                parse_decimal(KEY_MARKUP, &value)?,
            )?,
            KEY_MARKUP_ENABLED => set_once(
                &mut markup_enabled,
                KEY_MARKUP_ENABLED,
                parse_flag(KEY_MARKUP_ENABLED, &value)?,
            )?,
            KEY_IMPORTED_GOODS => set_once(
                &mut imported_goods,
                KEY_IMPORTED_GOODS,
                parse_flag(KEY_IMPORTED_GOODS, &value)?,
            )?,
            other => return Err(ShareError::UnknownKey(other.to_string())),
        }
    }

    Ok(TransactionInput {
        amount: amount.ok_or(ShareError::MissingKey(KEY_AMOUNT))?,
        origin: origin.ok_or(ShareError::MissingKey(KEY_ORIGIN))?,
        destination: destination.ok_or(ShareError::MissingKey(KEY_DESTINATION))?,
        internal_rate: internal_rate.ok_or(ShareError::MissingKey(KEY_INTERNAL_RATE))?,
        interstate_rate: interstate_rate.ok_or(ShareError::MissingKey(KEY_INTERSTATE_RATE))?,
        fcp_rate: fcp_rate.unwrap_or_default(),
        destination_reduction: destination_reduction.unwrap_or_default(),
        origin_reduction: origin_reduction.unwrap_or_default(),
        markup_pct: markup_pct.unwrap_or_default(),
        markup_enabled: markup_enabled.unwrap_or(false),
        imported_goods: imported_goods.unwrap_or(false),
    })
}

fn set_once<T>(slot: &mut Option<T>, key: &'static str, value: T) -> Result<(), ShareError> {
    if slot.is_some() {
        return Err(ShareError::DuplicateKey(key));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_decimal(key: &'static str, value: &str) -> Result<Decimal, ShareError> {
    value.parse().map_err(|_| ShareError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_uf(key: &'static str, value: &str) -> Result<Uf, ShareError> {
    Uf::parse(value).ok_or_else(|| ShareError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ShareError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ShareError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Uf;

/// One inter-state transaction, with every rate pinned to a concrete
/// value.
///
/// Percentage fields are human-range values (18 means 18%); the
/// calculator converts them to fractions. Building one of these is the
/// job of the engine (resolver-backed) or of an edge codec such as the
/// share string, which is why there is no constructor with defaults
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Transaction amount in reais, before any markup.
    pub amount: Decimal,
    pub origin: Uf,
    pub destination: Uf,
    /// Internal ICMS rate of the destination UF, percent.
    pub internal_rate: Decimal,
    /// Inter-state ICMS rate for the (origin, destination) pair, percent.
    pub interstate_rate: Decimal,
    /// FCP surcharge rate of the destination UF, percent.
    pub fcp_rate: Decimal,
    /// Taxable-base reduction granted by the destination, percent.
    pub destination_reduction: Decimal,
    /// Taxable-base reduction granted by the origin, percent. Carried
    /// for the record but never enters the computed figures.
    pub origin_reduction: Decimal,
    /// MVA markup applied on top of the amount, percent.
    pub markup_pct: Decimal,
    /// Whether the markup is applied at all.
    pub markup_enabled: bool,
    /// Imported-goods rule (Resolução 13/2012): forces the 4%
    /// inter-state rate regardless of `interstate_rate`.
    pub imported_goods: bool,
}

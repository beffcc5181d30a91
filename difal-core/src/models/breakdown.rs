use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The computed DIFAL and FCP figures for one transaction.
///
/// Recomputed from scratch on every calculation. Carries the
/// intermediate bases and the rate actually applied so a presentation
/// layer can display them without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Amount after the optional markup, in reais.
    pub effective_base: Decimal,
    /// Taxable base at the destination after its reduction, in reais.
    pub destination_base: Decimal,
    /// Inter-state rate actually applied, percent. Differs from the
    /// input rate when the imported-goods override fires.
    pub interstate_rate_applied: Decimal,
    /// Gross-up rate differential (ai - ae) / (1 - ai), as a fraction.
    /// Kept at full precision; round only for display.
    pub rate_differential: Decimal,
    /// DIFAL owed to the destination, in reais. Negative when the
    /// inter-state rate exceeds the internal rate and the policy is to
    /// report it as computed.
    pub difal_amount: Decimal,
    /// FCP surcharge owed to the destination, in reais.
    pub fcp_amount: Decimal,
    /// True when a negative differential was clamped to zero by policy.
    pub clamped: bool,
}

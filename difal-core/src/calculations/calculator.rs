//! DIFAL and FCP calculation for a single inter-state transaction.
//!
//! This module implements the rate-differential calculation owed to the
//! destination UF on consumer-facing inter-state sales, using the
//! "base única" method with the gross-up ("por dentro") differential.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Effective base: amount, plus the MVA markup when enabled |
//! | 2    | Destination taxable base: effective base × (1 − destination reduction) |
//! | 3    | Inter-state rate: the input rate, or 4% under the imported-goods rule |
//! | 4    | Rate differential: (ai − ae) ÷ (1 − ai), zero when ai is zero |
//! | 5    | DIFAL: destination base × differential, negatives per policy |
//! | 6    | FCP: destination base × FCP rate |
//!
//! Monetary steps are rounded to centavos half-up; the differential is
//! kept at full precision so the DIFAL rounds only once.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use difal_core::calculations::{CalculatorConfig, DifalCalculator};
//! use difal_core::models::{TransactionInput, Uf};
//!
//! let input = TransactionInput {
//!     amount: dec!(1000.00),
//!     origin: Uf::Sp,
//!     destination: Uf::Ba,
//!     internal_rate: dec!(18),
//!     interstate_rate: dec!(7),
//!     fcp_rate: dec!(2),
//!     destination_reduction: dec!(0),
//!     origin_reduction: dec!(0),
//!     markup_pct: dec!(0),
//!     markup_enabled: false,
//!     imported_goods: false,
//! };
//!
//! let calculator = DifalCalculator::new(CalculatorConfig::default());
//! let breakdown = calculator.compute(&input).unwrap();
//!
//! assert_eq!(breakdown.difal_amount, dec!(134.15));
//! assert_eq!(breakdown.fcp_amount, dec!(20.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{max, round_half_up, to_fraction};
use crate::models::{TaxBreakdown, TransactionInput};

/// Inter-state rate forced by the imported-goods rule of Resolução
/// 13/2012, in percent.
pub const IMPORTED_GOODS_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Errors for transaction fields that fail validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The transaction amount must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A rate or reduction lies outside the 0-100% range.
    #[error("{field} must be between 0% and 100%, got {value}%")]
    PercentOutOfRange { field: &'static str, value: Decimal },

    /// The MVA markup cannot be negative. Unlike the rates it has no
    /// upper bound; markups above 100% are common.
    #[error("markup must not be negative, got {0}%")]
    NegativeMarkup(Decimal),
}

/// Errors that can occur during a DIFAL calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A transaction field failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// An internal rate at or above 100% makes the gross-up divisor
    /// (1 − ai) zero or negative.
    #[error("internal rate of {0}% leaves no gross-up divisor")]
    ArithmeticDegenerate(Decimal),
}

/// Policy for a negative rate differential, which appears whenever the
/// inter-state rate exceeds the destination's internal rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegativeDifferential {
    /// Report the negative DIFAL as computed. No state refunds the
    /// difference, but the figure is what the formula yields.
    #[default]
    Report,

    /// Clamp the DIFAL to zero and set `clamped` on the breakdown.
    Clamp,
}

/// Configuration for the DIFAL calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// How a negative differential is reported.
    pub negative_differential: NegativeDifferential,
}

/// Calculator for DIFAL and FCP on one inter-state transaction.
///
/// The calculator is pure: every figure is recomputed from the
/// transaction input on each call and nothing is cached between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifalCalculator {
    config: CalculatorConfig,
}

impl DifalCalculator {
    /// Creates a new calculator with the given configuration.
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// Calculates the full breakdown for one transaction.
    ///
    /// This is the main entry point. It validates the input, applies
    /// the imported-goods override, derives the bases and the gross-up
    /// differential, and returns every intermediate figure.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if:
    /// - the amount is zero or negative
    /// - a rate or reduction lies outside 0-100%
    /// - the markup is negative
    /// - the internal rate is at or above 100%
    pub fn compute(&self, input: &TransactionInput) -> Result<TaxBreakdown, CalculationError> {
        self.validate(input)?;

        // Apply the imported-goods override before anything else; every
        // later step sees only the applied rate.
        let interstate_rate_applied = self.applied_interstate_rate(input);

        // Base after the optional markup.
        let effective_base = self.effective_base(input);

        // Taxable base at the destination.
        let destination_base =
            self.destination_base(effective_base, input.destination_reduction);

        // Gross-up differential, kept at full precision.
        let rate_differential =
            self.rate_differential(input.internal_rate, interstate_rate_applied);

        // DIFAL, with the negative policy applied.
        let (difal_amount, clamped) = self.difal_amount(destination_base, rate_differential);

        // FCP surcharge on the same base.
        let fcp_amount = self.fcp_amount(destination_base, input.fcp_rate);

        Ok(TaxBreakdown {
            effective_base,
            destination_base,
            interstate_rate_applied,
            rate_differential,
            difal_amount,
            fcp_amount,
            clamped,
        })
    }

    /// Validates every field, reporting the first violation found.
    fn validate(&self, input: &TransactionInput) -> Result<(), CalculationError> {
        if input.amount <= Decimal::ZERO {
            return Err(InputError::NonPositiveAmount(input.amount).into());
        }
        if input.internal_rate < Decimal::ZERO {
            return Err(InputError::PercentOutOfRange {
                field: "internal rate",
                value: input.internal_rate,
            }
            .into());
        }
        if input.internal_rate >= Decimal::ONE_HUNDRED {
            return Err(CalculationError::ArithmeticDegenerate(input.internal_rate));
        }
        percent_in_range("inter-state rate", input.interstate_rate)?;
        percent_in_range("FCP rate", input.fcp_rate)?;
        percent_in_range("destination reduction", input.destination_reduction)?;
        percent_in_range("origin reduction", input.origin_reduction)?;
        if input.markup_pct < Decimal::ZERO {
            return Err(InputError::NegativeMarkup(input.markup_pct).into());
        }
        if input.origin == input.destination {
            warn!(
                uf = %input.origin,
                "origin and destination are the same UF; DIFAL normally applies to inter-state transactions"
            );
        }
        Ok(())
    }

    /// Applies the imported-goods override when flagged.
    fn applied_interstate_rate(&self, input: &TransactionInput) -> Decimal {
        if input.imported_goods {
            IMPORTED_GOODS_RATE
        } else {
            input.interstate_rate
        }
    }

    /// Calculates the base after the optional MVA markup.
    fn effective_base(&self, input: &TransactionInput) -> Decimal {
        if input.markup_enabled {
            round_half_up(input.amount * (Decimal::ONE + to_fraction(input.markup_pct)))
        } else {
            round_half_up(input.amount)
        }
    }

    /// Calculates the taxable base at the destination.
    fn destination_base(&self, effective_base: Decimal, reduction_pct: Decimal) -> Decimal {
        round_half_up(effective_base * (Decimal::ONE - to_fraction(reduction_pct)))
    }

    /// Calculates the gross-up differential (ai − ae) ÷ (1 − ai) as a
    /// fraction. Zero when the internal rate is zero, which covers
    /// exempt destinations.
    fn rate_differential(&self, internal_pct: Decimal, interstate_pct: Decimal) -> Decimal {
        let internal = to_fraction(internal_pct);
        if internal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let interstate = to_fraction(interstate_pct);
        (internal - interstate) / (Decimal::ONE - internal)
    }

    /// Calculates the DIFAL, applying the negative-differential policy.
    fn difal_amount(&self, destination_base: Decimal, differential: Decimal) -> (Decimal, bool) {
        let raw = round_half_up(destination_base * differential);
        if raw >= Decimal::ZERO {
            return (raw, false);
        }
        match self.config.negative_differential {
            NegativeDifferential::Report => {
                warn!(
                    difal = %raw,
                    "inter-state rate exceeds the internal rate; reporting negative DIFAL"
                );
                (raw, false)
            }
            NegativeDifferential::Clamp => {
                warn!(
                    difal = %raw,
                    "inter-state rate exceeds the internal rate; clamping DIFAL to zero"
                );
                (max(raw, Decimal::ZERO), true)
            }
        }
    }

    /// Calculates the FCP surcharge on the destination base.
    fn fcp_amount(&self, destination_base: Decimal, fcp_pct: Decimal) -> Decimal {
        round_half_up(destination_base * to_fraction(fcp_pct))
    }
}

fn percent_in_range(field: &'static str, value: Decimal) -> Result<(), InputError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(InputError::PercentOutOfRange { field, value });
    }
    Ok(())
}

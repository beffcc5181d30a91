//! The façade that turns a partially specified request into a computed
//! breakdown.
//!
//! A calculation can mix sources: every rate typed in, rates taken from
//! the published tables, a markup driven by the NCM code. One engine
//! covers all of it; a request says, per value, whether it is supplied
//! or should be resolved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::{CalculationError, CalculatorConfig, DifalCalculator};
use crate::models::{ReferenceTables, TaxBreakdown, TransactionInput, Uf};
use crate::resolver::{RateResolver, ResolveError};

/// Where a single rate comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RateSpec {
    /// The user typed the rate, in percent.
    Manual(Decimal),
    /// Look the rate up in the reference tables.
    #[default]
    Resolved,
}

/// Where the MVA markup comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarkupSpec {
    /// No markup.
    #[default]
    Disabled,
    /// The user typed the markup, in percent.
    Manual(Decimal),
    /// Resolve the markup from the NCM prefix table.
    Resolved { ncm_code: String },
}

/// A transaction where any rate may still need resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Transaction amount in reais.
    pub amount: Decimal,
    pub origin: Uf,
    pub destination: Uf,
    pub internal_rate: RateSpec,
    pub interstate_rate: RateSpec,
    /// FCP rate in percent. Always user-supplied; there is no published
    /// FCP table here.
    pub fcp_rate: Decimal,
    /// Destination base reduction, percent.
    pub destination_reduction: Decimal,
    /// Origin base reduction, percent (informational).
    pub origin_reduction: Decimal,
    pub markup: MarkupSpec,
    /// Imported-goods rule; forces the 4% inter-state rate.
    pub imported_goods: bool,
}

/// Errors from the engine: either a lookup failed or the calculation
/// itself rejected the assembled input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A requested rate could not be found in the tables.
    #[error("rate lookup failed: {0}")]
    RateNotFound(#[from] ResolveError),

    /// The assembled input failed validation or was degenerate.
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

/// A fully resolved input together with its computed breakdown.
///
/// Callers get both because the displayed figures include the rates
/// that were applied, not just the derived amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub input: TransactionInput,
    pub breakdown: TaxBreakdown,
}

/// Resolver and calculator behind one entry point.
#[derive(Debug, Clone)]
pub struct DifalEngine<'a> {
    resolver: RateResolver<'a>,
    calculator: DifalCalculator,
}

impl<'a> DifalEngine<'a> {
    /// Creates an engine over the given tables.
    pub fn new(tables: &'a ReferenceTables, config: CalculatorConfig) -> Self {
        Self {
            resolver: RateResolver::new(tables),
            calculator: DifalCalculator::new(config),
        }
    }

    /// Resolves every open rate in the request and computes the
    /// breakdown in one step.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateNotFound`] when a resolved rate or
    /// markup is missing from the tables, and
    /// [`EngineError::Calculation`] when the assembled input fails
    /// validation.
    pub fn compute(&self, request: &TransactionRequest) -> Result<Calculation, EngineError> {
        let input = self.assemble(request)?;
        let breakdown = self.calculator.compute(&input)?;
        Ok(Calculation { input, breakdown })
    }

    /// Pins every rate in the request to a concrete value.
    ///
    /// The result is what the calculator, the share codec and the
    /// summary all work from, so resolution happens exactly once.
    pub fn assemble(&self, request: &TransactionRequest) -> Result<TransactionInput, ResolveError> {
        let internal_rate = match request.internal_rate {
            RateSpec::Manual(rate) => rate,
            RateSpec::Resolved => self.resolver.internal_rate(request.destination)?,
        };
        let interstate_rate = match request.interstate_rate {
            RateSpec::Manual(rate) => rate,
            RateSpec::Resolved => self
                .resolver
                .interstate_rate(request.origin, request.destination)?,
        };
        let (markup_pct, markup_enabled) = match &request.markup {
            MarkupSpec::Disabled => (Decimal::ZERO, false),
            MarkupSpec::Manual(pct) => (*pct, true),
            MarkupSpec::Resolved { ncm_code } => {
                (self.resolver.markup(ncm_code)?.markup_pct, true)
            }
        };

        Ok(TransactionInput {
            amount: request.amount,
            origin: request.origin,
            destination: request.destination,
            internal_rate,
            interstate_rate,
            fcp_rate: request.fcp_rate,
            destination_reduction: request.destination_reduction,
            origin_reduction: request.origin_reduction,
            markup_pct,
            markup_enabled,
            imported_goods: request.imported_goods,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::calculations::InputError;
    use crate::models::{InternalRateTable, InterstateRateTable, MarkupTable, TableKind};

    use super::*;

    fn test_tables() -> ReferenceTables {
        ReferenceTables {
            internal_rates: InternalRateTable::new([(Uf::Ba, dec!(18)), (Uf::Rj, dec!(22))]),
            interstate_rates: InterstateRateTable::new([
                ((Uf::Sp, Uf::Ba), dec!(7)),
                ((Uf::Sp, Uf::Rj), dec!(12)),
            ]),
            markups: MarkupTable::new([("8471", dec!(40))]),
            products: Default::default(),
        }
    }

    fn test_request() -> TransactionRequest {
        TransactionRequest {
            amount: dec!(1000.00),
            origin: Uf::Sp,
            destination: Uf::Ba,
            internal_rate: RateSpec::Resolved,
            interstate_rate: RateSpec::Resolved,
            fcp_rate: dec!(2),
            destination_reduction: dec!(0),
            origin_reduction: dec!(0),
            markup: MarkupSpec::Disabled,
            imported_goods: false,
        }
    }

    #[test]
    fn resolves_rates_from_the_tables() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let calculation = engine.compute(&test_request()).unwrap();

        assert_eq!(calculation.input.internal_rate, dec!(18));
        assert_eq!(calculation.input.interstate_rate, dec!(7));
        assert_eq!(calculation.breakdown.difal_amount, dec!(134.15));
        assert_eq!(calculation.breakdown.fcp_amount, dec!(20.00));
    }

    #[test]
    fn manual_rates_bypass_the_tables_entirely() {
        // Empty tables; nothing to resolve from.
        let tables = ReferenceTables::default();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.internal_rate = RateSpec::Manual(dec!(18));
        request.interstate_rate = RateSpec::Manual(dec!(7));

        let calculation = engine.compute(&request).unwrap();

        assert_eq!(calculation.breakdown.difal_amount, dec!(134.15));
    }

    #[test]
    fn manual_and_resolved_rates_mix() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.internal_rate = RateSpec::Manual(dec!(20));

        let calculation = engine.compute(&request).unwrap();

        assert_eq!(calculation.input.internal_rate, dec!(20));
        assert_eq!(calculation.input.interstate_rate, dec!(7));
    }

    #[test]
    fn resolved_markup_comes_from_the_ncm_table() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.markup = MarkupSpec::Resolved {
            ncm_code: "8471.30.99".to_string(),
        };

        let calculation = engine.compute(&request).unwrap();

        assert_eq!(calculation.input.markup_pct, dec!(40));
        assert!(calculation.input.markup_enabled);
        assert_eq!(calculation.breakdown.effective_base, dec!(1400.00));
    }

    #[test]
    fn manual_markup_is_applied_as_entered() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.markup = MarkupSpec::Manual(dec!(25));

        let calculation = engine.compute(&request).unwrap();

        assert_eq!(calculation.input.markup_pct, dec!(25));
        assert!(calculation.input.markup_enabled);
        assert_eq!(calculation.breakdown.effective_base, dec!(1250.00));
    }

    #[test]
    fn disabled_markup_assembles_as_zero() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let input = engine.assemble(&test_request()).unwrap();

        assert_eq!(input.markup_pct, dec!(0));
        assert!(!input.markup_enabled);
    }

    #[test]
    fn missing_internal_rate_surfaces_as_rate_not_found() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.destination = Uf::Am;

        let result = engine.compute(&request);

        assert_eq!(
            result,
            Err(EngineError::RateNotFound(
                ResolveError::InternalRateNotFound(Uf::Am)
            ))
        );
    }

    #[test]
    fn unloaded_tables_surface_as_rate_not_found() {
        let tables = ReferenceTables::default();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let result = engine.compute(&test_request());

        assert_eq!(
            result,
            Err(EngineError::RateNotFound(ResolveError::TableUnavailable(
                TableKind::InternalRates
            )))
        );
    }

    #[test]
    fn validation_failures_surface_as_calculation_errors() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.amount = dec!(0);

        let result = engine.compute(&request);

        assert_eq!(
            result,
            Err(EngineError::Calculation(CalculationError::InvalidInput(
                InputError::NonPositiveAmount(dec!(0))
            )))
        );
    }

    #[test]
    fn imported_goods_flag_travels_through_assembly() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());

        let mut request = test_request();
        request.imported_goods = true;

        let calculation = engine.compute(&request).unwrap();

        assert!(calculation.input.imported_goods);
        assert_eq!(calculation.breakdown.interstate_rate_applied, dec!(4));
    }

    #[test]
    fn calculation_serializes_for_a_presentation_layer() {
        let tables = test_tables();
        let engine = DifalEngine::new(&tables, CalculatorConfig::default());
        let calculation = engine.compute(&test_request()).unwrap();

        let json = serde_json::to_string(&calculation).unwrap();
        let back: Calculation = serde_json::from_str(&json).unwrap();

        assert_eq!(back, calculation);
    }
}

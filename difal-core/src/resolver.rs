//! Rate and markup lookups over injected reference tables.
//!
//! The resolver never computes anything; it answers "which rate applies"
//! questions from the tables it is given and reports precise misses so a
//! caller can tell an absent table from an absent entry.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{normalize_ncm, MarkupEntry, ReferenceTables, TableKind, Uf};

/// Errors raised when a lookup cannot be answered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The table has no entries at all, usually because it was never
    /// loaded. Distinct from a miss on a populated table.
    #[error("the {0} table has no entries")]
    TableUnavailable(TableKind),

    /// The internal-rate table has no entry for the destination UF.
    #[error("no internal rate for {0}")]
    InternalRateNotFound(Uf),

    /// The inter-state table has no entry for the pair, at either the
    /// origin or the destination level.
    #[error("no inter-state rate from {origin} to {destination}")]
    InterstateRateNotFound { origin: Uf, destination: Uf },

    /// No markup prefix matches the NCM code.
    #[error("no markup entry matches NCM \"{0}\"")]
    MarkupNotFound(String),
}

/// Read-only view over a set of reference tables.
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> RateResolver<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// Looks up the internal rate of the destination UF, in percent.
    pub fn internal_rate(&self, destination: Uf) -> Result<Decimal, ResolveError> {
        if self.tables.internal_rates.is_empty() {
            return Err(ResolveError::TableUnavailable(TableKind::InternalRates));
        }
        self.tables
            .internal_rates
            .get(destination)
            .ok_or(ResolveError::InternalRateNotFound(destination))
    }

    /// Looks up the inter-state rate for an (origin, destination) pair,
    /// in percent.
    pub fn interstate_rate(&self, origin: Uf, destination: Uf) -> Result<Decimal, ResolveError> {
        if self.tables.interstate_rates.is_empty() {
            return Err(ResolveError::TableUnavailable(TableKind::InterstateRates));
        }
        self.tables
            .interstate_rates
            .get(origin, destination)
            .ok_or(ResolveError::InterstateRateNotFound {
                origin,
                destination,
            })
    }

    /// Finds the markup entry whose prefix matches the NCM code.
    ///
    /// The code is normalized to digits first, so "8471.30.99" and
    /// "84713099" resolve identically. When several prefixes match, the
    /// longest one wins; the table keeps its entries ordered for that.
    pub fn markup(&self, ncm_code: &str) -> Result<&'a MarkupEntry, ResolveError> {
        if self.tables.markups.is_empty() {
            return Err(ResolveError::TableUnavailable(TableKind::Markups));
        }
        let digits = normalize_ncm(ncm_code);
        self.tables
            .markups
            .entries()
            .iter()
            .find(|entry| digits.starts_with(entry.prefix.as_str()))
            .ok_or_else(|| ResolveError::MarkupNotFound(ncm_code.trim().to_string()))
    }

    /// Looks up the product description for a full NCM code, if the
    /// registry knows it.
    pub fn product_description(&self, ncm_code: &str) -> Option<&'a str> {
        self.tables.products.description(&normalize_ncm(ncm_code))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{
        InternalRateTable, InterstateRateTable, MarkupTable, ProductRegistry,
    };

    use super::*;

    fn test_tables() -> ReferenceTables {
        ReferenceTables {
            internal_rates: InternalRateTable::new([(Uf::Sp, dec!(18)), (Uf::Ba, dec!(20.5))]),
            interstate_rates: InterstateRateTable::new([
                ((Uf::Sp, Uf::Ba), dec!(7)),
                ((Uf::Sp, Uf::Rj), dec!(12)),
            ]),
            markups: MarkupTable::new([
                ("8471", dec!(38.9)),
                ("847130", dec!(42.0)),
                ("85", dec!(30.0)),
            ]),
            products: ProductRegistry::new([("84713099", "Portátil de processamento de dados")]),
        }
    }

    // =========================================================================
    // Internal rates
    // =========================================================================

    #[test]
    fn internal_rate_hits_a_loaded_destination() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(resolver.internal_rate(Uf::Ba), Ok(dec!(20.5)));
    }

    #[test]
    fn internal_rate_reports_the_missing_destination() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.internal_rate(Uf::Am),
            Err(ResolveError::InternalRateNotFound(Uf::Am))
        );
    }

    #[test]
    fn internal_rate_reports_an_unloaded_table() {
        let tables = ReferenceTables::default();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.internal_rate(Uf::Sp),
            Err(ResolveError::TableUnavailable(TableKind::InternalRates))
        );
    }

    // =========================================================================
    // Inter-state rates
    // =========================================================================

    #[test]
    fn interstate_rate_hits_a_loaded_pair() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(resolver.interstate_rate(Uf::Sp, Uf::Ba), Ok(dec!(7)));
    }

    #[test]
    fn interstate_rate_misses_on_an_unknown_destination() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.interstate_rate(Uf::Sp, Uf::Am),
            Err(ResolveError::InterstateRateNotFound {
                origin: Uf::Sp,
                destination: Uf::Am,
            })
        );
    }

    #[test]
    fn interstate_rate_misses_on_an_unknown_origin() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.interstate_rate(Uf::Ba, Uf::Sp),
            Err(ResolveError::InterstateRateNotFound {
                origin: Uf::Ba,
                destination: Uf::Sp,
            })
        );
    }

    #[test]
    fn interstate_rate_reports_an_unloaded_table() {
        let tables = ReferenceTables::default();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.interstate_rate(Uf::Sp, Uf::Ba),
            Err(ResolveError::TableUnavailable(TableKind::InterstateRates))
        );
    }

    // =========================================================================
    // Markups
    // =========================================================================

    #[test]
    fn markup_prefers_the_longest_matching_prefix() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        let entry = resolver.markup("84713099").unwrap();

        assert_eq!(entry.prefix, "847130");
        assert_eq!(entry.markup_pct, dec!(42.0));
    }

    #[test]
    fn markup_falls_back_to_a_shorter_prefix() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        let entry = resolver.markup("84719999").unwrap();

        assert_eq!(entry.prefix, "8471");
        assert_eq!(entry.markup_pct, dec!(38.9));
    }

    #[test]
    fn markup_normalizes_formatted_codes() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        let entry = resolver.markup("8471.30.99").unwrap();

        assert_eq!(entry.prefix, "847130");
    }

    #[test]
    fn markup_reports_a_code_no_prefix_matches() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.markup("22030000"),
            Err(ResolveError::MarkupNotFound("22030000".to_string()))
        );
    }

    #[test]
    fn markup_reports_an_unloaded_table() {
        let tables = ReferenceTables::default();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.markup("84713099"),
            Err(ResolveError::TableUnavailable(TableKind::Markups))
        );
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[test]
    fn product_description_matches_normalized_codes() {
        let tables = test_tables();
        let resolver = RateResolver::new(&tables);

        assert_eq!(
            resolver.product_description("8471.30.99"),
            Some("Portátil de processamento de dados")
        );
        assert_eq!(resolver.product_description("22030000"), None);
    }
}

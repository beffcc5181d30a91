//! The 2025 reference snapshot compiled into the crate.
//!
//! Internal rates, markups and products ship as JSON assets; the
//! inter-state matrix is generated from the regional rule instead of
//! being written out pair by pair.

use difal_core::models::{InterstateRateTable, ReferenceTables, Region, Uf};
use rust_decimal::Decimal;

use crate::loader::{TableLoadError, TableLoader};

const INTERNAL_RATES_2025: &str = include_str!("../data/internal_rates.json");
const MARKUPS_2025: &str = include_str!("../data/markups.json");
const PRODUCTS_2025: &str = include_str!("../data/products.json");

/// Builds the bundled 2025 tables.
///
/// The JSON assets go through the same parsing and validation as any
/// user-supplied file.
pub fn bundled_tables() -> Result<ReferenceTables, TableLoadError> {
    Ok(ReferenceTables {
        internal_rates: TableLoader::parse_internal_rates(INTERNAL_RATES_2025.as_bytes())?,
        interstate_rates: default_interstate_rates(),
        markups: TableLoader::parse_markups(MARKUPS_2025.as_bytes())?,
        products: TableLoader::parse_products(PRODUCTS_2025.as_bytes())?,
    })
}

/// Builds the general inter-state matrix from the rule of Resolução do
/// Senado 22/1989: 7% from the South and Southeast (except Espírito
/// Santo) into the North, Northeast, Center-West and Espírito Santo;
/// 12% on every other pair.
///
/// The 4% imported-goods rate is not a table entry; the calculator
/// applies it as an override.
pub fn default_interstate_rates() -> InterstateRateTable {
    let mut rates = Vec::new();
    for origin in Uf::ALL {
        for destination in Uf::ALL {
            if origin != destination {
                rates.push(((origin, destination), general_rate(origin, destination)));
            }
        }
    }
    InterstateRateTable::new(rates)
}

fn general_rate(origin: Uf, destination: Uf) -> Decimal {
    let from_south_or_southeast =
        matches!(origin.region(), Region::South | Region::Southeast) && origin != Uf::Es;
    let to_favored = destination == Uf::Es
        || matches!(
            destination.region(),
            Region::North | Region::Northeast | Region::CenterWest
        );
    if from_south_or_southeast && to_favored {
        Decimal::from(7)
    } else {
        Decimal::from(12)
    }
}

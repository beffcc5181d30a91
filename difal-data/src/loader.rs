use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use difal_core::models::{
    InternalRateTable, InterstateRateTable, MarkupTable, ProductRegistry, ReferenceTables,
    TableKind,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// File name `load_dir` expects for the internal rate table.
pub const INTERNAL_RATES_FILE: &str = "internal_rates.json";
/// File name `load_dir` expects for the inter-state rate table.
pub const INTERSTATE_RATES_FILE: &str = "interstate_rates.json";
/// File name `load_dir` expects for the markup table.
pub const MARKUPS_FILE: &str = "markups.json";
/// File name `load_dir` expects for the product registry.
pub const PRODUCTS_FILE: &str = "products.json";

/// Errors that can occur when loading reference tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} table: JSON parse error: {message}")]
    JsonParse { table: TableKind, message: String },

    #[error("{table} table: rate for {key} must be between 0% and 100%, got {value}")]
    RateOutOfRange {
        table: TableKind,
        key: String,
        value: Decimal,
    },

    #[error("markup table: markup for prefix \"{prefix}\" must not be negative, got {value}")]
    NegativeMarkup { prefix: String, value: Decimal },

    #[error("markup table: prefix \"{0}\" must be one or more digits")]
    MalformedPrefix(String),
}

/// Loader for the JSON reference tables.
///
/// The wire formats are flat maps: internal rates are keyed by UF code,
/// inter-state rates by origin then destination, markups by NCM prefix
/// and products by full NCM code. Every parse validates its values, so
/// a table that loads is a table the resolver can trust.
///
/// An empty map is valid here; the resolver reports empty tables as
/// unavailable at lookup time.
pub struct TableLoader;

impl TableLoader {
    /// Parses the internal rate table (`{"SP": 18.0, ...}`).
    pub fn parse_internal_rates<R: Read>(reader: R) -> Result<InternalRateTable, TableLoadError> {
        let table: InternalRateTable = serde_json::from_reader(reader)
            .map_err(|e| json_parse(TableKind::InternalRates, e))?;
        for (uf, rate) in table.iter() {
            check_rate(TableKind::InternalRates, uf.as_str(), rate)?;
        }
        Ok(table)
    }

    /// Parses the inter-state rate table (`{"SP": {"BA": 7.0, ...}, ...}`).
    pub fn parse_interstate_rates<R: Read>(
        reader: R,
    ) -> Result<InterstateRateTable, TableLoadError> {
        let table: InterstateRateTable = serde_json::from_reader(reader)
            .map_err(|e| json_parse(TableKind::InterstateRates, e))?;
        for (origin, destination, rate) in table.iter() {
            check_rate(
                TableKind::InterstateRates,
                &format!("{origin}->{destination}"),
                rate,
            )?;
        }
        Ok(table)
    }

    /// Parses the markup table (`{"8471": 38.9, ...}`).
    ///
    /// Prefixes must be plain digit strings; a markup may exceed 100%
    /// but never be negative.
    pub fn parse_markups<R: Read>(reader: R) -> Result<MarkupTable, TableLoadError> {
        let table: MarkupTable =
            serde_json::from_reader(reader).map_err(|e| json_parse(TableKind::Markups, e))?;
        for entry in table.entries() {
            if entry.prefix.is_empty() || !entry.prefix.chars().all(|c| c.is_ascii_digit()) {
                return Err(TableLoadError::MalformedPrefix(entry.prefix.clone()));
            }
            if entry.markup_pct < Decimal::ZERO {
                return Err(TableLoadError::NegativeMarkup {
                    prefix: entry.prefix.clone(),
                    value: entry.markup_pct,
                });
            }
        }
        Ok(table)
    }

    /// Parses the product registry (`{"84713099": "Notebook", ...}`).
    pub fn parse_products<R: Read>(reader: R) -> Result<ProductRegistry, TableLoadError> {
        serde_json::from_reader(reader).map_err(|e| json_parse(TableKind::Products, e))
    }

    /// Loads all four tables from a directory using the conventional
    /// file names.
    pub fn load_dir(dir: &Path) -> Result<ReferenceTables, TableLoadError> {
        Ok(ReferenceTables {
            internal_rates: Self::parse_internal_rates(open(dir, INTERNAL_RATES_FILE)?)?,
            interstate_rates: Self::parse_interstate_rates(open(dir, INTERSTATE_RATES_FILE)?)?,
            markups: Self::parse_markups(open(dir, MARKUPS_FILE)?)?,
            products: Self::parse_products(open(dir, PRODUCTS_FILE)?)?,
        })
    }
}

fn open(dir: &Path, name: &str) -> Result<BufReader<File>, TableLoadError> {
    let path = dir.join(name);
    let file = File::open(&path).map_err(|source| TableLoadError::Io { path, source })?;
    Ok(BufReader::new(file))
}

fn json_parse(table: TableKind, err: serde_json::Error) -> TableLoadError {
    TableLoadError::JsonParse {
        table,
        message: err.to_string(),
    }
}

fn check_rate(table: TableKind, key: &str, value: Decimal) -> Result<(), TableLoadError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(TableLoadError::RateOutOfRange {
            table,
            key: key.to_string(),
            value,
        });
    }
    Ok(())
}

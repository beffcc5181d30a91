use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Uf;

/// Identifies one of the reference tables in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    InternalRates,
    InterstateRates,
    Markups,
    Products,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalRates => "internal rate",
            Self::InterstateRates => "inter-state rate",
            Self::Markups => "markup",
            Self::Products => "product",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips everything but ASCII digits from an NCM code, so formatted
/// codes such as "8471.30.99" compare equal to "84713099".
pub fn normalize_ncm(code: &str) -> String {
    code.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Internal ICMS rate of each destination UF, in percent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternalRateTable(BTreeMap<Uf, Decimal>);

impl InternalRateTable {
    pub fn new(rates: impl IntoIterator<Item = (Uf, Decimal)>) -> Self {
        Self(rates.into_iter().collect())
    }

    pub fn get(&self, destination: Uf) -> Option<Decimal> {
        self.0.get(&destination).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uf, Decimal)> + '_ {
        self.0.iter().map(|(uf, rate)| (*uf, *rate))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inter-state ICMS rate for each (origin, destination) pair, in percent.
/// Stored as a nested map keyed by origin first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterstateRateTable(BTreeMap<Uf, BTreeMap<Uf, Decimal>>);

impl InterstateRateTable {
    pub fn new(rates: impl IntoIterator<Item = ((Uf, Uf), Decimal)>) -> Self {
        let mut map: BTreeMap<Uf, BTreeMap<Uf, Decimal>> = BTreeMap::new();
        for ((origin, destination), rate) in rates {
            map.entry(origin).or_default().insert(destination, rate);
        }
        Self(map)
    }

    pub fn get(&self, origin: Uf, destination: Uf) -> Option<Decimal> {
        self.0.get(&origin)?.get(&destination).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uf, Uf, Decimal)> + '_ {
        self.0.iter().flat_map(|(origin, row)| {
            row.iter()
                .map(|(destination, rate)| (*origin, *destination, *rate))
        })
    }

    /// Number of (origin, destination) pairs across all origins.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One NCM prefix and the MVA markup it carries, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupEntry {
    pub prefix: String,
    pub markup_pct: Decimal,
}

/// MVA markup by NCM prefix.
///
/// Entries are held sorted by descending prefix length so a lookup can
/// take the first match and get the most specific prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTable {
    entries: Vec<MarkupEntry>,
}

impl MarkupTable {
    pub fn new<S, I>(entries: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Decimal)>,
    {
        let mut entries: Vec<MarkupEntry> = entries
            .into_iter()
            .map(|(prefix, markup_pct)| MarkupEntry {
                prefix: prefix.into(),
                markup_pct,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        Self { entries }
    }

    /// All entries, most specific prefix first.
    pub fn entries(&self) -> &[MarkupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MarkupTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let map: BTreeMap<&str, Decimal> = self
            .entries
            .iter()
            .map(|e| (e.prefix.as_str(), e.markup_pct))
            .collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MarkupTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = BTreeMap::<String, Decimal>::deserialize(deserializer)?;
        Ok(Self::new(map))
    }
}

/// Product description by full NCM code (digits only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRegistry(BTreeMap<String, String>);

impl ProductRegistry {
    pub fn new<C, D, I>(products: I) -> Self
    where
        C: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = (C, D)>,
    {
        Self(
            products
                .into_iter()
                .map(|(code, description)| (code.into(), description.into()))
                .collect(),
        )
    }

    /// Looks up a description by exact code. Callers normalize first.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full set of reference tables a resolver works over.
///
/// Tables are plain data passed in by the caller. Nothing here reads
/// files or keeps global state; the data crate owns loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub internal_rates: InternalRateTable,
    pub interstate_rates: InterstateRateTable,
    pub markups: MarkupTable,
    pub products: ProductRegistry,
}

mod breakdown;
mod tables;
mod transaction;
mod uf;

pub use breakdown::TaxBreakdown;
pub use tables::{
    normalize_ncm, InternalRateTable, InterstateRateTable, MarkupEntry, MarkupTable,
    ProductRegistry, ReferenceTables, TableKind,
};
pub use transaction::TransactionInput;
pub use uf::{Region, Uf};

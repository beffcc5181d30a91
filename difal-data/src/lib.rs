pub mod bundled;
pub mod loader;

pub use bundled::{bundled_tables, default_interstate_rates};
pub use loader::{TableLoadError, TableLoader};

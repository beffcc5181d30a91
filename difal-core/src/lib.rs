pub mod calculations;
pub mod engine;
pub mod locale;
pub mod models;
pub mod resolver;
pub mod share;

pub use calculations::{
    CalculationError, CalculatorConfig, DifalCalculator, InputError, NegativeDifferential,
};
pub use engine::{Calculation, DifalEngine, EngineError, MarkupSpec, RateSpec, TransactionRequest};
pub use models::*;
pub use resolver::{RateResolver, ResolveError};
pub use share::ShareError;

//! Calculation logic for the inter-state rate differential.
//!
//! This module holds the DIFAL/FCP calculator and the shared rounding
//! helpers it is built on.

pub mod calculator;
pub mod common;

pub use calculator::{
    CalculationError, CalculatorConfig, DifalCalculator, InputError, NegativeDifferential,
    IMPORTED_GOODS_RATE,
};

//! Integration tests for table loading and the resolve-and-compute flow.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use difal_core::calculations::CalculatorConfig;
use difal_core::engine::{DifalEngine, MarkupSpec, RateSpec, TransactionRequest};
use difal_core::models::Uf;
use difal_data::{bundled_tables, TableLoadError, TableLoader};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/tables")
}

fn test_request(origin: Uf, destination: Uf) -> TransactionRequest {
    TransactionRequest {
        amount: dec!(1000.00),
        origin,
        destination,
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
fn load_dir_reads_all_four_tables() {
    let tables = TableLoader::load_dir(&fixture_dir()).expect("Failed to load fixture tables");

    assert_eq!(tables.internal_rates.len(), 3);
    assert_eq!(tables.interstate_rates.len(), 4);
    assert_eq!(tables.markups.len(), 2);
    assert_eq!(tables.products.len(), 1);
    assert_eq!(tables.internal_rates.get(Uf::Ba), Some(dec!(18)));
    assert_eq!(tables.interstate_rates.get(Uf::Sp, Uf::Ba), Some(dec!(7)));
}

#[test]
fn load_dir_reports_the_missing_file() {
    let result = TableLoader::load_dir(Path::new("no-such-directory"));

    let err = result.expect_err("Should fail for a missing directory");
    let TableLoadError::Io { path, .. } = err else {
        panic!("Expected Io error, got: {err:?}");
    };
    assert!(path.ends_with("internal_rates.json"));
}

#[test]
fn loaded_tables_drive_the_engine_end_to_end() {
    let tables = TableLoader::load_dir(&fixture_dir()).expect("Failed to load fixture tables");
    let engine = DifalEngine::new(&tables, CalculatorConfig::default());

    let calculation = engine
        .compute(&test_request(Uf::Sp, Uf::Ba))
        .expect("Failed to compute");

    assert_eq!(calculation.input.internal_rate, dec!(18));
    assert_eq!(calculation.input.interstate_rate, dec!(7));
    assert_eq!(calculation.breakdown.difal_amount, dec!(134.15));
    assert_eq!(calculation.breakdown.fcp_amount, dec!(20.00));
}

#[test]
fn ncm_markup_resolves_through_loaded_tables() {
    let tables = TableLoader::load_dir(&fixture_dir()).expect("Failed to load fixture tables");
    let engine = DifalEngine::new(&tables, CalculatorConfig::default());

    let mut request = test_request(Uf::Sp, Uf::Ba);
    request.markup = MarkupSpec::Resolved {
        ncm_code: "8471.30.99".to_string(),
    };

    let calculation = engine.compute(&request).expect("Failed to compute");

    // The six-digit prefix (42%) wins over the four-digit one (38.9%).
    assert_eq!(calculation.input.markup_pct, dec!(42.0));
    assert_eq!(calculation.breakdown.effective_base, dec!(1420.00));
    assert_eq!(calculation.breakdown.difal_amount, dec!(190.49));
}

#[test]
fn bundled_snapshot_covers_every_uf_and_pair() {
    let tables = bundled_tables().expect("Failed to build bundled tables");

    assert_eq!(tables.internal_rates.len(), 27);
    assert_eq!(tables.interstate_rates.len(), 702);
    assert!(!tables.markups.is_empty());
    assert!(!tables.products.is_empty());
}

#[test]
fn bundled_snapshot_reproduces_the_reference_scenario() {
    // Amapá keeps an 18% internal rate and sits at the 7% inter-state
    // rate from São Paulo, so the worked example from the calculator
    // docs falls straight out of the bundled tables.
    let tables = bundled_tables().expect("Failed to build bundled tables");
    let engine = DifalEngine::new(&tables, CalculatorConfig::default());

    let calculation = engine
        .compute(&test_request(Uf::Sp, Uf::Ap))
        .expect("Failed to compute");

    assert_eq!(calculation.input.internal_rate, dec!(18));
    assert_eq!(calculation.input.interstate_rate, dec!(7));
    assert_eq!(calculation.breakdown.difal_amount, dec!(134.15));
    assert_eq!(calculation.breakdown.fcp_amount, dec!(20.00));
}

#[test]
fn bundled_snapshot_never_yields_a_negative_differential() {
    // The lowest internal rate in the snapshot is 17%, above both
    // inter-state rates, so every pair in the bundled matrix leaves a
    // positive differential. A negative one takes a manual rate.
    let tables = bundled_tables().expect("Failed to build bundled tables");
    let engine = DifalEngine::new(&tables, CalculatorConfig::default());

    for destination in Uf::ALL {
        if destination == Uf::Sp {
            continue;
        }
        let calculation = engine
            .compute(&test_request(Uf::Sp, destination))
            .expect("Failed to compute");
        assert!(
            calculation.breakdown.difal_amount >= dec!(0),
            "unexpected negative DIFAL shipping to {destination}"
        );
    }
}

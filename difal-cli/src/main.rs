use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use difal_cli::{input, summary};
use difal_core::calculations::{CalculatorConfig, DifalCalculator, NegativeDifferential};
use difal_core::engine::{Calculation, DifalEngine, MarkupSpec, RateSpec, TransactionRequest};
use difal_core::models::{ReferenceTables, Uf};
use difal_core::resolver::RateResolver;
use difal_core::share;
use difal_data::TableLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// DIFAL and FCP calculator for inter-state sales to final consumers.
///
/// Rates left out are resolved from the reference tables (the bundled
/// 2025 snapshot, or a directory passed with `--tables`). The result is
/// printed as the pt-BR summary and worksheet rows.
#[derive(Debug, Parser)]
struct Cli {
    /// Transaction value. Accepts pt-BR ("1.234,56") and plain ("1234.56") formats.
    #[arg(long, required_unless_present = "restore")]
    amount: Option<String>,

    /// Origin UF code (e.g. SP).
    #[arg(long, required_unless_present = "restore")]
    origin: Option<String>,

    /// Destination UF code (e.g. BA).
    #[arg(long, required_unless_present = "restore")]
    destination: Option<String>,

    /// Internal ICMS rate at the destination, in percent.
    /// Resolved from the tables when omitted.
    #[arg(long)]
    internal_rate: Option<String>,

    /// Inter-state ICMS rate, in percent.
    /// Resolved from the tables when omitted.
    #[arg(long)]
    interstate_rate: Option<String>,

    /// FCP rate at the destination, in percent.
    #[arg(long, default_value = "0")]
    fcp: String,

    /// Destination base reduction, in percent.
    #[arg(long, default_value = "0")]
    destination_reduction: String,

    /// Origin base reduction, in percent. Recorded in the share string
    /// but outside the computed figures.
    #[arg(long, default_value = "0")]
    origin_reduction: String,

    /// Markup (MVA) percentage applied on top of the value.
    #[arg(long, conflicts_with = "ncm")]
    markup: Option<String>,

    /// NCM code; the markup is resolved from it by longest-prefix match.
    #[arg(long)]
    ncm: Option<String>,

    /// Price as imported goods: the 4% inter-state rate applies.
    #[arg(long)]
    imported_goods: bool,

    /// Floor a negative DIFAL at zero instead of reporting it.
    #[arg(long)]
    clamp_negative: bool,

    /// Directory holding the reference-table JSON files.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Print the shareable query string for the scenario.
    #[arg(long)]
    share: bool,

    /// Recompute a scenario from a shared query string.
    #[arg(long)]
    restore: Option<String>,
}

// ─── argument assembly ───────────────────────────────────────────────────────

fn parse_uf(flag: &str, code: &str) -> anyhow::Result<Uf> {
    Uf::parse(code).with_context(|| format!("Unknown UF code for {flag}: '{code}'"))
}

fn rate_spec(arg: Option<&String>) -> Result<RateSpec, input::ParseNumberError> {
    match arg {
        Some(s) => Ok(RateSpec::Manual(input::parse_number(s)?)),
        None => Ok(RateSpec::Resolved),
    }
}

fn build_request(cli: &Cli) -> anyhow::Result<TransactionRequest> {
    let (Some(amount), Some(origin), Some(destination)) =
        (&cli.amount, &cli.origin, &cli.destination)
    else {
        anyhow::bail!("--amount, --origin and --destination are required");
    };

    let markup = match (&cli.markup, &cli.ncm) {
        (Some(pct), _) => MarkupSpec::Manual(input::parse_number(pct)?),
        (None, Some(ncm)) => MarkupSpec::Resolved {
            ncm_code: ncm.clone(),
        },
        (None, None) => MarkupSpec::Disabled,
    };

    Ok(TransactionRequest {
        amount: input::parse_number(amount)?,
        origin: parse_uf("--origin", origin)?,
        destination: parse_uf("--destination", destination)?,
        internal_rate: rate_spec(cli.internal_rate.as_ref())?,
        interstate_rate: rate_spec(cli.interstate_rate.as_ref())?,
        fcp_rate: input::parse_number(&cli.fcp)?,
        destination_reduction: input::parse_number(&cli.destination_reduction)?,
        origin_reduction: input::parse_number(&cli.origin_reduction)?,
        markup,
        imported_goods: cli.imported_goods,
    })
}

fn load_tables(cli: &Cli) -> anyhow::Result<ReferenceTables> {
    match &cli.tables {
        Some(dir) => TableLoader::load_dir(dir)
            .with_context(|| format!("Failed to load tables from: {}", dir.display())),
        None => difal_data::bundled_tables().context("Failed to load the bundled tables"),
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = CalculatorConfig {
        negative_differential: if cli.clamp_negative {
            NegativeDifferential::Clamp
        } else {
            NegativeDifferential::Report
        },
    };

    let calculation = match &cli.restore {
        Some(query) => {
            debug!("restoring scenario from a shared query string");
            let input = share::decode(query)?;
            let breakdown = DifalCalculator::new(config).compute(&input)?;
            Calculation { input, breakdown }
        }
        None => {
            let tables = load_tables(&cli)?;
            let request = build_request(&cli)?;
            let calculation = DifalEngine::new(&tables, config).compute(&request)?;
            if let Some(ncm) = &cli.ncm {
                if let Some(description) = RateResolver::new(&tables).product_description(ncm) {
                    println!("Produto: {description}");
                    println!();
                }
            }
            calculation
        }
    };

    println!("{}", summary::resumo(&calculation));
    println!();
    println!("{}", summary::detalhamento(&calculation));

    if cli.share {
        println!();
        println!("Share: {}", share::encode(&calculation.input));
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use difal_core::models::{ReferenceTables, Uf};
use difal_data::{bundled_tables, TableLoader};

/// Inspect and validate a set of DIFAL reference tables.
///
/// Given a directory, loads the four JSON files it is expected to
/// contain (internal_rates.json, interstate_rates.json, markups.json,
/// products.json) and reports on them. Without a directory, inspects
/// the bundled 2025 snapshot.
#[derive(Parser, Debug)]
#[command(name = "difal-tables")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the table files
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Print the validated tables as one JSON document
    #[arg(short, long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = match &args.tables {
        Some(dir) => {
            println!("Loading tables from: {}", dir.display());
            TableLoader::load_dir(dir)
                .with_context(|| format!("Failed to load tables from: {}", dir.display()))?
        }
        None => {
            println!("Inspecting the bundled 2025 snapshot");
            bundled_tables().context("Failed to build the bundled tables")?
        }
    };

    report(&tables);

    if args.dump {
        let json =
            serde_json::to_string_pretty(&tables).context("Failed to serialize the tables")?;
        println!("{json}");
    }

    Ok(())
}

fn report(tables: &ReferenceTables) {
    println!("Internal rates:    {} UFs", tables.internal_rates.len());
    println!("Inter-state rates: {} pairs", tables.interstate_rates.len());
    println!("Markup prefixes:   {}", tables.markups.len());
    println!("Products:          {}", tables.products.len());

    let missing: Vec<&str> = Uf::ALL
        .iter()
        .filter(|uf| tables.internal_rates.get(**uf).is_none())
        .map(|uf| uf.as_str())
        .collect();
    if missing.is_empty() {
        println!("Internal rate coverage: all 27 UFs");
    } else {
        println!("Internal rate coverage: missing {}", missing.join(", "));
    }
}

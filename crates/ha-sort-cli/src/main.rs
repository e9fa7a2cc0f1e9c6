//! Sort entity rows from a snapshot
//!
//! Prints the sorted entity ids, one per line. Set `RUST_LOG` for logging.

mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ha_entity_sort::{SortSpec, Sorter};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(name = "entity-sort")]
#[command(about = "Sort Home Assistant entity rows from a snapshot file")]
struct Args {
    /// Snapshot JSON with states, registries and optional rows
    snapshot: PathBuf,

    /// Sort configuration (YAML or JSON)
    sort: PathBuf,
}

/// Load both files and return entity ids in sorted order
fn run(snapshot_path: &Path, sort_path: &Path) -> Result<Vec<String>> {
    let yaml = fs::read_to_string(sort_path)
        .with_context(|| format!("failed to read sort config {}", sort_path.display()))?;
    let spec = SortSpec::from_yaml_str(&yaml)
        .with_context(|| format!("invalid sort config {}", sort_path.display()))?;

    let mut loaded = Snapshot::load(snapshot_path)?;
    info!(method = %spec.method, reverse = spec.reverse, "Sorting");

    Sorter::new(spec, &loaded.store, &loaded.registries).sort(&mut loaded.rows);
    Ok(loaded.rows.into_iter().map(|r| r.entity).collect())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    for entity in run(&args.snapshot, &args.sort)? {
        println!("{entity}");
    }
    Ok(())
}

//! Dedup command: collapse duplicate records in a scraped output file.

use std::path::PathBuf;

use venuedb_core::AppConfig;
use venuedb_scraper::dedup::dedup_records;

use crate::persist;

#[derive(Debug, clap::Args)]
pub(crate) struct DedupArgs {
    /// Input records file (defaults to the configured output path).
    pub(crate) input: Option<PathBuf>,

    /// Write to a different file instead of in place.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_dedup(config: &AppConfig, args: DedupArgs) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| config.output_path.clone());
    let records = persist::read_records(&input)?;
    let before = records.len();

    let deduped = dedup_records(records);
    let removed = before - deduped.len();

    let output = args.output.unwrap_or(input);
    persist::write_records(&output, &deduped)?;
    println!(
        "kept {} of {before} records ({removed} duplicates removed) -> {}",
        deduped.len(),
        output.display()
    );

    Ok(())
}

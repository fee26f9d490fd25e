//! Command-line interface for pic-man.
//!
//! This module handles argument parsing and drives a full run:
//! - Loading configuration and the metadata database
//! - Validating record types and reporting missing sources
//! - Copying records into the destination tree
//! - Printing the final summary

use crate::config::Config;
use crate::metadata_store::{DEFAULT_DB_PATH, MetadataStore};
use crate::migrator::{MigrateResult, MigrationReport, Migrator};
use crate::output::{OutputFormatter, RunTotals};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Copy a photo/video library into picture|movie/year/month/day folders.
#[derive(Debug, Parser)]
#[command(name = "pic-man", version, about)]
pub struct Cli {
    /// The full path for the pic-man database
    #[arg(long = "db", value_name = "PATH", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,
}

/// Totals reported at the end of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    /// Records in the database, ignored ones included.
    pub loaded: usize,
    /// Active records whose source was missing during validation.
    pub missing: usize,
    pub report: MigrationReport,
}

/// Runs pic-man against the database at `db_path`, discovering configuration
/// the usual way.
///
/// # Examples
///
/// ```no_run
/// use picman::cli::run_cli;
/// use std::path::Path;
///
/// match run_cli(Path::new("./pic-man.db")) {
///     Ok(summary) => println!("Copied {} files", summary.report.copied.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(db_path: &Path) -> MigrateResult<RunSummary> {
    let config = Config::load(None)?;
    run_with_config(db_path, &config)
}

/// Runs pic-man with an explicit configuration.
///
/// Steps, each of which stops the run on a fatal error:
/// 1. Load the database
/// 2. Check every active record has a known type
/// 3. Count active records whose source is missing (reported, not fatal)
/// 4. Copy every active record into the destination tree
pub fn run_with_config(db_path: &Path, config: &Config) -> MigrateResult<RunSummary> {
    let mapper = config.type_mapper()?;

    OutputFormatter::info(&format!("Will load database from {}", db_path.display()));
    let store = MetadataStore::load(db_path)?;
    OutputFormatter::plain(&format!("Loaded {} meta records.", store.len()));

    let migrator =
        Migrator::new(&mapper, &config.destination).with_month_format(config.month_format);

    migrator.validate_types(&store)?;

    let missing = Migrator::count_missing(&store);
    if missing > 0 {
        OutputFormatter::warning(&format!("Missing {} images", missing));
    } else {
        OutputFormatter::plain("Missing 0 images");
    }

    OutputFormatter::header(&format!(
        "Copying into {}",
        migrator.destination_root().display()
    ));
    let progress = OutputFormatter::create_progress_bar(store.active().count() as u64);
    let report = migrator.copy_all(&store, &progress);
    progress.finish_and_clear();
    let report = report?;

    let totals = RunTotals {
        loaded: store.len(),
        ignored: report.ignored,
        missing,
        copied: report.copied.len(),
        skipped: report.skipped_missing.len(),
    };
    OutputFormatter::summary_table(&report.count_by_category(), &totals);
    if !report.skipped_missing.is_empty() {
        OutputFormatter::warning(&format!(
            "Skipped {} records with missing files",
            report.skipped_missing.len()
        ));
    }
    OutputFormatter::success("Migration complete.");

    Ok(RunSummary {
        loaded: store.len(),
        missing,
        report,
    })
}

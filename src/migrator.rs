/// Validation and copying of library records into the destination tree.
///
/// A run validates every active record up front, then copies each one to
/// `<root>/<category>/<year>/<month>/<day>/<basename>`. Unknown types and
/// destination collisions stop the run; missing sources are skipped.
use crate::config::ConfigError;
use crate::destination::{self, MonthFormat};
use crate::media_type::{Category, TypeMapper};
use crate::metadata_store::{MediaRecord, MetadataStore, StoreError};
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Errors that stop a migration run.
#[derive(Debug)]
pub enum MigrateError {
    /// The database could not be loaded.
    Store(StoreError),
    /// The configuration could not be loaded.
    Config(ConfigError),
    /// A record's first extension is not in the type table.
    UnknownType {
        content_hash: String,
        extension: String,
    },
    /// A record is missing data needed to place it.
    MalformedRecord {
        content_hash: String,
        reason: String,
        /// The record as shown by its `Display` impl.
        record: String,
    },
    /// A record's capture date cannot be turned into a calendar date.
    InvalidCaptureDate {
        content_hash: String,
        millis: i64,
        record: String,
    },
    /// Something already exists at the computed destination.
    DestinationExists(PathBuf),
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to copy a file to its destination.
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
}

impl std::fmt::Display for MigrateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{}", e),
            Self::Config(e) => write!(f, "{}", e),
            Self::UnknownType {
                content_hash,
                extension,
            } => write!(
                f,
                "could not map type {} (record {})",
                extension.to_lowercase(),
                content_hash
            ),
            Self::MalformedRecord {
                content_hash,
                reason,
                record,
            } => write!(f, "malformed record {}: {} ({})", content_hash, reason, record),
            Self::InvalidCaptureDate {
                content_hash,
                millis,
                record,
            } => write!(
                f,
                "record {} has an unrepresentable capture date {} ({})",
                content_hash, millis, record
            ),
            Self::DestinationExists(path) => {
                write!(f, "file already exists at {}", path.display())
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::CopyFailed {
                source,
                destination,
                source_error,
            } => write!(
                f,
                "failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                source_error
            ),
        }
    }
}

impl std::error::Error for MigrateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::CopyFailed { source_error, .. } => Some(source_error),
            _ => None,
        }
    }
}

impl From<StoreError> for MigrateError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ConfigError> for MigrateError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// A file that was copied during a run.
#[derive(Debug, Clone)]
pub struct CopiedFile {
    pub content_hash: String,
    pub category: Category,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// What happened to one record.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Copied(CopiedFile),
    /// The record's source file was not on disk.
    SkippedMissing(PathBuf),
    Ignored,
}

/// Outcome of the copy phase.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub copied: Vec<CopiedFile>,
    /// Sources that were missing at copy time.
    pub skipped_missing: Vec<PathBuf>,
    pub ignored: usize,
}

impl MigrationReport {
    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Copied(copied) => self.copied.push(copied),
            RecordOutcome::SkippedMissing(path) => self.skipped_missing.push(path),
            RecordOutcome::Ignored => self.ignored += 1,
        }
    }

    /// Copied file counts per category.
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for copied in &self.copied {
            *counts.entry(copied.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Copies library records into a dated category tree.
pub struct Migrator<'a> {
    mapper: &'a TypeMapper,
    destination_root: PathBuf,
    month_format: MonthFormat,
}

impl<'a> Migrator<'a> {
    pub fn new(mapper: &'a TypeMapper, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            mapper,
            destination_root: destination_root.into(),
            month_format: MonthFormat::default(),
        }
    }

    pub fn with_month_format(mut self, month_format: MonthFormat) -> Self {
        self.month_format = month_format;
        self
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Checks that every active record has a known type.
    ///
    /// # Errors
    ///
    /// Returns the first `UnknownType` (or `MalformedRecord` for a record
    /// with no extensions) encountered, in content-hash order.
    pub fn validate_types(&self, store: &MetadataStore) -> MigrateResult<()> {
        for (hash, record) in store.active() {
            self.classify(hash, record)?;
        }
        Ok(())
    }

    /// Counts active records whose stored file is not on disk.
    ///
    /// A directory at `storedAt` counts as missing.
    pub fn count_missing(store: &MetadataStore) -> usize {
        store
            .active()
            .filter(|(_, record)| !record.stored_at.is_file())
            .count()
    }

    fn classify(&self, hash: &str, record: &MediaRecord) -> MigrateResult<Category> {
        let extension = record
            .extensions
            .first()
            .ok_or_else(|| malformed(hash, record, "no extensions"))?;

        self.mapper
            .classify(extension)
            .ok_or_else(|| MigrateError::UnknownType {
                content_hash: hash.to_string(),
                extension: extension.clone(),
            })
    }

    /// Computes where a record will be copied, including the destination root.
    pub fn plan(&self, hash: &str, record: &MediaRecord) -> MigrateResult<(Category, PathBuf)> {
        let category = self.classify(hash, record)?;

        let original_path = record
            .paths
            .first()
            .ok_or_else(|| malformed(hash, record, "no paths"))?;

        if destination::basename(original_path).is_empty() {
            return Err(malformed(
                hash,
                record,
                &format!("path {} has no file name", original_path),
            ));
        }

        let relative = destination::derive(
            category,
            record.capture_date,
            original_path,
            self.month_format,
        )
        .ok_or_else(|| MigrateError::InvalidCaptureDate {
            content_hash: hash.to_string(),
            millis: record.capture_date,
            record: record.to_string(),
        })?;

        Ok((category, self.destination_root.join(relative)))
    }

    /// Copies a single record to its destination.
    ///
    /// The destination is checked before the source, so an existing
    /// destination is a collision even when the source has gone missing.
    pub fn migrate_record(&self, hash: &str, record: &MediaRecord) -> MigrateResult<RecordOutcome> {
        if record.ignored {
            return Ok(RecordOutcome::Ignored);
        }

        let (category, destination) = self.plan(hash, record)?;

        if destination.exists() {
            return Err(MigrateError::DestinationExists(destination));
        }

        if !record.stored_at.is_file() {
            return Ok(RecordOutcome::SkippedMissing(record.stored_at.clone()));
        }

        let bytes = copy_file(&record.stored_at, &destination)?;

        Ok(RecordOutcome::Copied(CopiedFile {
            content_hash: hash.to_string(),
            category,
            source: record.stored_at.clone(),
            destination,
            bytes,
        }))
    }

    /// Copies every active record, stopping at the first fatal error.
    ///
    /// Files copied before a failure are left in place.
    pub fn copy_all(
        &self,
        store: &MetadataStore,
        progress: &ProgressBar,
    ) -> MigrateResult<MigrationReport> {
        let mut report = MigrationReport::default();

        for (hash, record) in store.iter() {
            let outcome = self.migrate_record(hash, record)?;
            match &outcome {
                RecordOutcome::SkippedMissing(path) => {
                    OutputFormatter::warning_with_progress(
                        progress,
                        &format!("Skipping missing file {}", path.display()),
                    );
                    progress.inc(1);
                }
                RecordOutcome::Copied(copied) => {
                    progress.set_message(copied.destination.display().to_string());
                    progress.inc(1);
                }
                RecordOutcome::Ignored => {}
            }
            report.record(outcome);
        }

        Ok(report)
    }
}

fn malformed(hash: &str, record: &MediaRecord, reason: &str) -> MigrateError {
    MigrateError::MalformedRecord {
        content_hash: hash.to_string(),
        reason: reason.to_string(),
        record: record.to_string(),
    }
}

/// Copies `source` to a new file at `destination`, creating parent directories.
///
/// The destination is opened with `create_new`, so a file that appears
/// after the caller's existence check is still reported as
/// `DestinationExists` rather than overwritten. If the write fails the
/// partially written destination is removed.
pub fn copy_file(source: &Path, destination: &Path) -> MigrateResult<u64> {
    let copy_failed = |e: io::Error| MigrateError::CopyFailed {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    };

    let mut original = File::open(source).map_err(copy_failed)?;

    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| MigrateError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut copy = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                MigrateError::DestinationExists(destination.to_path_buf())
            } else {
                copy_failed(e)
            }
        })?;

    match io::copy(&mut original, &mut copy) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            drop(copy);
            if let Err(remove_err) = fs::remove_file(destination) {
                OutputFormatter::warning(&format!(
                    "Could not remove partial copy {}: {}",
                    destination.display(),
                    remove_err
                ));
            }
            Err(copy_failed(e))
        }
    }
}

//! The pic-man metadata database.
//!
//! The database is a JSON object keyed by content hash; every value is a
//! [`MediaRecord`]. It is read once at startup and never written back.
//!
//! ```json
//! {
//!   "9f86d08…": {
//!     "sha256": "9f86d08…",
//!     "extensions": ["jpg"],
//!     "paths": ["2019/holiday/IMG_0001.jpg"],
//!     "earliestDate": 1584187200000,
//!     "reviewDone": false,
//!     "ignore": false,
//!     "storedAt": "/archive/blobs/9f86d08",
//!     "tags": ["beach"]
//!   }
//! }
//! ```

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the database, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./pic-man.db";

/// One entry in the database, describing a single piece of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Hash of the file content.
    #[serde(rename = "sha256", default)]
    pub content_hash: String,

    /// Known extensions for this content; the first one decides the category.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Original paths the content was seen at; the first one names the copy.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Earliest known capture time, in milliseconds since the Unix epoch.
    #[serde(rename = "earliestDate", default)]
    pub capture_date: i64,

    #[serde(rename = "reviewDone", default)]
    pub reviewed: bool,

    /// Ignored records are neither validated nor copied.
    #[serde(rename = "ignore", default)]
    pub ignored: bool,

    /// Where the content lives on disk today.
    #[serde(rename = "storedAt", default)]
    pub stored_at: PathBuf,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(
        rename = "migratedTo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub migrated_to: Option<PathBuf>,
}

impl fmt::Display for MediaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = Local
            .timestamp_millis_opt(self.capture_date)
            .single()
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| format!("{}ms", self.capture_date));
        write!(
            f,
            "Meta{{sha: {}, pathCount: {}, date: {}, reviewDone: {}, ignore: {}}}",
            self.content_hash,
            self.paths.len(),
            date,
            self.reviewed,
            self.ignored
        )
    }
}

/// Errors that can occur while loading the database.
#[derive(Debug)]
pub enum StoreError {
    /// No database file at the given path.
    NotFound(PathBuf),
    /// The file exists but could not be read.
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file content is not a valid database.
    ParseFailed { path: PathBuf, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(path) => {
                write!(f, "missing {} - pic manager database", path.display())
            }
            StoreError::ReadFailed { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
            StoreError::ParseFailed { path, reason } => {
                write!(f, "failed to load {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::ReadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The loaded database, ordered by content hash.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: BTreeMap<String, MediaRecord>,
}

impl MetadataStore {
    /// Loads the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing exists at `path`,
    /// `StoreError::ReadFailed` if it cannot be read and
    /// `StoreError::ParseFailed` if the JSON does not match the record schema.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json(&content).map_err(|e| StoreError::ParseFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parses a database from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let records: BTreeMap<String, MediaRecord> = serde_json::from_str(content)?;
        Ok(Self { records })
    }

    /// Builds a store from `(content hash, record)` pairs.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, MediaRecord)>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Iterates `(content hash, record)` pairs in ascending hash order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MediaRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates records that are not marked ignored.
    pub fn active(&self) -> impl Iterator<Item = (&str, &MediaRecord)> {
        self.iter().filter(|(_, record)| !record.ignored)
    }

    pub fn get(&self, content_hash: &str) -> Option<&MediaRecord> {
        self.records.get(content_hash)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! pic-man - copy a photo/video library into a dated folder tree
//!
//! This library reads the pic-man metadata database, classifies each record
//! as a picture or a movie by extension, and copies its file to
//! `<category>/<year>/<month>/<day>/<name>` under a destination root.
//! Unknown types and destination collisions abort the run; missing source
//! files are skipped.

pub mod cli;
pub mod config;
pub mod destination;
pub mod media_type;
pub mod metadata_store;
pub mod migrator;
pub mod output;

pub use config::{Config, ConfigError};
pub use destination::{MonthFormat, basename, derive};
pub use media_type::{Category, TypeMapper};
pub use metadata_store::{MediaRecord, MetadataStore, StoreError};
pub use migrator::{MigrateError, MigrationReport, Migrator};

pub use cli::{Cli, RunSummary, run_cli, run_with_config};

//! Domain models for the requirements database.
//!
//! This module contains the filesystem-agnostic types: field validators,
//! records and their canonical identity, check reports, and configuration.

/// Single-field validation rules.
pub mod validators;
pub use validators::ValidationError;

mod status;
pub use status::{DefinitionType, ValidationStatus};

mod fields;

/// Markdown rendering of records.
pub mod markdown;

/// Requirement records.
pub mod requirement;
pub use requirement::Requirement;

/// Definition (glossary) records.
pub mod definition;
pub use definition::Definition;

mod record;
pub use record::{LoadError, Record, RecordKind};

/// Canonical file identity of records.
pub mod identity;

/// Check and file status reports.
pub mod check;
pub use check::{CheckStatus, CheckStatusError, CheckStatusList, FileStatus, FileStatusList};

mod config;
pub use config::{Config, FolderRules, CONFIG_FILE_NAME};

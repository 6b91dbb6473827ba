//! File-based requirements and definitions database.
//!
//! Requirements and definitions are YAML records stored one per file in a
//! folder. A record's file name is derived from its title. Folders are
//! validated against structural rules, then record by record, and can be
//! exported as a tree of markdown documents.

pub mod domain;
pub use domain::{
    CheckStatus, CheckStatusList, Config, Definition, FileStatus, FileStatusList, Record,
    RecordKind, Requirement, ValidationError,
};

/// Filesystem storage of record databases.
pub mod storage;
pub use storage::{Database, DatabaseError, DirectoryPolicy, Project, ProjectReport};

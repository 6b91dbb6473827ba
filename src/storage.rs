/// Reading and writing record files.
pub mod codec;
pub use codec::CodecError;

/// Structural rules of a database folder.
pub mod directory;
pub use directory::{DirectoryPolicy, NotFoundError};

/// Content validation of record files.
pub mod aggregator;
pub use aggregator::{Aggregator, Cancelled, NoopReporter, Reporter};

mod database;
pub use database::{Database, DatabaseError, DOCUMENT_EXTENSION};

mod fixture;

/// The folder layout of a requirements project.
pub mod project;
pub use project::{Project, ProjectReport};

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde_yaml::Mapping;

#[doc(hidden)]
pub use crate::storage::codec::LoadError;
use crate::{
    domain::{
        definition, identity, markdown::MarkdownDocument, requirement, validators::Bounds,
        Definition, Requirement, ValidationError,
    },
    storage::codec::{self, CodecError},
};

/// The kinds of record a database can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// See [`Requirement`].
    Requirement,
    /// See [`Definition`].
    Definition,
}

impl RecordKind {
    /// Human-readable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Requirement => "requirement",
            Self::Definition => "definition",
        }
    }

    /// Character bounds of the title of this kind of record.
    #[must_use]
    pub const fn title_bounds(self) -> Bounds {
        match self {
            Self::Requirement => requirement::TITLE_BOUNDS,
            Self::Definition => definition::TITLE_BOUNDS,
        }
    }

    /// Maximum description length of this kind of record.
    #[must_use]
    pub const fn max_description_length(self) -> usize {
        match self {
            Self::Requirement => requirement::MAX_DESCRIPTION_LENGTH,
            Self::Definition => definition::MAX_DESCRIPTION_LENGTH,
        }
    }

    /// Construct a record of this kind from a decoded mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping does not describe a valid record.
    pub fn from_mapping(self, mapping: &Mapping) -> Result<Record, ValidationError> {
        match self {
            Self::Requirement => Requirement::from_mapping(mapping).map(Record::Requirement),
            Self::Definition => Definition::from_mapping(mapping).map(Record::Definition),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated document of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A requirement.
    Requirement(Requirement),
    /// A definition.
    Definition(Definition),
}

impl Record {
    /// The kind of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Requirement(_) => RecordKind::Requirement,
            Self::Definition(_) => RecordKind::Definition,
        }
    }

    /// The title of the record.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Requirement(r) => r.title(),
            Self::Definition(d) => d.title(),
        }
    }

    /// Every field as a structured-text mapping.
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        match self {
            Self::Requirement(r) => r.to_mapping(),
            Self::Definition(d) => d.to_mapping(),
        }
    }

    /// Render the record as a markdown document.
    #[must_use]
    pub fn to_markdown_document(&self) -> MarkdownDocument {
        match self {
            Self::Requirement(r) => r.to_markdown_document(),
            Self::Definition(d) => d.to_markdown_document(),
        }
    }

    /// The file stem this record must be stored under.
    #[must_use]
    pub fn canonical_stem(&self) -> String {
        identity::canonical_stem(self.title())
    }

    /// Whether `path` is named after this record's title.
    #[must_use]
    pub fn is_conformant_name(&self, path: &Path) -> bool {
        identity::is_conformant_name(self.title(), path)
    }

    /// The path this record must be stored at inside `directory`.
    #[must_use]
    pub fn conformant_file_path(&self, directory: &Path) -> PathBuf {
        identity::conformant_file_path(self.title(), directory)
    }

    /// Read a record of the given kind from a file.
    ///
    /// Decoding failures and field validation failures are reported as
    /// distinct [`LoadError`] variants.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or does not describe a
    /// valid record.
    pub fn load(kind: RecordKind, path: &Path) -> Result<Self, LoadError> {
        let mapping = codec::decode(path)?;
        Ok(kind.from_mapping(&mapping)?)
    }

    /// Write the record into `directory` under its canonical file name.
    ///
    /// The directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, directory: &Path) -> Result<PathBuf, CodecError> {
        codec::encode(&self.to_mapping(), &self.conformant_file_path(directory))
    }
}

impl From<Requirement> for Record {
    fn from(requirement: Requirement) -> Self {
        Self::Requirement(requirement)
    }
}

impl From<Definition> for Record {
    fn from(definition: Definition) -> Self {
        Self::Definition(definition)
    }
}

use serde_yaml::{Mapping, Value};

use crate::domain::{
    fields::{mapping_of, Fields},
    markdown::MarkdownDocument,
    validators::{self, Bounds, ValidationError},
    ValidationStatus,
};

/// Character bounds of a requirement title.
pub const TITLE_BOUNDS: Bounds = Bounds::new(8, 100);

/// Maximum number of characters in a requirement description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "Description of the requirement as Markdown";

/// Rationale used when none is given.
pub const DEFAULT_RATIONALE: &str = "Rationale of the requirement";

/// A requirement is a document used to describe a system.
///
/// Every field is validated on construction and on every mutation, so a
/// `Requirement` is never observed in an invalid state. The title doubles as
/// the file name of the requirement on disk (see
/// [`canonical_stem`](crate::domain::identity::canonical_stem)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    title: String,
    description: String,
    rationale: String,
    validation_status: ValidationStatus,
}

impl Requirement {
    /// The declared fields, in declaration order.
    pub const FIELDS: &'static [&'static str] =
        &["title", "description", "rationale", "validation_status"];

    /// Construct a requirement with default description, rationale and
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is invalid.
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        Self::from_parts(
            title.into(),
            DEFAULT_DESCRIPTION.to_string(),
            DEFAULT_RATIONALE.to_string(),
            ValidationStatus::default(),
        )
    }

    /// Construct a requirement from all of its fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checking fields in declaration
    /// order.
    pub fn from_parts(
        title: String,
        description: String,
        rationale: String,
        validation_status: ValidationStatus,
    ) -> Result<Self, ValidationError> {
        let requirement = Self {
            title,
            description,
            rationale,
            validation_status,
        };
        requirement.validate()?;
        Ok(requirement)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validators::title("title", &self.title, TITLE_BOUNDS)?;
        validators::at_most("description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        Ok(())
    }

    /// Apply `change` to a copy and keep it only if the copy is valid.
    fn update(&mut self, change: impl FnOnce(&mut Self)) -> Result<(), ValidationError> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// The title of the requirement.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The markdown body of the requirement.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Why the requirement exists.
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// The review state of the requirement.
    #[must_use]
    pub const fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// Replace the title.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the requirement unchanged, if the new title
    /// is invalid.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        self.update(|r| r.title = title)
    }

    /// Replace the description.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the requirement unchanged, if the new
    /// description is too long.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ValidationError> {
        let description = description.into();
        self.update(|r| r.description = description)
    }

    /// Replace the rationale.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting requirement is invalid.
    pub fn set_rationale(&mut self, rationale: impl Into<String>) -> Result<(), ValidationError> {
        let rationale = rationale.into();
        self.update(|r| r.rationale = rationale)
    }

    /// Replace the review state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting requirement is invalid.
    pub fn set_validation_status(&mut self, status: ValidationStatus) -> Result<(), ValidationError> {
        self.update(|r| r.validation_status = status)
    }

    /// Every field, in declaration order, as a structured-text mapping.
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        mapping_of([
            ("title", Value::String(self.title.clone())),
            ("description", Value::String(self.description.clone())),
            ("rationale", Value::String(self.rationale.clone())),
            (
                "validation_status",
                Value::String(self.validation_status.to_string()),
            ),
        ])
    }

    /// Construct a requirement from a decoded mapping.
    ///
    /// Missing optional fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping contains an unknown key, lacks a
    /// title, holds a value of the wrong type, or any field is invalid.
    pub fn from_mapping(mapping: &Mapping) -> Result<Self, ValidationError> {
        let fields = Fields::new(mapping, Self::FIELDS)?;

        let title = fields.required_string("title")?;
        let description = fields
            .string("description")?
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let rationale = fields
            .string("rationale")?
            .unwrap_or_else(|| DEFAULT_RATIONALE.to_string());
        let validation_status = fields
            .string("validation_status")?
            .map(|s| ValidationStatus::parse("validation_status", &s))
            .transpose()?
            .unwrap_or_default();

        Self::from_parts(title, description, rationale, validation_status)
    }

    /// Render the requirement as a markdown document.
    #[must_use]
    pub fn to_markdown_document(&self) -> MarkdownDocument {
        let mut doc = MarkdownDocument::new();
        doc.heading(1, &self.title)
            .section("description", &self.description)
            .section("rationale", &self.rationale)
            .section("validation_status", self.validation_status.as_str());
        doc
    }
}

use serde_yaml::{Mapping, Value};

use crate::domain::{
    fields::{mapping_of, Fields},
    markdown::MarkdownDocument,
    validators::{self, Bounds, ValidationError},
    DefinitionType, ValidationStatus,
};

/// Character bounds of a definition title.
pub const TITLE_BOUNDS: Bounds = Bounds::new(2, 100);

/// Maximum number of characters in a definition description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "Definition as Markdown";

/// Comment used when none is given.
pub const DEFAULT_COMMENT: &str = "Comment of the Definition - no use for acronyms";

/// A glossary entry: an acronym or a defined term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    title: String,
    description: String,
    comment: String,
    synonyms: Vec<String>,
    definition_type: DefinitionType,
    validation_status: ValidationStatus,
}

impl Definition {
    /// The declared fields, in declaration order.
    pub const FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "comment",
        "synonyms",
        "definition_type",
        "validation_status",
    ];

    /// Construct a definition with default values for everything but the
    /// title.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is invalid.
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        Self::from_parts(
            title.into(),
            DEFAULT_DESCRIPTION.to_string(),
            DEFAULT_COMMENT.to_string(),
            default_synonyms(),
            DefinitionType::default(),
            ValidationStatus::default(),
        )
    }

    /// Construct a definition from all of its fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checking fields in declaration
    /// order.
    pub fn from_parts(
        title: String,
        description: String,
        comment: String,
        synonyms: Vec<String>,
        definition_type: DefinitionType,
        validation_status: ValidationStatus,
    ) -> Result<Self, ValidationError> {
        let definition = Self {
            title,
            description,
            comment,
            synonyms,
            definition_type,
            validation_status,
        };
        definition.validate()?;
        Ok(definition)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validators::title("title", &self.title, TITLE_BOUNDS)?;
        validators::at_most("description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        Ok(())
    }

    fn update(&mut self, change: impl FnOnce(&mut Self)) -> Result<(), ValidationError> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// The defined term.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The meaning of the term, as markdown.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-form comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Alternative spellings or names of the term.
    #[must_use]
    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    /// Whether this is an acronym or a definition.
    #[must_use]
    pub const fn definition_type(&self) -> DefinitionType {
        self.definition_type
    }

    /// The review state of the definition.
    #[must_use]
    pub const fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// Replace the title.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the definition unchanged, if the new title is
    /// invalid.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        self.update(|d| d.title = title)
    }

    /// Replace the description.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the definition unchanged, if the new
    /// description is too long.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), ValidationError> {
        let description = description.into();
        self.update(|d| d.description = description)
    }

    /// Replace the comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting definition is invalid.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), ValidationError> {
        let comment = comment.into();
        self.update(|d| d.comment = comment)
    }

    /// Replace the synonyms.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting definition is invalid.
    pub fn set_synonyms(&mut self, synonyms: Vec<String>) -> Result<(), ValidationError> {
        self.update(|d| d.synonyms = synonyms)
    }

    /// Replace the definition type.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting definition is invalid.
    pub fn set_definition_type(&mut self, definition_type: DefinitionType) -> Result<(), ValidationError> {
        self.update(|d| d.definition_type = definition_type)
    }

    /// Replace the review state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting definition is invalid.
    pub fn set_validation_status(&mut self, status: ValidationStatus) -> Result<(), ValidationError> {
        self.update(|d| d.validation_status = status)
    }

    /// Every field, in declaration order, as a structured-text mapping.
    ///
    /// Synonyms are written as a sequence of strings, enums as their upper
    /// case names.
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        let synonyms = self
            .synonyms
            .iter()
            .cloned()
            .map(Value::String)
            .collect();

        mapping_of([
            ("title", Value::String(self.title.clone())),
            ("description", Value::String(self.description.clone())),
            ("comment", Value::String(self.comment.clone())),
            ("synonyms", Value::Sequence(synonyms)),
            (
                "definition_type",
                Value::String(self.definition_type.to_string()),
            ),
            (
                "validation_status",
                Value::String(self.validation_status.to_string()),
            ),
        ])
    }

    /// Construct a definition from a decoded mapping.
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
        let comment = fields
            .string("comment")?
            .unwrap_or_else(|| DEFAULT_COMMENT.to_string());
        let synonyms = fields.strings("synonyms")?.unwrap_or_else(default_synonyms);
        let definition_type = fields
            .string("definition_type")?
            .map(|s| DefinitionType::parse("definition_type", &s))
            .transpose()?
            .unwrap_or_default();
        let validation_status = fields
            .string("validation_status")?
            .map(|s| ValidationStatus::parse("validation_status", &s))
            .transpose()?
            .unwrap_or_default();

        Self::from_parts(
            title,
            description,
            comment,
            synonyms,
            definition_type,
            validation_status,
        )
    }

    /// Render the definition as a markdown document.
    #[must_use]
    pub fn to_markdown_document(&self) -> MarkdownDocument {
        let synonyms = self
            .synonyms
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut doc = MarkdownDocument::new();
        doc.heading(1, &self.title)
            .section("description", &self.description)
            .section("comment", &self.comment)
            .section("synonyms", &synonyms)
            .section("definition_type", self.definition_type.as_str())
            .section("validation_status", self.validation_status.as_str());
        doc
    }
}

fn default_synonyms() -> Vec<String> {
    vec![String::new()]
}

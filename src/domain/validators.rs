//! Single-field validation rules.
//!
//! Every rule takes a candidate value and either accepts it or returns a
//! [`ValidationError`] naming the field, the violated constraint and the
//! offending value. Rules never modify the value they check.

use std::fmt;

/// Inclusive character-count bounds for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Minimum number of characters.
    pub min: usize,
    /// Maximum number of characters.
    pub max: usize,
}

impl Bounds {
    /// Create a new set of bounds.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether `len` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A field value violates a declared constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value is shorter or longer than allowed.
    #[error("field '{field}' shall contain a number of characters within {bounds} (got {len}): '{value}'")]
    Length {
        /// Name of the field.
        field: &'static str,
        /// The allowed bounds.
        bounds: Bounds,
        /// Actual number of characters.
        len: usize,
        /// The offending value.
        value: String,
    },

    /// The value exceeds its maximum length.
    #[error("field '{field}' shall contain at most {max} characters (got {len})")]
    TooLong {
        /// Name of the field.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
        /// Actual number of characters.
        len: usize,
    },

    /// The first character is not an upper case letter.
    #[error("first character of '{field}' shall be an upper case letter (A-Z). Current: '{value}'")]
    FirstCharacter {
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// The value contains punctuation or non-ASCII characters.
    #[error(
        "field '{field}' shall be composed of numeric and alpha characters, i.e. no punctuation or accent: '{value}'"
    )]
    Characters {
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// The value is not a member of an enumerated set.
    #[error("value '{value}' of field '{field}' is not in the permitted list [{}]", .allowed.join(", "))]
    NotPermitted {
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: String,
        /// The permitted values.
        allowed: &'static [&'static str],
    },

    /// A mapping contained a key that is not a declared field.
    #[error("unknown field '{0}': extra fields are forbidden")]
    UnknownField(String),

    /// A mapping lacks a field that has no default.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A mapping value has the wrong type for its field.
    #[error("field '{field}' shall be {expected}")]
    WrongType {
        /// Name of the field.
        field: &'static str,
        /// Description of the expected type.
        expected: &'static str,
    },
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Check that `value` has a character count within `bounds`.
///
/// # Errors
///
/// Returns [`ValidationError::Length`] if the value is out of bounds.
pub fn length_within(field: &'static str, value: &str, bounds: Bounds) -> Result<(), ValidationError> {
    let len = char_len(value);
    if bounds.contains(len) {
        Ok(())
    } else {
        Err(ValidationError::Length {
            field,
            bounds,
            len,
            value: value.to_string(),
        })
    }
}

/// Check that `value` has at most `max` characters.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`] if the value is too long.
pub fn at_most(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = char_len(value);
    if len <= max {
        Ok(())
    } else {
        Err(ValidationError::TooLong { field, max, len })
    }
}

/// Check that the first character is alphabetic and upper case.
///
/// # Errors
///
/// Returns [`ValidationError::FirstCharacter`] otherwise, including for an
/// empty value.
pub fn starts_with_uppercase(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match value.chars().next() {
        Some(c) if c.is_alphabetic() && c.is_uppercase() => Ok(()),
        _ => Err(ValidationError::FirstCharacter {
            field,
            value: value.to_string(),
        }),
    }
}

/// Whether the text contains ASCII punctuation or any non-ASCII character.
#[must_use]
pub fn has_punctuation_or_accent(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_ascii_punctuation() || !c.is_ascii())
}

/// Check that `value` contains no punctuation and no accented characters.
///
/// # Errors
///
/// Returns [`ValidationError::Characters`] if any character is rejected.
pub fn no_punctuation_or_accent(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if has_punctuation_or_accent(value) {
        Err(ValidationError::Characters {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Run every title rule in order: length, first character, character class.
///
/// The first failing rule determines the error.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first violated rule.
pub fn title(field: &'static str, value: &str, bounds: Bounds) -> Result<(), ValidationError> {
    length_within(field, value, bounds)?;
    starts_with_uppercase(field, value)?;
    no_punctuation_or_accent(field, value)
}

/// Match `value` case-insensitively against an enumerated set of upper case
/// names, returning the index of the matching entry.
///
/// # Errors
///
/// Returns [`ValidationError::NotPermitted`] listing the allowed values.
pub fn member_of(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<usize, ValidationError> {
    let normalized = value.to_uppercase();
    allowed
        .iter()
        .position(|candidate| *candidate == normalized)
        .ok_or_else(|| ValidationError::NotPermitted {
            field,
            value: value.to_string(),
            allowed,
        })
}

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::domain::validators::{member_of, ValidationError};

/// Review state of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// Not yet reviewed.
    #[default]
    Unvalid,
    /// Reviewed and accepted.
    Valid,
    /// Reviewed and rejected.
    Invalid,
}

impl ValidationStatus {
    /// The permitted textual values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["UNVALID", "VALID", "INVALID"];
    const ALL: [Self; 3] = [Self::Unvalid, Self::Valid, Self::Invalid];

    /// Parse a status for the named field, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPermitted`] if the value is not a known
    /// status.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        member_of(field, value, Self::NAMES).map(|index| Self::ALL[index])
    }

    /// The canonical upper case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unvalid => "UNVALID",
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
        }
    }
}

impl FromStr for ValidationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("validation_status", s)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a definition record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefinitionType {
    /// An abbreviation and its expansion.
    Acronym,
    /// A term and its meaning.
    #[default]
    Definition,
}

impl DefinitionType {
    /// The permitted textual values, in declaration order.
    pub const NAMES: &'static [&'static str] = &["ACRONYM", "DEFINITION"];
    const ALL: [Self; 2] = [Self::Acronym, Self::Definition];

    /// Parse a definition type for the named field, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotPermitted`] if the value is not a known
    /// type.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        member_of(field, value, Self::NAMES).map(|index| Self::ALL[index])
    }

    /// The canonical upper case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acronym => "ACRONYM",
            Self::Definition => "DEFINITION",
        }
    }
}

impl FromStr for DefinitionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("definition_type", s)
    }
}

impl fmt::Display for DefinitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_any_case() {
        assert_eq!("valid".parse(), Ok(ValidationStatus::Valid));
        assert_eq!("Unvalid".parse(), Ok(ValidationStatus::Unvalid));
        assert_eq!("INVALID".parse(), Ok(ValidationStatus::Invalid));
    }

    #[test]
    fn status_rejects_unknown_value() {
        let error = "approved".parse::<ValidationStatus>().unwrap_err();
        assert!(matches!(error, ValidationError::NotPermitted { .. }));
    }

    #[test]
    fn status_round_trips_through_display() {
        for status in ValidationStatus::ALL {
            assert_eq!(status.to_string().parse(), Ok(status));
        }
    }

    #[test]
    fn definition_type_defaults_to_definition() {
        assert_eq!(DefinitionType::default(), DefinitionType::Definition);
        assert_eq!("acronym".parse(), Ok(DefinitionType::Acronym));
    }
}

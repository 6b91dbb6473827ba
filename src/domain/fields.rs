//! Typed access to the fields of a decoded mapping.

use serde_yaml::{Mapping, Value};

use crate::domain::validators::ValidationError;

/// A mapping whose keys have been checked against a record schema.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    mapping: &'a Mapping,
}

impl<'a> Fields<'a> {
    /// Check that every key is a string naming one of the `declared` fields.
    pub(crate) fn new(
        mapping: &'a Mapping,
        declared: &'static [&'static str],
    ) -> Result<Self, ValidationError> {
        for key in mapping.keys() {
            match key {
                Value::String(name) if declared.contains(&name.as_str()) => {}
                Value::String(name) => return Err(ValidationError::UnknownField(name.clone())),
                other => return Err(ValidationError::UnknownField(format!("{other:?}"))),
            }
        }
        Ok(Self { mapping })
    }

    /// The string value of `field`, if present.
    pub(crate) fn string(&self, field: &'static str) -> Result<Option<String>, ValidationError> {
        match self.mapping.get(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(ValidationError::WrongType {
                field,
                expected: "a string",
            }),
        }
    }

    /// The string value of `field`, which has no default.
    pub(crate) fn required_string(&self, field: &'static str) -> Result<String, ValidationError> {
        self.string(field)?
            .ok_or(ValidationError::MissingField(field))
    }

    /// The value of `field` as a sequence of strings, if present.
    pub(crate) fn strings(
        &self,
        field: &'static str,
    ) -> Result<Option<Vec<String>>, ValidationError> {
        let wrong_type = || ValidationError::WrongType {
            field,
            expected: "a sequence of strings",
        };

        match self.mapping.get(field) {
            None => Ok(None),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(value) => Ok(value.clone()),
                    _ => Err(wrong_type()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(wrong_type()),
        }
    }
}

/// Build a mapping from `(field, value)` pairs, preserving their order.
pub(crate) fn mapping_of<I>(entries: I) -> Mapping
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    entries
        .into_iter()
        .map(|(field, value)| (Value::String(field.to_string()), value))
        .collect()
}

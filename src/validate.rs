//! Required-field checks for parsed rows.

use std::collections::HashSet;

use crate::csv::Row;
use crate::error::ValidationError;

/// A checked list of required field names.
///
/// Construction rejects blank and duplicate names, so [`validate`] itself
/// cannot fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFields {
    names: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyFieldName { index });
            }
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateField(name.clone()));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Outcome of checking one row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Missing fields, in the order they were required.
    pub missing_fields: Vec<String>,
}

/// Check that every required field is present and non-empty.
///
/// A field is missing when the row has no such column or its value is an
/// empty string. Numeric values, including `0`, are present.
pub fn validate(row: &Row, required: &RequiredFields) -> ValidationResult {
    let missing_fields: Vec<String> = required
        .names
        .iter()
        .filter(|name| row.get(name).is_none_or(|value| value.is_empty()))
        .cloned()
        .collect();

    ValidationResult {
        is_valid: missing_fields.is_empty(),
        missing_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::FieldValue;

    fn required(names: &[&str]) -> RequiredFields {
        RequiredFields::new(names.iter().copied()).unwrap()
    }

    #[test]
    fn zero_is_present() {
        let row: Row = [("id", FieldValue::Number(0.0))].into_iter().collect();
        let result = validate(&row, &required(&["id"]));
        assert!(result.is_valid);
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn empty_string_is_missing() {
        let row: Row = [("id", "")].into_iter().collect();
        let result = validate(&row, &required(&["id"]));
        assert!(!result.is_valid);
        assert_eq!(result.missing_fields, vec!["id"]);
    }

    #[test]
    fn text_zero_and_whitespace_are_present() {
        let row: Row = [("a", "0"), ("b", " ")].into_iter().collect();
        assert!(validate(&row, &required(&["a", "b"])).is_valid);
    }

    #[test]
    fn missing_fields_follow_required_order() {
        let row: Row = [("b", "x")].into_iter().collect();
        let result = validate(&row, &required(&["c", "b", "a"]));
        assert_eq!(result.missing_fields, vec!["c", "a"]);
    }

    #[test]
    fn no_requirements_is_valid() {
        assert!(validate(&Row::new(), &RequiredFields::default()).is_valid);
    }

    #[test]
    fn rejects_malformed_required_lists() {
        assert_eq!(
            RequiredFields::new(["id", " "]),
            Err(ValidationError::EmptyFieldName { index: 1 })
        );
        assert_eq!(
            RequiredFields::new(["id", "id"]),
            Err(ValidationError::DuplicateField("id".to_string()))
        );
    }
}

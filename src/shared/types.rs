use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Field name to human-readable messages, present only for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: String, errors: Option<FieldErrors>) -> Self {
        Self { message, errors }
    }
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Self::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                fields.add(&field.to_string(), &message);
            }
        }
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_field_errors_from_validation_errors_uses_messages() {
        let mut errors = ValidationErrors::new();
        let mut required = ValidationError::new("required");
        required.message = Some("Description is required".into());
        errors.add("description", required);
        errors.add("name", ValidationError::new("length"));

        let fields = FieldErrors::from(errors);
        assert_eq!(
            fields.get("description"),
            Some(&["Description is required".to_string()][..])
        );
        assert_eq!(
            fields.get("name"),
            Some(&["name is invalid (length)".to_string()][..])
        );
    }

    #[test]
    fn test_field_errors_serializes_as_plain_map() {
        let fields = FieldErrors::single("name", "Name must be unique");
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({ "name": ["Name must be unique"] }));
    }

    #[test]
    fn test_error_response_omits_empty_errors() {
        let body = ErrorResponse::new("Category 1 not found".to_string(), None);
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Category 1 not found"}"#);
    }
}

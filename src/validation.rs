use std::collections::HashMap;

use crate::error::ApiError;

/// Request bodies that carry field constraints
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Collects per-field messages and turns them into a 422
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character-length bounds, counted in chars rather than bytes
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.0.insert(
                field.to_string(),
                format!("must be at least {} character{}", min, if min == 1 { "" } else { "s" }),
            );
        } else if let Some(max) = max {
            if len > max {
                self.0.insert(field.to_string(), format!("must be at most {} characters", max));
            }
        }
        self
    }

    pub fn optional_length(&mut self, field: &str, value: Option<&str>, min: usize, max: Option<usize>) -> &mut Self {
        if let Some(value) = value {
            self.length(field, value, min, max);
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: i64) -> &mut Self {
        if value < 1 {
            self.0.insert(field.to_string(), "must be a positive id".to_string());
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.0.insert(field.to_string(), message.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::unprocessable_entity(
                "Request validation failed",
                std::mem::take(&mut self.0),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_violations() {
        let err = FieldErrors::new()
            .length("name", "", 1, Some(10))
            .length("abbr", "abcdef", 0, Some(3))
            .optional_length("logo_path", None, 0, Some(1))
            .positive("company_id", 0)
            .finish()
            .unwrap_err();

        match err {
            ApiError::UnprocessableEntity { field_errors, .. } => {
                assert_eq!(field_errors.len(), 3);
                assert_eq!(field_errors["name"], "must be at least 1 character");
                assert_eq!(field_errors["abbr"], "must be at most 3 characters");
                assert!(field_errors.contains_key("company_id"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(FieldErrors::new().length("name", "ñandú", 1, Some(5)).finish().is_ok());
    }
}

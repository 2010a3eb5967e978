use crate::models::{RequestField, SubmissionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: RequestField,
    pub message: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Please fill in all required fields correctly.")]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn get(&self, field: RequestField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Message shown next to a field, e.g. `LLM API KEY is required`.
pub fn validate_field(field: RequestField, value: &str) -> Option<String> {
    if field.is_required() && value.trim().is_empty() {
        return Some(format!(
            "{} is required",
            field.name().replace('_', " ").to_uppercase()
        ));
    }

    None
}

impl SubmissionRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = RequestField::ALL
            .iter()
            .filter_map(|&field| {
                validate_field(field, self.value(field)).map(|message| FieldError { field, message })
            })
            .collect::<Vec<_>>();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

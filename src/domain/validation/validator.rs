//! Collect-all schema validation for inbound request bodies.
//!
//! Every declared field is checked and every failure is recorded before the
//! outcome is returned, so a caller can fix all problems in one round-trip.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::schema::{FieldSchema, FieldType, RequestSchema};

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    RequiredFieldMissing,
    TypeError,
    MinLengthError,
    MaxLengthError,
    PatternError,
    NanError,
    MinValueError,
    MaxValueError,
    /// Field is well-formed but references nothing the caller owns.
    NotFound,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            ValidationCode::TypeError => "TYPE_ERROR",
            ValidationCode::MinLengthError => "MIN_LENGTH_ERROR",
            ValidationCode::MaxLengthError => "MAX_LENGTH_ERROR",
            ValidationCode::PatternError => "PATTERN_ERROR",
            ValidationCode::NanError => "NAN_ERROR",
            ValidationCode::MinValueError => "MIN_VALUE_ERROR",
            ValidationCode::MaxValueError => "MAX_VALUE_ERROR",
            ValidationCode::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: ValidationCode,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ValidationCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// Coerced values of all fields that passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFields {
    values: BTreeMap<String, FieldValue>,
}

impl ValidatedFields {
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        match self.values.get(field) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut FieldValue)> {
        self.values.iter_mut()
    }
}

/// Result of validating one body against one schema.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub data: Option<ValidatedFields>,
    pub errors: Vec<FieldError>,
}

impl ValidationOutcome {
    /// Converts the outcome into a `Result`, keeping all errors.
    pub fn into_result(self) -> Result<ValidatedFields, Vec<FieldError>> {
        match self.data {
            Some(data) if self.valid => Ok(data),
            _ => Err(self.errors),
        }
    }
}

/// Validates `body` against `schema`, accumulating errors across all fields.
///
/// A non-object body is treated as having no fields at all.
pub fn validate(body: &Value, schema: &RequestSchema) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut data = ValidatedFields::default();

    for (name, field) in schema.fields() {
        let value = body.get(name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if field.required {
                errors.push(FieldError::new(
                    name,
                    format!("{} is required", name),
                    ValidationCode::RequiredFieldMissing,
                ));
            }
            continue;
        };

        let before = errors.len();
        let coerced = match field.field_type {
            FieldType::String => check_string(name, value, field, &mut errors),
            FieldType::Number => check_number(name, value, field, &mut errors),
        };

        if errors.len() == before {
            if let Some(coerced) = coerced {
                data.insert(name, coerced);
            }
        }
    }

    let valid = errors.is_empty();
    ValidationOutcome {
        valid,
        data: valid.then_some(data),
        errors,
    }
}

fn check_string(
    name: &str,
    value: &Value,
    field: &FieldSchema,
    errors: &mut Vec<FieldError>,
) -> Option<FieldValue> {
    let Some(text) = value.as_str() else {
        errors.push(FieldError::new(
            name,
            format!("{} must be a string", name),
            ValidationCode::TypeError,
        ));
        return None;
    };

    let length = text.chars().count();
    if let Some(min) = field.min_length {
        if length < min {
            errors.push(FieldError::new(
                name,
                format!("{} must be at least {} characters", name, min),
                ValidationCode::MinLengthError,
            ));
        }
    }
    if let Some(max) = field.max_length {
        if length > max {
            errors.push(FieldError::new(
                name,
                format!("{} must be at most {} characters", name, max),
                ValidationCode::MaxLengthError,
            ));
        }
    }
    if let Some(pattern) = &field.pattern {
        if !pattern.is_match(text) {
            errors.push(FieldError::new(
                name,
                format!("{} has an invalid format", name),
                ValidationCode::PatternError,
            ));
        }
    }

    Some(FieldValue::Text(text.to_string()))
}

fn check_number(
    name: &str,
    value: &Value,
    field: &FieldSchema,
    errors: &mut Vec<FieldError>,
) -> Option<FieldValue> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        // Numeric strings are coerced; anything parseable as f64 is accepted.
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => {
            errors.push(FieldError::new(
                name,
                format!("{} must be a number", name),
                ValidationCode::TypeError,
            ));
            return None;
        }
    };

    let number = match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            errors.push(FieldError::new(
                name,
                format!("{} must be a valid number", name),
                ValidationCode::NanError,
            ));
            return None;
        }
    };

    if let Some(min) = field.min {
        if number < min {
            errors.push(FieldError::new(
                name,
                format!("{} must be at least {}", name, min),
                ValidationCode::MinValueError,
            ));
        }
    }
    if let Some(max) = field.max {
        if number > max {
            errors.push(FieldError::new(
                name,
                format!("{} must be at most {}", name, max),
                ValidationCode::MaxValueError,
            ));
        }
    }

    Some(FieldValue::Number(number))
}

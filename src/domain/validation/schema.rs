//! Declarative field schemas.
//!
//! A `RequestSchema` is declared once per request type and never mutated;
//! the validator walks it for every inbound body.

use regex::Regex;

/// Primitive type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
}

/// Constraints for a single field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub field_type: FieldType,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
}

impl FieldSchema {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    /// Starts a string field declaration.
    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    /// Starts a numeric field declaration.
    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Ordered set of field declarations for one request type.
#[derive(Debug, Clone, Default)]
pub struct RequestSchema {
    fields: Vec<(&'static str, FieldSchema)>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Declaration order is the order errors are reported in.
    pub fn field(mut self, name: &'static str, schema: FieldSchema) -> Self {
        self.fields.push((name, schema));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (*name, schema))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, schema)| schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_constraints() {
        let schema = FieldSchema::string().required().min_length(2).max_length(10);
        assert_eq!(schema.field_type, FieldType::String);
        assert!(schema.required);
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.max_length, Some(10));
        assert!(schema.pattern.is_none());
    }

    #[test]
    fn request_schema_keeps_declaration_order() {
        let schema = RequestSchema::new()
            .field("b", FieldSchema::number())
            .field("a", FieldSchema::string());
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(schema.get("a").is_some());
        assert!(schema.get("missing").is_none());
    }
}

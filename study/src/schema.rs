//! Output schemas handed to the model's structured-output mode, and the
//! validator that checks a parsed response against the same descriptor.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Array,
    Object,
}

impl SchemaType {
    fn name(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

/// Structural contract for a JSON value.
///
/// Properties keep their declaration order; it is forwarded to the model as
/// `propertyOrdering` so generated objects list fields the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    pub schema_type: SchemaType,
    pub description: Option<&'static str>,
    pub nullable: bool,
    pub properties: Vec<(&'static str, SchemaDescriptor)>,
    pub required: Vec<&'static str>,
    pub items: Option<Box<SchemaDescriptor>>,
    pub min_items: Option<usize>,
}

impl SchemaDescriptor {
    fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            nullable: false,
            properties: Vec::new(),
            required: Vec::new(),
            items: None,
            min_items: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    pub fn array(items: SchemaDescriptor) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaType::Array)
        }
    }

    pub fn object(properties: Vec<(&'static str, SchemaDescriptor)>) -> Self {
        Self {
            properties,
            ..Self::new(SchemaType::Object)
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn required(mut self, fields: &[&'static str]) -> Self {
        self.required = fields.to_vec();
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn property(&self, name: &str) -> Option<&SchemaDescriptor> {
        self.properties
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, schema)| schema)
    }

    /// Render in the `responseSchema` dialect of the Gemini API.
    pub fn to_response_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.schema_type));

        if let Some(description) = self.description {
            schema.insert("description".into(), json!(description));
        }
        if self.nullable {
            schema.insert("nullable".into(), json!(true));
        }
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, prop)| (name.to_string(), prop.to_response_schema()))
                .collect();
            let ordering: Vec<&str> = self.properties.iter().map(|(name, _)| *name).collect();
            schema.insert("properties".into(), Value::Object(properties));
            schema.insert("propertyOrdering".into(), json!(ordering));
        }
        if !self.required.is_empty() {
            schema.insert("required".into(), json!(self.required));
        }
        if let Some(items) = &self.items {
            schema.insert("items".into(), items.to_response_schema());
        }
        if let Some(min) = self.min_items {
            schema.insert("minItems".into(), json!(min));
        }

        Value::Object(schema)
    }

    /// Check `value` against this descriptor, stopping at the first violation.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        if value.is_null() {
            return if self.nullable {
                Ok(())
            } else {
                Err(SchemaViolation::new(path, "must not be null"))
            };
        }

        match self.schema_type {
            SchemaType::String => {
                if !value.is_string() {
                    return Err(SchemaViolation::expected(path, self.schema_type, value));
                }
            }
            SchemaType::Array => {
                let Some(elements) = value.as_array() else {
                    return Err(SchemaViolation::expected(path, self.schema_type, value));
                };
                if let Some(min) = self.min_items {
                    if elements.len() < min {
                        return Err(SchemaViolation::new(
                            path,
                            format!("expected at least {min} item(s), found {}", elements.len()),
                        ));
                    }
                }
                if let Some(items) = &self.items {
                    for (i, element) in elements.iter().enumerate() {
                        items.validate_at(element, &format!("{path}[{i}]"))?;
                    }
                }
            }
            SchemaType::Object => {
                let Some(fields) = value.as_object() else {
                    return Err(SchemaViolation::expected(path, self.schema_type, value));
                };
                for name in &self.required {
                    let field_path = format!("{path}.{name}");
                    match fields.get(*name) {
                        None => {
                            return Err(SchemaViolation::new(&field_path, "missing required field"))
                        }
                        Some(Value::String(s)) if s.trim().is_empty() => {
                            return Err(SchemaViolation::new(&field_path, "must not be empty"))
                        }
                        Some(_) => {}
                    }
                }
                for (name, prop) in &self.properties {
                    if let Some(field) = fields.get(*name) {
                        prop.validate_at(field, &format!("{path}.{name}"))?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Where and why a value failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    fn expected(path: &str, expected: SchemaType, found: &Value) -> Self {
        let found = match found {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Self::new(path, format!("expected {}, found {found}", expected.name()))
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

pub static SUMMARY_SCHEMA: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::object(vec![
        (
            "articleTitle",
            SchemaDescriptor::string().describe("Title of the document"),
        ),
        (
            "summary",
            SchemaDescriptor::array(
                SchemaDescriptor::object(vec![
                    (
                        "subtitle",
                        SchemaDescriptor::string().describe("Heading of the section"),
                    ),
                    (
                        "content",
                        SchemaDescriptor::string().describe("Summary of the section"),
                    ),
                ])
                .required(&["subtitle", "content"]),
            )
            .min_items(1),
        ),
    ])
    .required(&["articleTitle", "summary"])
});

pub static FLASHCARD_SCHEMA: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::array(
        SchemaDescriptor::object(vec![
            ("question", SchemaDescriptor::string()),
            ("answer", SchemaDescriptor::string()),
        ])
        .required(&["question", "answer"]),
    )
    .min_items(1)
});

pub static QUIZ_SCHEMA: LazyLock<SchemaDescriptor> = LazyLock::new(|| {
    SchemaDescriptor::array(
        SchemaDescriptor::object(vec![
            ("question", SchemaDescriptor::string()),
            (
                "options",
                SchemaDescriptor::array(SchemaDescriptor::string()).min_items(2),
            ),
            (
                "correctAnswer",
                SchemaDescriptor::string().describe("Must be one of the options, verbatim"),
            ),
        ])
        .required(&["question", "options", "correctAnswer"]),
    )
    .min_items(1)
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_schema_renders_for_gemini() {
        let schema = SUMMARY_SCHEMA.to_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["articleTitle", "summary"]));
        assert_eq!(schema["propertyOrdering"], json!(["articleTitle", "summary"]));
        assert_eq!(schema["properties"]["summary"]["type"], "ARRAY");
        assert_eq!(
            schema["properties"]["summary"]["items"]["required"],
            json!(["subtitle", "content"])
        );
        assert!(schema.get("nullable").is_none());
    }

    #[test]
    fn quiz_schema_requires_two_options() {
        let schema = QUIZ_SCHEMA.to_response_schema();
        assert_eq!(schema["minItems"], 1);
        assert_eq!(schema["items"]["properties"]["options"]["minItems"], 2);
    }

    #[test]
    fn nullable_fields_accept_null() {
        let schema = SchemaDescriptor::object(vec![("note", SchemaDescriptor::string().nullable())]);
        assert!(schema.validate(&json!({ "note": null })).is_ok());
        assert_eq!(schema.to_response_schema()["properties"]["note"]["nullable"], true);
    }

    #[test]
    fn flashcards_accept_a_well_formed_list() {
        let value = json!([{ "question": "What is Rust?", "answer": "A language" }]);
        assert!(FLASHCARD_SCHEMA.validate(&value).is_ok());
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = FLASHCARD_SCHEMA.validate(&json!([])).unwrap_err();
        assert_eq!(err.path, "$");
        assert!(err.reason.contains("at least 1"));
    }

    #[test]
    fn object_where_list_expected() {
        let err = QUIZ_SCHEMA.validate(&json!({ "quiz": [] })).unwrap_err();
        assert_eq!(err.reason, "expected array, found object");
    }

    #[test]
    fn missing_title_reports_its_path() {
        let err = SUMMARY_SCHEMA
            .validate(&json!({ "summary": [{ "subtitle": "a", "content": "b" }] }))
            .unwrap_err();
        assert_eq!(err.path, "$.articleTitle");
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = SUMMARY_SCHEMA
            .validate(&json!({
                "articleTitle": "  ",
                "summary": [{ "subtitle": "a", "content": "b" }]
            }))
            .unwrap_err();
        assert_eq!(err.to_string(), "$.articleTitle: must not be empty");
    }

    #[test]
    fn nested_violations_point_at_the_element() {
        let value = json!([
            { "question": "q1", "options": ["a", "b"], "correctAnswer": "a" },
            { "question": "q2", "options": ["a"], "correctAnswer": "a" }
        ]);
        let err = QUIZ_SCHEMA.validate(&value).unwrap_err();
        assert_eq!(err.path, "$[1].options");
    }

    #[test]
    fn wrong_scalar_type_is_reported() {
        let value = json!([{ "question": 3, "answer": "x" }]);
        let err = FLASHCARD_SCHEMA.validate(&value).unwrap_err();
        assert_eq!(err.to_string(), "$[0].question: expected string, found number");
    }
}

//! Form Schema Value Objects
//!
//! The JSON-Schema-like definition a backend form type carries, parsed
//! strictly at the boundary so the engine never re-checks its shape.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Declared JSON type of a property
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    #[serde(alias = "integer")]
    Number,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// What a property actually is once type, format and enum are combined.
///
/// Validation and rendering match on this exhaustively; adding a kind is a
/// compile error everywhere it has to be handled.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Enum(Vec<String>),
    Date,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::Date => "date",
        }
    }
}

/// One property definition
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", alias = "options", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSchema {
    /// Free text property
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            field_type: Some(FieldType::String),
            ..Self::default()
        }
    }

    pub fn number(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            field_type: Some(FieldType::Number),
            ..Self::default()
        }
    }

    pub fn boolean(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            field_type: Some(FieldType::Boolean),
            ..Self::default()
        }
    }

    /// Calendar date entered as text (`format: date`)
    pub fn date(title: impl Into<String>) -> Self {
        Self {
            format: Some("date".into()),
            ..Self::text(title)
        }
    }

    /// String property restricted to `options`
    pub fn choice<I, S>(title: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::text(title)
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type.unwrap_or_default()
    }

    pub fn is_date(&self) -> bool {
        self.field_type() == FieldType::String && self.format.as_deref() == Some("date")
    }

    pub fn kind(&self) -> FieldKind {
        if let Some(options) = &self.options {
            return FieldKind::Enum(options.clone());
        }
        match self.field_type() {
            FieldType::Number => FieldKind::Number,
            FieldType::Boolean => FieldKind::Boolean,
            FieldType::String if self.is_date() => FieldKind::Date,
            FieldType::String => FieldKind::String,
        }
    }
}

/// Form schema owned by a backend form type
///
/// # Invariants
/// - `properties` keeps the backend's key order
/// - `required` holds each name once
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, FieldSchema>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: IndexSet<String>,
}

impl FormSchema {
    /// Empty schema with a property map ready for [`FormSchema::field`]
    pub fn new() -> Self {
        Self {
            properties: Some(IndexMap::new()),
            required: IndexSet::new(),
        }
    }

    /// Builder: append a property
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
        self
    }

    /// Builder: append a required property
    pub fn required_field(self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        let mut schema = self.field(name.clone(), schema);
        schema.required.insert(name);
        schema
    }

    pub fn property(&self, name: &str) -> Option<&FieldSchema> {
        self.properties.as_ref()?.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Display title of `name`, falling back to the raw name.
    pub fn title_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.property(name)
            .and_then(|p| p.title.as_deref())
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.properties.as_ref().map_or(0, IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render-ready view of one schema property
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDescriptor {
    /// Free-text notes and purpose fields get a multi-line input.
    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::String)
            && (self.name.contains("notes") || self.name.contains("purpose"))
    }

    /// `(value, label)` pairs for a select input, empty for non-enum fields.
    pub fn option_labels(&self) -> Vec<(String, String)> {
        match &self.kind {
            FieldKind::Enum(options) => options
                .iter()
                .map(|o| (o.clone(), humanize_option(o)))
                .collect(),
            FieldKind::String | FieldKind::Number | FieldKind::Boolean | FieldKind::Date => {
                Vec::new()
            }
        }
    }
}

/// `persoana_fizica` → `Persoana Fizica`
pub fn humanize_option(value: &str) -> String {
    let mut label = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && at_word_start {
            label.push(c.to_ascii_uppercase());
        } else {
            label.push(c);
        }
        at_word_start = !is_word;
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_property_order() {
        let schema: FormSchema = serde_json::from_str(
            r#"{
                "type": "object",
                "properties": {
                    "zeta": {"type": "string", "title": "Zeta"},
                    "alfa": {"type": "number"},
                    "mid": {"type": "boolean", "title": "Mid"}
                },
                "required": ["zeta"]
            }"#,
        )
        .unwrap();

        let names: Vec<_> = schema.properties.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alfa", "mid"]);
        assert!(schema.is_required("zeta"));
        assert_eq!(schema.title_of("alfa"), "alfa");
    }

    #[test]
    fn test_missing_and_null_parts() {
        let schema: FormSchema = serde_json::from_str(r#"{"required": null}"#).unwrap();
        assert!(schema.properties.is_none());
        assert!(schema.required.is_empty());
        assert!(schema.is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected_at_boundary() {
        let parsed = serde_json::from_str::<FormSchema>(
            r#"{"properties": {"x": {"type": "array"}}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_integer_is_number() {
        let field: FieldSchema = serde_json::from_str(r#"{"type": "integer"}"#).unwrap();
        assert_eq!(field.kind(), FieldKind::Number);
    }

    #[test]
    fn test_kind_derivation() {
        assert_eq!(FieldSchema::default().kind(), FieldKind::String);
        assert_eq!(FieldSchema::date("Data").kind(), FieldKind::Date);
        assert_eq!(FieldSchema::boolean("Da").kind(), FieldKind::Boolean);
        assert_eq!(
            FieldSchema::choice("Tip", ["a", "b"]).kind(),
            FieldKind::Enum(vec!["a".into(), "b".into()])
        );

        // date format only applies to strings
        let mut numeric_date = FieldSchema::number("Anul");
        numeric_date.format = Some("date".into());
        assert_eq!(numeric_date.kind(), FieldKind::Number);
    }

    #[test]
    fn test_options_alias() {
        let field: FieldSchema =
            serde_json::from_str(r#"{"type": "string", "options": ["apa", "gaz"]}"#).unwrap();
        assert_eq!(field.options.as_deref(), Some(&["apa".to_string(), "gaz".to_string()][..]));
    }

    #[test]
    fn test_humanize_option() {
        assert_eq!(humanize_option("persoana_fizica"), "Persoana Fizica");
        assert_eq!(humanize_option("energie_electrica"), "Energie Electrica");
        assert_eq!(humanize_option("apa"), "Apa");
    }
}

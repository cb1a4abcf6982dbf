//! Declarative message templates.
//!
//! A template describes, per section, which fields a message must or may
//! carry, their types and the defaults filled in for absent optional
//! fields. Templates are plain data; [`crate::bridge::validation::rules`]
//! evaluates them.

use serde_json::Value;

/// Expected type of a template field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Any JSON value.
    Any,
    /// A string.
    String,
    /// An integer.
    Integer,
    /// Any number, integer or floating point.
    Number,
    /// A boolean.
    Boolean,
    /// A list whose elements all match the inner type.
    List(Box<Self>),
    /// A mapping checked against a nested schema.
    Mapping(Schema),
}

impl FieldType {
    /// Creates a list type with the given element type.
    #[must_use]
    pub fn list_of(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a mapping type with no declared fields.
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Schema::new())
    }

    /// Returns `true` if the value has the right outer shape for this type.
    ///
    /// Elements of lists and fields of mappings are not inspected.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List(_) => value.is_array(),
            Self::Mapping(_) => value.is_object(),
        }
    }

    /// Describes the type for error messages, e.g. `list<string>`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "any".to_owned(),
            Self::String => "string".to_owned(),
            Self::Integer => "integer".to_owned(),
            Self::Number => "number".to_owned(),
            Self::Boolean => "boolean".to_owned(),
            Self::List(element) => format!("list<{}>", element.describe()),
            Self::Mapping(_) => "mapping".to_owned(),
        }
    }
}

/// Whether a field must be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// The field must be present.
    Required,
    /// The field may be absent; the value is inserted when it is.
    Optional(Value),
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    presence: Presence,
}

impl FieldSpec {
    /// Declares a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence: Presence::Required,
        }
    }

    /// Declares an optional field with a default.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType, default: Value) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence: Presence::Optional(default),
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Returns the presence rule.
    #[must_use]
    pub const fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Returns `true` if the field may be omitted.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self.presence, Presence::Optional(_))
    }
}

/// Ordered field declarations for one mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field declaration.
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the declared fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns `true` if no fields are declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named schema for the `data` and `context` sections of a message.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::domain::{FieldSpec, FieldType, Template};
/// use serde_json::json;
///
/// let template = Template::new("stt")
///     .with_data_field(FieldSpec::required("audio_file", FieldType::String))
///     .with_context_field(FieldSpec::optional("lang", FieldType::String, json!("en-us")));
///
/// assert_eq!(template.name(), "stt");
/// assert_eq!(template.data().fields().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    data: Schema,
    context: Schema,
}

impl Template {
    /// Creates a template with empty sections.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Schema::new(),
            context: Schema::new(),
        }
    }

    /// Declares a field of the `data` section.
    #[must_use]
    pub fn with_data_field(mut self, field: FieldSpec) -> Self {
        self.data = self.data.with_field(field);
        self
    }

    /// Declares a field of the `context` section.
    #[must_use]
    pub fn with_context_field(mut self, field: FieldSpec) -> Self {
        self.context = self.context.with_field(field);
        self
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `data` schema.
    #[must_use]
    pub const fn data(&self) -> &Schema {
        &self.data
    }

    /// Returns the `context` schema.
    #[must_use]
    pub const fn context(&self) -> &Schema {
        &self.context
    }
}

/// Names the JSON type of a value for error messages.
#[must_use]
pub const fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

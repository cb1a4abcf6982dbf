//! Structural checks of a message against a template.
//!
//! Checks mutate the message in place: defaults are inserted as each field
//! is visited, so a failure part-way through leaves earlier defaults in
//! the payload.

use crate::bridge::{
    domain::{FieldType, Message, Presence, Schema, Template, value_type_name},
    error::ValidationError,
};
use serde_json::{Map, Value};

/// Applies both sections of a template to a message.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, `data` before
/// `context`.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::domain::{Context, FieldSpec, FieldType, Message, Template};
/// use mq_bus_bridge::bridge::validation::rules::apply_template;
/// use serde_json::{Map, json};
///
/// let template = Template::new("greeting")
///     .with_data_field(FieldSpec::optional("lang", FieldType::String, json!("en-us")));
/// let mut message = Message::new("greet", Map::new(), Context::new()).expect("valid");
///
/// apply_template(&template, &mut message).expect("defaults apply");
/// assert_eq!(message.data().get("lang"), Some(&json!("en-us")));
/// ```
pub fn apply_template(template: &Template, message: &mut Message) -> Result<(), ValidationError> {
    apply_schema(template.data(), message.data_mut(), "data")?;
    apply_schema(template.context(), message.context_mut().as_map_mut(), "context")
}

/// Applies a schema to a mapping located at `path`.
///
/// Fields not declared by the schema are left untouched.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for an absent required field
/// and [`ValidationError::TypeMismatch`] for a value of the wrong type.
pub fn apply_schema(
    schema: &Schema,
    section: &mut Map<String, Value>,
    path: &str,
) -> Result<(), ValidationError> {
    for field in schema.fields() {
        let field_path = format!("{path}.{}", field.name());
        match section.get_mut(field.name()) {
            Some(value) if value.is_null() && field.is_optional() => {}
            Some(value) => check_value(field.field_type(), value, &field_path)?,
            None => match field.presence() {
                Presence::Required => return Err(ValidationError::missing_field(field_path)),
                Presence::Optional(default) => {
                    let mut value = default.clone();
                    check_value(field.field_type(), &mut value, &field_path)?;
                    section.insert(field.name().to_owned(), value);
                }
            },
        }
    }
    Ok(())
}

fn check_value(
    field_type: &FieldType,
    value: &mut Value,
    path: &str,
) -> Result<(), ValidationError> {
    let actual = value_type_name(value);
    let mismatch = || ValidationError::type_mismatch(path, field_type.describe(), actual);
    match field_type {
        FieldType::Mapping(schema) => match value {
            Value::Object(map) => apply_schema(schema, map, path),
            _ => Err(mismatch()),
        },
        FieldType::List(element) => match value {
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    check_value(element, item, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            _ => Err(mismatch()),
        },
        scalar if scalar.accepts(value) => Ok(()),
        _ => Err(mismatch()),
    }
}

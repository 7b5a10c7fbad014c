//! Parameter schema translation
//!
//! カタログのパラメータ定義を入力スキーマに変換し、
//! 実行前の入力検証に使います。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use tg_core::{Error, Result};

/// Value kind declared by a catalog parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Any kind this crate does not know about (e.g. `json`)
    #[default]
    #[serde(other)]
    Unknown,
}

/// Decode a field, falling back to `None` when its shape is unexpected
///
/// Only a missing name or value schema may drop a parameter, so the
/// other fields never fail the whole element.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_value_type<'de, D>(deserializer: D) -> std::result::Result<ValueType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Value schema of a catalog parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSchema {
    #[serde(default, deserialize_with = "lenient_value_type")]
    pub val_type: ValueType,
    #[serde(default, deserialize_with = "lenient")]
    pub inner_val_type: Option<ValueType>,
    /// Allowed values, any JSON kind
    #[serde(default, rename = "enum", deserialize_with = "lenient")]
    pub enum_values: Option<Vec<JsonValue>>,
}

/// Catalog parameter definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value_schema: Option<ValueSchema>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub required: Option<bool>,
}

/// Type of a schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array(Box<FieldType>),
    /// Open mapping from string keys to any value
    Record,
    Any,
}

impl FieldType {
    /// Map a value schema onto a field type
    pub fn from_value_schema(schema: &ValueSchema) -> Self {
        match schema.val_type {
            ValueType::String => FieldType::String,
            ValueType::Number | ValueType::Integer => FieldType::Number,
            ValueType::Boolean => FieldType::Boolean,
            ValueType::Array => {
                let inner = match schema.inner_val_type {
                    Some(ValueType::String) => FieldType::String,
                    Some(ValueType::Number | ValueType::Integer) => FieldType::Number,
                    Some(ValueType::Boolean) => FieldType::Boolean,
                    Some(ValueType::Array | ValueType::Object | ValueType::Unknown) | None => {
                        FieldType::Any
                    }
                };
                FieldType::Array(Box::new(inner))
            }
            ValueType::Object => FieldType::Record,
            ValueType::Unknown => FieldType::Any,
        }
    }

    /// Check a JSON value against this type
    pub fn check(&self, value: &JsonValue) -> std::result::Result<(), String> {
        let ok = match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Record => value.is_object(),
            FieldType::Any => true,
            FieldType::Array(inner) => {
                let Some(items) = value.as_array() else {
                    return Err(format!("expected array, got {}", value_type_name(value)));
                };
                for (i, item) in items.iter().enumerate() {
                    inner
                        .check(item)
                        .map_err(|e| format!("{} at index {}", e, i))?;
                }
                true
            }
        };

        if ok {
            Ok(())
        } else {
            Err(format!(
                "expected {}, got {}",
                self.type_name(),
                value_type_name(value)
            ))
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Record => "object",
            FieldType::Any => "any",
        }
    }

    /// JSON Schema fragment for this type
    fn to_json_schema(&self) -> JsonValue {
        match self {
            FieldType::String => json!({"type": "string"}),
            FieldType::Number => json!({"type": "number"}),
            FieldType::Boolean => json!({"type": "boolean"}),
            FieldType::Array(inner) => json!({"type": "array", "items": inner.to_json_schema()}),
            FieldType::Record => json!({"type": "object", "additionalProperties": true}),
            FieldType::Any => json!({}),
        }
    }
}

fn value_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// One named field of an input schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    /// Documentation only, never used for validation
    pub description: Option<String>,
    pub required: bool,
    pub enum_values: Option<Vec<JsonValue>>,
}

/// Input schema derived from a tool's parameter list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<SchemaField>,
}

impl InputSchema {
    /// Schema with no fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema from the raw `input.parameters` value
    ///
    /// Anything other than an array yields an empty schema. Elements that
    /// do not decode, have no name, or have no value schema are skipped.
    pub fn from_parameters(parameters: Option<&JsonValue>) -> Self {
        let Some(JsonValue::Array(items)) = parameters else {
            return Self::empty();
        };

        let params: Vec<Parameter> = items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect();

        Self::from_parameter_list(&params)
    }

    /// Build a schema from already decoded parameters
    pub fn from_parameter_list(params: &[Parameter]) -> Self {
        let mut schema = Self::empty();

        for param in params {
            let (Some(name), Some(value_schema)) = (&param.name, &param.value_schema) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            schema.insert(SchemaField {
                name: name.clone(),
                field_type: FieldType::from_value_schema(value_schema),
                description: param.description.clone().filter(|d| !d.is_empty()),
                // false と未指定はどちらも任意扱い
                required: param.required == Some(true),
                enum_values: value_schema.enum_values.clone(),
            });
        }

        schema
    }

    /// Insert a field; a field with the same name is replaced in place
    pub fn insert(&mut self, field: SchemaField) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate an invocation payload
    ///
    /// Returns the payload with undeclared keys removed. All violations are
    /// reported together in one `Error::InvalidInput`.
    pub fn validate(&self, input: &JsonValue) -> Result<JsonValue> {
        let Some(object) = input.as_object() else {
            return Err(Error::InvalidInput(format!(
                "expected object, got {}",
                value_type_name(input)
            )));
        };

        let mut problems = Vec::new();
        let mut coerced = Map::new();

        for field in &self.fields {
            match object.get(&field.name) {
                Some(value) => match field.field_type.check(value) {
                    Ok(()) => {
                        coerced.insert(field.name.clone(), value.clone());
                    }
                    Err(e) => problems.push(format!("field `{}`: {}", field.name, e)),
                },
                None if field.required => {
                    problems.push(format!("missing required field `{}`", field.name));
                }
                None => {}
            }
        }

        if problems.is_empty() {
            Ok(JsonValue::Object(coerced))
        } else {
            Err(Error::InvalidInput(problems.join("; ")))
        }
    }

    /// Render as a JSON Schema object for model tool definitions
    pub fn to_json_schema(&self) -> JsonValue {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = field.field_type.to_json_schema();
            if let JsonValue::Object(obj) = &mut prop {
                if let Some(desc) = &field.description {
                    obj.insert("description".to_string(), json!(desc));
                }
                if let Some(values) = &field.enum_values {
                    obj.insert("enum".to_string(), json!(values));
                }
            }
            properties.insert(field.name.clone(), prop);

            if field.required {
                required.push(field.name.clone());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

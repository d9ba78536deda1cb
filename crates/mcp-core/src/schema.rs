//! Simplified view of a tool's input schema.
//!
//! [`simplify`] projects a JSON Schema object onto the handful of facts worth
//! showing when browsing a tool: each property's type, whether it is
//! required, its enum values and, for object properties, the nested shape.
//! Everything else (formats, bounds, descriptions) is dropped.
//!
//! ```
//! use mcp_workbench_core::schema::simplify;
//! use serde_json::json;
//!
//! let schema = json!({"properties": {"a": {"type": "string"}}, "required": ["a"]});
//! let simplified = simplify(Some(&schema));
//! let a = simplified.get("a").unwrap();
//! assert_eq!(a.kind, "string");
//! assert!(a.required);
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Nesting depth past which object properties are no longer expanded.
pub const MAX_SCHEMA_DEPTH: usize = 32;

/// One property of a simplified schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SchemaProperty {
    /// Declared `type`, copied verbatim.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the enclosing node lists this property as required.
    pub required: bool,
    /// Allowed values, in declaration order.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Nested properties of an object-typed property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SimplifiedSchema>,
}

impl SchemaProperty {
    /// Whether this property has a nested shape to expand.
    pub fn is_object(&self) -> bool {
        self.kind == "object" && self.properties.is_some()
    }
}

/// Ordered mapping from property name to [`SchemaProperty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifiedSchema {
    fields: Vec<(String, SchemaProperty)>,
}

impl SimplifiedSchema {
    pub fn get(&self, name: &str) -> Option<&SchemaProperty> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, prop)| prop)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaProperty)> {
        self.fields.iter().map(|(name, prop)| (name.as_str(), prop))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, name: String, prop: SchemaProperty) {
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = prop,
            None => self.fields.push((name, prop)),
        }
    }
}

impl Serialize for SimplifiedSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, prop) in &self.fields {
            map.serialize_entry(name, prop)?;
        }
        map.end()
    }
}

/// Build the simplified view of a schema.
///
/// A missing schema, a non-object schema, or one without `properties`
/// yields an empty mapping.
pub fn simplify(schema: Option<&Value>) -> SimplifiedSchema {
    let Some(node) = schema.and_then(Value::as_object) else {
        return SimplifiedSchema::default();
    };
    match node.get("properties").and_then(Value::as_object) {
        Some(properties) => simplify_properties(properties, required_names(node), 0),
        None => SimplifiedSchema::default(),
    }
}

fn simplify_properties(
    properties: &Map<String, Value>,
    required: Vec<&str>,
    depth: usize,
) -> SimplifiedSchema {
    let mut simplified = SimplifiedSchema::default();

    for (name, prop) in properties {
        let kind = prop.get("type").map(type_label).unwrap_or_default();
        let enum_values = prop
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(enum_label).collect());

        let nested = match prop.get("properties").and_then(Value::as_object) {
            Some(nested) if kind == "object" => {
                if depth + 1 >= MAX_SCHEMA_DEPTH {
                    tracing::warn!(
                        "Schema nesting exceeds {} levels at '{}', not expanding further",
                        MAX_SCHEMA_DEPTH,
                        name
                    );
                    None
                } else {
                    let nested_required = prop
                        .as_object()
                        .map(required_names)
                        .unwrap_or_default();
                    Some(simplify_properties(nested, nested_required, depth + 1))
                }
            }
            _ => None,
        };

        simplified.insert(
            name.clone(),
            SchemaProperty {
                kind,
                required: required.contains(&name.as_str()),
                enum_values,
                properties: nested,
            },
        );
    }

    simplified
}

fn required_names(node: &Map<String, Value>) -> Vec<&str> {
    node.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn type_label(value: &Value) -> String {
    match value {
        Value::String(kind) => kind.clone(),
        other => other.to_string(),
    }
}

fn enum_label(value: &Value) -> String {
    match value {
        Value::String(item) => item.clone(),
        other => other.to_string(),
    }
}

//! Tool calling and function definition types.
//!
//! Schemas use `BTreeMap` so the JSON sent to the model lists properties in a
//! stable order.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Schema of the objects held in an array property.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ObjectSchema {
    /// Always "object".
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, Property>,
    pub required: Vec<String>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new(properties: BTreeMap<String, Property>, required: Vec<String>) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties,
            required,
        }
    }
}

/// A single property in a function parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Property {
    /// JSON type ("string", "integer", "object", ...).
    #[serde(rename = "type")]
    pub prop_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ObjectSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Self>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Property {
    fn typed(prop_type: &str, description: impl Into<String>) -> Self {
        Self {
            prop_type: prop_type.to_string(),
            description: description.into(),
            items: None,
            properties: None,
            required: None,
        }
    }

    #[must_use]
    pub fn string(description: impl Into<String>) -> Self {
        Self::typed("string", description)
    }

    #[must_use]
    pub fn integer(description: impl Into<String>) -> Self {
        Self::typed("integer", description)
    }

    #[must_use]
    pub fn boolean(description: impl Into<String>) -> Self {
        Self::typed("boolean", description)
    }

    /// An array whose items follow `items`.
    #[must_use]
    pub fn array(description: impl Into<String>, items: ObjectSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed("array", description)
        }
    }

    /// A free-form or partially described object.
    #[must_use]
    pub fn object(
        description: impl Into<String>,
        properties: BTreeMap<String, Self>,
        required: Vec<String>,
    ) -> Self {
        Self {
            properties: Some(properties),
            required: Some(required),
            ..Self::typed("object", description)
        }
    }
}

/// Parameter schema of a function, in JSON Schema form.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Parameters {
    #[serde(rename = "type")]
    pub param_type: String,
    pub properties: BTreeMap<String, Property>,
    pub required: Vec<String>,
}

impl Parameters {
    #[must_use]
    pub fn new(properties: BTreeMap<String, Property>, required: Vec<String>) -> Self {
        Self {
            param_type: "object".to_string(),
            properties,
            required,
        }
    }

    /// Builds parameters from `(name, property)` pairs.
    ///
    /// Every name listed in `required` must appear in `properties`.
    #[must_use]
    pub fn from_pairs<const N: usize>(properties: [(&str, Property); N], required: &[&str]) -> Self {
        Self::new(
            properties
                .into_iter()
                .map(|(name, prop)| (name.to_string(), prop))
                .collect(),
            required.iter().map(ToString::to_string).collect(),
        )
    }
}

impl From<Parameters> for serde_json::Value {
    fn from(params: Parameters) -> Self {
        match serde_json::to_value(params) {
            Ok(value) => value,
            Err(e) => {
                warn!("Parameters serialization unexpectedly failed: {e}");
                Self::Null
            }
        }
    }
}

/// A function the model may call.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Function {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments.
    pub parameters: serde_json::Value,
}

/// A tool offered to the model, wrapping a function.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder, Eq, PartialEq)]
pub struct Tool {
    #[serde(rename = "type")]
    #[builder(default = "function".to_string())]
    pub r#type: String,
    pub function: Function,
}

/// A function invocation with its raw JSON arguments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl FunctionCall {
    /// Returns the arguments, or `"{}"` when none were sent.
    #[must_use]
    pub fn arguments_json(&self) -> &str {
        if self.arguments.trim().is_empty() {
            "{}"
        } else {
            &self.arguments
        }
    }
}

/// A tool call issued by the model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
    pub call_type: String,
}

impl ToolCall {
    /// Creates a tool call with a fresh id.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
            call_type: "function".to_string(),
        }
    }
}

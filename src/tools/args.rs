//! Tool invocation arguments.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::types::ToolError;

/// Arguments of one tool invocation.
///
/// Wraps the `input` object the model sent. Fields can be read by name, or by
/// position in the order the model emitted them. Non-object input is treated
/// as no arguments at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    fields: Map<String, Value>,
}

impl ToolArgs {
    pub fn new(input: Value) -> Self {
        match input {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Argument values in the model's field order.
    pub fn positional(&self) -> Vec<&Value> {
        self.fields.values().collect()
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.fields.values().nth(index)
    }

    /// The `index`-th argument as a number.
    pub fn number(&self, index: usize) -> Result<f64, ToolError> {
        self.value(index)
            .ok_or_else(|| ToolError::invalid_input(format!("missing argument #{index}")))?
            .as_f64()
            .ok_or_else(|| ToolError::invalid_input(format!("argument #{index} is not a number")))
    }

    /// The `index`-th argument as a string slice.
    pub fn str(&self, index: usize) -> Result<&str, ToolError> {
        self.value(index)
            .ok_or_else(|| ToolError::invalid_input(format!("missing argument #{index}")))?
            .as_str()
            .ok_or_else(|| ToolError::invalid_input(format!("argument #{index} is not a string")))
    }

    /// Named argument, deserialized.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ToolError> {
        let value = self
            .fields
            .get(name)
            .ok_or_else(|| ToolError::invalid_input(format!("missing field `{name}`")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ToolError::invalid_input(format!("field `{name}`: {e}")))
    }

    pub fn get_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ToolError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(name).map(Some),
        }
    }

    /// Bind the whole input to a typed struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Value> for ToolArgs {
    fn from(input: Value) -> Self {
        Self::new(input)
    }
}

//! Sparse directory record model.
//!
//! A [`Record`] maps field names to loosely-typed values. Fields are kept in
//! insertion order so that repeated exports of the same data are
//! byte-identical and wildcard column expansion sees fields in
//! first-observation order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExportError, ExportResult};

/// A value for a record field, single or multi-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (null).
    Null,
    /// A single string value.
    String(String),
    /// A single integer value.
    Integer(i64),
    /// A single boolean value.
    Boolean(bool),
    /// A single floating-point value.
    Float(f64),
    /// Multiple values.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Get as a string if this is a single string value.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value as a single CSV cell.
    ///
    /// Scalars render in their canonical text form and null renders empty.
    /// Arrays render as their JSON literal so multi-valued fields stay
    /// unambiguous inside one cell.
    pub fn to_cell(&self) -> ExportResult<String> {
        match self {
            FieldValue::Null => Ok(String::new()),
            FieldValue::String(s) => Ok(s.clone()),
            FieldValue::Integer(n) => Ok(n.to_string()),
            FieldValue::Boolean(b) => Ok(b.to_string()),
            FieldValue::Float(f) => Ok(f.to_string()),
            FieldValue::Array(_) => serde_json::to_string(self)
                .map_err(|e| ExportError::InvalidInput(format!("unencodable array value: {e}"))),
        }
    }

    /// Convert a JSON value into a field value.
    ///
    /// Objects are rejected: a field holds a scalar or a sequence of
    /// scalars, nothing deeper.
    pub fn from_json(value: &Value) -> ExportResult<Self> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else {
                    Ok(FieldValue::Float(n.as_f64().unwrap_or_default()))
                }
            }
            Value::String(s) => Ok(FieldValue::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(FieldValue::from_json)
                .collect::<ExportResult<Vec<_>>>()
                .map(FieldValue::Array),
            Value::Object(_) => Err(ExportError::InvalidInput(
                "object values are not supported in record fields".to_string(),
            )),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Array(values.into_iter().map(FieldValue::String).collect())
    }
}

/// One exported entity's sparse field-to-value mapping.
///
/// Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Set a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Set a field using builder pattern.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if a field exists.
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object value.
    pub fn from_json(value: &Value) -> ExportResult<Self> {
        let Value::Object(map) = value else {
            return Err(ExportError::InvalidInput(
                "a record must be a JSON object".to_string(),
            ));
        };

        let mut record = Record::new();
        for (name, value) in map {
            record.set(name.clone(), FieldValue::from_json(value)?);
        }
        Ok(record)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

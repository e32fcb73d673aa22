//! Records and outcomes of upsert synchronization.

use serde::Serialize;
use serde_json::{Map, Value};

use proffix_rest_client::{Error, ErrorKind, Result};

/// One record to synchronize: a JSON object plus the name of its key field.
///
/// Fields other than the key are passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRecord {
    key_field: String,
    fields: Map<String, Value>,
}

impl SyncRecord {
    pub fn new(key_field: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            key_field: key_field.into(),
            fields,
        }
    }

    /// Build a record from any value that serializes to a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(key_field: impl Into<String>, value: &T) -> Result<Self> {
        Self::from_value(key_field, serde_json::to_value(value)?)
    }

    /// Build a record from a JSON value, which must be an object.
    pub fn from_value(key_field: impl Into<String>, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(key_field, fields)),
            other => Err(Error::new(ErrorKind::InvalidInput(format!(
                "sync record must be a JSON object, got {}",
                json_type(&other)
            )))),
        }
    }

    /// Parse a JSON array of objects into records.
    pub fn parse_array(key_field: &str, data: &[u8]) -> Result<Vec<Self>> {
        let values: Vec<Value> = serde_json::from_slice(data)?;
        values
            .into_iter()
            .map(|value| Self::from_value(key_field, value))
            .collect()
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// The key as used in URLs. Missing, null and empty keys yield `None`.
    pub fn key(&self) -> Option<String> {
        match self.fields.get(&self.key_field)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Fields without the key field.
    pub fn without_key(&self) -> Map<String, Value> {
        let mut fields = self.fields.clone();
        fields.remove(&self.key_field);
        fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record did not exist and was created. Holds the key assigned by
    /// the server.
    Created(String),
    /// The record existed and was updated.
    Updated(String),
    /// The record could not be written.
    Failed { key: String, message: String },
}

impl SyncOutcome {
    pub fn key(&self) -> &str {
        match self {
            SyncOutcome::Created(key) | SyncOutcome::Updated(key) => key,
            SyncOutcome::Failed { key, .. } => key,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Summary of a batch synchronization.
///
/// Every processed record lands in exactly one of `created`, `updated` or
/// `failed`; `errors` holds one message per failed record, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncBatchReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub failed: Vec<String>,
    pub errors: Vec<String>,
    pub total: usize,
}

impl SyncBatchReport {
    /// Record the outcome of one record.
    pub fn record(&mut self, outcome: SyncOutcome) {
        self.total += 1;
        match outcome {
            SyncOutcome::Created(key) => self.created.push(key),
            SyncOutcome::Updated(key) => self.updated.push(key),
            SyncOutcome::Failed { key, message } => {
                self.failed.push(key);
                self.errors.push(message);
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

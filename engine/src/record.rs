//! Record type and sanitization.
//!
//! A record is an opaque JSON object. The only structure the engine relies on
//! is a non-empty string `id` and an optional `updatedAt` timestamp; every other
//! field is carried through untouched.

use crate::{Error, RecordId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field holding the record identifier.
pub const ID_FIELD: &str = "id";

/// Field holding the last-modified timestamp (milliseconds since epoch).
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// A validated record: a JSON object with a non-empty string id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Validate a JSON value, cloning it into a record.
    ///
    /// Returns `None` for anything that is not an object with a non-empty id.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        if has_valid_id(fields) {
            Some(Self {
                fields: fields.clone(),
            })
        } else {
            None
        }
    }

    /// Create a record from an id and content fields.
    ///
    /// Any `id` inside `fields` is overwritten.
    pub fn new(id: impl Into<RecordId>, mut fields: Map<String, Value>) -> Result<Self, Error> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidRecord("id must not be empty".into()));
        }
        fields.insert(ID_FIELD.to_string(), Value::String(id));
        Ok(Self { fields })
    }

    /// The record identifier.
    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Last-modified timestamp; missing or unparseable values count as the epoch.
    pub fn updated_at(&self) -> Timestamp {
        timestamp_of(self.fields.get(UPDATED_AT_FIELD))
    }

    /// Whether the record carries a usable `updatedAt`.
    pub fn has_timestamp(&self) -> bool {
        self.updated_at() > 0
    }

    /// Set the last-modified timestamp.
    pub fn set_updated_at(&mut self, timestamp: Timestamp) {
        self.fields
            .insert(UPDATED_AT_FIELD.to_string(), Value::from(timestamp));
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field value. Setting `id` is ignored; ids never change.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        if field != ID_FIELD {
            self.fields.insert(field, value);
        }
    }

    /// All fields, including `id`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) if has_valid_id(&fields) => Ok(Self { fields }),
            Value::Object(_) => Err(Error::InvalidRecord(
                "record must have a non-empty string id".into(),
            )),
            _ => Err(Error::InvalidRecord("record must be a JSON object".into())),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

fn has_valid_id(fields: &Map<String, Value>) -> bool {
    matches!(fields.get(ID_FIELD), Some(Value::String(id)) if !id.is_empty())
}

/// Parse a timestamp field.
///
/// Accepts JSON numbers (floats truncated) and decimal strings. Negative,
/// non-finite, missing and non-numeric values all read as 0.
pub fn timestamp_of(value: Option<&Value>) -> Timestamp {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| float_millis(n.as_f64())),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .unwrap_or_else(|_| float_millis(s.parse::<f64>().ok()))
        }
        _ => 0,
    }
}

fn float_millis(value: Option<f64>) -> Timestamp {
    match value {
        Some(f) if f.is_finite() && f > 0.0 => f as Timestamp,
        _ => 0,
    }
}

/// Keep only valid records from a slice of raw values.
pub fn sanitize(values: &[Value]) -> Vec<Record> {
    values.iter().filter_map(Record::from_value).collect()
}

/// Deserialize a record list, silently dropping malformed elements.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| Record::try_from(value).ok())
        .collect())
}

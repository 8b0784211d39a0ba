//! Structured `status: ok | error` results for the calling tool layer

use crate::error::{AtlasError, AtlasResult};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// A tagged operation result, flattened into one JSON object
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Payload fields sit beside `"status": "ok"`
    Ok(Map<String, Value>),
    /// `"status": "error"` with a message and optional hint
    Error {
        error: String,
        hint: Option<&'static str>,
    },
}

impl Response {
    /// Wrap an operation result
    pub fn from_result<T: Serialize>(result: AtlasResult<T>) -> Self {
        match result.and_then(|payload| to_object(&payload)) {
            Ok(fields) => Self::Ok(fields),
            Err(e) => Self::from_error(&e),
        }
    }

    /// Describe an error
    pub fn from_error(err: &AtlasError) -> Self {
        Self::Error {
            error: err.to_string(),
            hint: err.hint(),
        }
    }

    /// Whether the operation succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Render as a single JSON object
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ok(fields) => {
                let mut object = Map::with_capacity(fields.len() + 1);
                object.insert("status".to_string(), json!("ok"));
                object.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                Value::Object(object)
            }
            Self::Error { error, hint } => {
                let mut object = Map::new();
                object.insert("status".to_string(), json!("error"));
                object.insert("error".to_string(), json!(error));
                if let Some(hint) = hint {
                    object.insert("hint".to_string(), json!(hint));
                }
                Value::Object(object)
            }
        }
    }
}

impl Serialize for Response {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn to_object<T: Serialize>(payload: &T) -> AtlasResult<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        other => {
            let mut fields = Map::new();
            fields.insert("result".to_string(), other);
            Ok(fields)
        }
    }
}

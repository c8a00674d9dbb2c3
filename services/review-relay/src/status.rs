//! Review API payload types, validation and message formatting

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{RelayError, Result};

/// Keys accepted for the record list, canonical name first
const ITEMS_KEYS: &[&str] = &["items", "homeworks"];
/// Keys accepted for the next-request cursor, canonical name first
const CURSOR_KEYS: &[&str] = &["cursor", "current_date"];

/// Review verdict reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    /// Human sentence sent to the chat for this verdict
    pub fn sentence(&self) -> &'static str {
        match self {
            Verdict::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Verdict::Reviewing => "The work has been taken for review.",
            Verdict::Rejected => "The work has been reviewed: the reviewer left comments.",
        }
    }
}

impl FromStr for Verdict {
    type Err = RelayError;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "approved" => Ok(Verdict::Approved),
            "reviewing" => Ok(Verdict::Reviewing),
            "rejected" => Ok(Verdict::Rejected),
            other => Err(RelayError::UnknownVerdict(other.to_string())),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Approved => write!(f, "approved"),
            Verdict::Reviewing => write!(f, "reviewing"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}

/// The latest status of one tracked work item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub name: String,
    pub verdict: String,
}

impl StatusRecord {
    /// Read a record from a raw list element.
    ///
    /// Accepts `homework_name`/`status` in place of `name`/`verdict`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Err(RelayError::EmptyData),
            Value::Object(object) if object.is_empty() => return Err(RelayError::EmptyData),
            Value::Object(object) => object,
            other => {
                return Err(RelayError::TypeMismatch(format!(
                    "status record is {}, expected an object",
                    json_type(other)
                )))
            }
        };

        let name = string_field(object, &["name", "homework_name"])?;
        let verdict = string_field(object, &["verdict", "status"])?;
        Ok(Self { name, verdict })
    }
}

/// A validated poll response
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Records ordered newest first
    pub items: Vec<Value>,
    /// Cursor to use as `from_date` on the next request
    pub cursor: Option<i64>,
}

impl PollResponse {
    /// Check the shape of a decoded API body.
    ///
    /// Fails only when *both* the records key and the cursor key are absent;
    /// either one alone is accepted. A missing records key is an empty list.
    pub fn validate(response: &Value) -> Result<Self> {
        let Value::Object(object) = response else {
            return Err(RelayError::TypeMismatch(format!(
                "API response is {}, expected an object",
                json_type(response)
            )));
        };

        let items = lookup(object, ITEMS_KEYS);
        let cursor = lookup(object, CURSOR_KEYS);
        if items.is_none() && cursor.is_none() {
            tracing::error!("API response has neither records nor cursor");
            return Err(RelayError::MissingKey(format!(
                "expected '{}' or '{}'",
                ITEMS_KEYS[0], CURSOR_KEYS[0]
            )));
        }

        let items = match items {
            None => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(RelayError::TypeMismatch(format!(
                    "'{}' is {}, expected a list",
                    ITEMS_KEYS[0],
                    json_type(other)
                )))
            }
        };

        let cursor = match cursor {
            None => None,
            Some(value) => {
                let parsed = value.as_i64();
                if parsed.is_none() {
                    tracing::warn!(
                        "Ignoring cursor {} in API response, expected an integer",
                        value
                    );
                }
                parsed
            }
        };

        Ok(Self { items, cursor })
    }

    /// The most recent record, if any
    pub fn latest(&self) -> Option<&Value> {
        self.items.first()
    }
}

/// Render the chat message for a raw status record
pub fn format_status(record: &Value) -> Result<String> {
    let record = StatusRecord::from_value(record)?;
    let verdict: Verdict = record.verdict.parse().inspect_err(|e| {
        tracing::error!("Unexpected status in API response: {}", e);
    })?;
    tracing::debug!("Record {} has verdict {}", record.name, verdict);
    Ok(format!(
        "Review status changed for \"{}\". {}",
        record.name,
        verdict.sentence()
    ))
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn string_field(object: &Map<String, Value>, keys: &[&str]) -> Result<String> {
    match lookup(object, keys) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(RelayError::TypeMismatch(format!(
            "'{}' is {}, expected a string",
            keys[0],
            json_type(other)
        ))),
        None => Err(RelayError::MissingKey(format!(
            "status record has no '{}'",
            keys[0]
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

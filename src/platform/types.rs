//! Platform contract types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A table row as the platform sees it
pub type Record = serde_json::Map<String, Value>;

/// Result type for platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Errors reported by the identity service or the data store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// An identity with this email already exists
    #[error("already registered: {0}")]
    AlreadyRegistered(String),

    /// Email/password pair was not accepted
    #[error("invalid credentials for {0}")]
    InvalidCredentials(String),

    /// The platform answered with a non-success status
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The request never got a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The call exceeded its time bound
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The response could not be interpreted
    #[error("decode error: {0}")]
    Decode(String),

    /// Addressed entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl PlatformError {
    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode(message.into())
    }
}

/// Tables the workflow writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Profiles,
    Organizations,
    Capabilities,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Organizations => "organizations",
            Table::Capabilities => "capabilities",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conjunction of column equality conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`
    pub fn eq<C: Into<String>, V: Into<Value>>(mut self, column: C, value: V) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Whether a record satisfies every condition
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| record.get(column) == Some(value))
    }

    /// Conditions in REST query form (`column=eq.value`)
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|(column, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (column.clone(), format!("eq.{}", value))
            })
            .collect()
    }
}

/// Authentication identity held by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authoritative id, immutable once assigned
    pub id: String,
    pub email: String,
}

/// Serialize a value into a record
pub fn to_record<T: Serialize>(value: &T) -> PlatformResult<Record> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PlatformError::decode(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(PlatformError::decode(e.to_string())),
    }
}

/// Deserialize a record into a typed row
pub fn from_record<T: DeserializeOwned>(record: Record) -> PlatformResult<T> {
    serde_json::from_value(Value::Object(record)).map_err(|e| PlatformError::decode(e.to_string()))
}

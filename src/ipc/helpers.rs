use serde::de::DeserializeOwned;

use crate::accounts::AccountError;
use crate::ipc::error::{err, ok};
use crate::ipc::types::AppState;
use crate::store::{RecordStore, SqliteKv, StoreError};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn no_workspace() -> Self {
        Self::new("no_workspace", "select a workspace first")
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<StoreError> for HandlerErr {
    fn from(e: StoreError) -> Self {
        let details = match &e {
            StoreError::Corrupt { key, .. } | StoreError::Encode { key, .. } => {
                Some(serde_json::json!({ "key": key }))
            }
            StoreError::Backend(_) => None,
        };
        Self {
            code: "store_failed",
            message: e.to_string(),
            details,
        }
    }
}

impl From<AccountError> for HandlerErr {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Store(inner) => inner.into(),
            other => Self::new(other.code(), other.to_string()),
        }
    }
}

/// Turn a handler outcome into the wire envelope.
pub fn respond(id: &str, outcome: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match outcome {
        Ok(result) => ok(id, result),
        Err(e) => e.response(id),
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Optional string param; empty strings count as absent.
pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Deserialize the whole params object into a creation input.
pub fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, HandlerErr> {
    serde_json::from_value(params.clone()).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

pub fn store_mut(state: &mut AppState) -> Result<&mut RecordStore<SqliteKv>, HandlerErr> {
    state.store.as_mut().ok_or_else(HandlerErr::no_workspace)
}

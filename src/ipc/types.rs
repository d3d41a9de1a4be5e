use std::path::PathBuf;

use serde::Deserialize;

use crate::session::Session;
use crate::store::{RecordStore, SqliteKv};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything the daemon holds between requests. `store` is `None` until a
/// workspace has been selected.
#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<RecordStore<SqliteKv>>,
    pub session: Session,
}

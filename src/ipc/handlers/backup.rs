use crate::backup;
use crate::ipc::helpers::{get_required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::session::Session;
use serde_json::json;
use std::path::PathBuf;

fn backup_export(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let out_path = PathBuf::from(get_required_str(&req.params, "outPath")?);
    let store = state.store.as_ref().ok_or_else(HandlerErr::no_workspace)?;
    let summary = backup::export_workspace_bundle(store, &out_path)
        .map_err(|e| HandlerErr::new("backup_failed", format!("{e:?}")))?;
    Ok(json!({
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
    }))
}

/// Replaces every collection and the session pointer, then reloads the
/// session from what was imported.
fn backup_import(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let in_path = PathBuf::from(get_required_str(&req.params, "inPath")?);
    let AppState { store, session, .. } = state;
    let store = store.as_mut().ok_or_else(HandlerErr::no_workspace)?;
    let summary = backup::import_workspace_bundle(store, &in_path)
        .map_err(|e| HandlerErr::new("backup_failed", format!("{e:?}")))?;
    *session = Session::restore(&*store)?;
    Ok(json!({
        "bundleFormatDetected": summary.bundle_format_detected,
        "keysRestored": summary.keys_restored,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "backup.export" => backup_export(state, req),
        "backup.import" => backup_import(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

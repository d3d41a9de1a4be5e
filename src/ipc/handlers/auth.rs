use crate::accounts;
use crate::ipc::helpers::{get_required_str, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::NewUser;
use serde_json::json;

fn session_get(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let user = match state.store.as_ref() {
        Some(store) => state.session.current_user(store)?,
        None => None,
    };
    Ok(json!({ "user": user }))
}

/// `userId` may be a string or null; null clears the session.
fn session_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let AppState { store, session, .. } = state;
    let store = store.as_mut().ok_or_else(HandlerErr::no_workspace)?;
    match req.params.get("userId") {
        Some(serde_json::Value::String(id)) if !id.is_empty() => session.begin(store, id)?,
        None | Some(serde_json::Value::Null) => session.end(store)?,
        Some(serde_json::Value::String(_)) => session.end(store)?,
        Some(_) => return Err(HandlerErr::bad_params("userId must be a string or null")),
    }
    Ok(json!({ "ok": true }))
}

fn auth_register(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let AppState { store, session, .. } = state;
    let store = store.as_mut().ok_or_else(HandlerErr::no_workspace)?;
    let new: NewUser = parse_params(&req.params)?;
    let user = accounts::register(store, session, new)?;
    Ok(json!({ "user": user }))
}

fn auth_login(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let email = get_required_str(&req.params, "email")?;
    let password = get_required_str(&req.params, "password")?;
    let AppState { store, session, .. } = state;
    let store = store.as_mut().ok_or_else(HandlerErr::no_workspace)?;
    let user = accounts::login(store, session, &email, &password)?;
    Ok(json!({ "user": user }))
}

fn auth_logout(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let AppState { store, session, .. } = state;
    let store = store.as_mut().ok_or_else(HandlerErr::no_workspace)?;
    accounts::logout(store, session)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "session.get" => session_get(state, req),
        "session.set" => session_set(state, req),
        "auth.register" => auth_register(state, req),
        "auth.login" => auth_login(state, req),
        "auth.logout" => auth_logout(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

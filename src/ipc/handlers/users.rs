use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_params, respond, store_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewUser, Role};
use serde_json::json;

fn users_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "users": [] }));
    };
    let users = match get_optional_str(&req.params, "role") {
        Some(r) => {
            let role = Role::parse(&r)
                .ok_or_else(|| HandlerErr::bad_params("role must be student or teacher"))?;
            store.users_by_role(role)?
        }
        None => store.users()?,
    };
    Ok(json!({ "users": users }))
}

fn users_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let user_id = get_required_str(&req.params, "userId")?;
    let user = match state.store.as_ref() {
        Some(store) => store.user_by_id(&user_id)?,
        None => None,
    };
    Ok(json!({ "user": user }))
}

fn users_get_by_email(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let email = get_required_str(&req.params, "email")?;
    let user = match state.store.as_ref() {
        Some(store) => store.user_by_email(&email)?,
        None => None,
    };
    Ok(json!({ "user": user }))
}

/// Raw create: no email check. Registration goes through `auth.register`.
fn users_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = store_mut(state)?;
    let new: NewUser = parse_params(&req.params)?;
    let user_id = store.create_user(new)?;
    Ok(json!({ "userId": user_id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "users.list" => users_list(state, req),
        "users.get" => users_get(state, req),
        "users.getByEmail" => users_get_by_email(state, req),
        "users.create" => users_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_params, respond, store_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::NewQuery;
use serde_json::json;

fn queries_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "queries": [] }));
    };
    let student_id = get_optional_str(&req.params, "studentId");
    let teacher_id = get_optional_str(&req.params, "teacherId");
    let queries = match (student_id, teacher_id) {
        (Some(s), _) => store.queries_by_student(&s)?,
        (None, Some(t)) => store.queries_by_teacher(&t)?,
        (None, None) => store.queries()?,
    };
    Ok(json!({ "queries": queries }))
}

fn queries_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let query_id = get_required_str(&req.params, "queryId")?;
    let query = match state.store.as_ref() {
        Some(store) => store.query_by_id(&query_id)?,
        None => None,
    };
    Ok(json!({ "query": query }))
}

fn queries_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = store_mut(state)?;
    let new: NewQuery = parse_params(&req.params)?;
    let query_id = store.create_query(new)?;
    Ok(json!({ "queryId": query_id }))
}

/// Unknown query ids succeed without changing anything.
fn queries_answer(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let query_id = get_required_str(&req.params, "queryId")?;
    let answer = get_required_str(&req.params, "answer")?;
    let store = store_mut(state)?;
    store.answer_query(&query_id, &answer)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "queries.list" => queries_list(state, req),
        "queries.get" => queries_get(state, req),
        "queries.create" => queries_create(state, req),
        "queries.answer" => queries_answer(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

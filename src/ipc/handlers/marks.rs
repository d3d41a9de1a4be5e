use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_params, respond, store_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::NewMarks;
use serde_json::json;

fn marks_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "marks": [] }));
    };
    let student_id = get_optional_str(&req.params, "studentId");
    let course_id = get_optional_str(&req.params, "courseId");
    let marks = match (student_id, course_id) {
        (Some(s), Some(c)) => {
            let mut rows = store.marks_by_student(&s)?;
            rows.retain(|m| m.course_id == c);
            rows
        }
        (Some(s), None) => store.marks_by_student(&s)?,
        (None, Some(c)) => store.marks_by_course(&c)?,
        (None, None) => store.marks()?,
    };
    Ok(json!({ "marks": marks }))
}

fn marks_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "marksId")?;
    let row = match state.store.as_ref() {
        Some(store) => store.marks_by_id(&id)?,
        None => None,
    };
    Ok(json!({ "marks": row }))
}

fn marks_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = store_mut(state)?;
    let new: NewMarks = parse_params(&req.params)?;
    let marks_id = store.create_marks(new)?;
    Ok(json!({ "marksId": marks_id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "marks.list" => marks_list(state, req),
        "marks.get" => marks_get(state, req),
        "marks.create" => marks_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

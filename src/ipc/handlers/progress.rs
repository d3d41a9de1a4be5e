use crate::calc;
use crate::ipc::helpers::{get_required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn progress_student(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(&req.params, "studentId")?;
    let store = state.store.as_ref().ok_or_else(HandlerErr::no_workspace)?;
    let progress = calc::student_progress(store, &student_id)?;
    Ok(json!({ "progress": progress }))
}

fn progress_course(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(&req.params, "courseId")?;
    let store = state.store.as_ref().ok_or_else(HandlerErr::no_workspace)?;
    match calc::course_progress(store, &course_id)? {
        Some(progress) => Ok(json!({ "progress": progress })),
        None => Err(HandlerErr::new("not_found", "course not found")),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "progress.student" => progress_student(state, req),
        "progress.course" => progress_course(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

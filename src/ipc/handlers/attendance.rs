use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_params, respond, store_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::NewAttendance;
use serde_json::json;

fn attendance_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "attendance": [] }));
    };
    let student_id = get_optional_str(&req.params, "studentId");
    let course_id = get_optional_str(&req.params, "courseId");
    let rows = match (student_id, course_id) {
        (Some(s), c) => store.attendance_by_student(&s, c.as_deref())?,
        (None, Some(c)) => store.attendance_by_course(&c)?,
        (None, None) => store.attendance()?,
    };
    Ok(json!({ "attendance": rows }))
}

fn attendance_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "attendanceId")?;
    let row = match state.store.as_ref() {
        Some(store) => store.attendance_by_id(&id)?,
        None => None,
    };
    Ok(json!({ "attendance": row }))
}

fn attendance_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = store_mut(state)?;
    let new: NewAttendance = parse_params(&req.params)?;
    let attendance_id = store.create_attendance(new)?;
    Ok(json!({ "attendanceId": attendance_id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "attendance.list" => attendance_list(state, req),
        "attendance.get" => attendance_get(state, req),
        "attendance.create" => attendance_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

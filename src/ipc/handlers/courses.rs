use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_params, respond, store_mut, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::NewCourse;
use serde_json::json;

fn courses_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "courses": [] }));
    };
    let teacher_id = get_optional_str(&req.params, "teacherId");
    let student_id = get_optional_str(&req.params, "studentId");
    let courses = match (teacher_id, student_id) {
        (Some(t), _) => store.courses_by_teacher(&t)?,
        (None, Some(s)) => store.courses_by_student(&s)?,
        (None, None) => store.courses()?,
    };
    Ok(json!({ "courses": courses }))
}

fn courses_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_str(&req.params, "courseId")?;
    let course = match state.store.as_ref() {
        Some(store) => store.course_by_id(&course_id)?,
        None => None,
    };
    Ok(json!({ "course": course }))
}

fn courses_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = store_mut(state)?;
    let new: NewCourse = parse_params(&req.params)?;
    let course_id = store.create_course(new)?;
    Ok(json!({ "courseId": course_id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let outcome = match req.method.as_str() {
        "courses.list" => courses_list(state, req),
        "courses.get" => courses_get(state, req),
        "courses.create" => courses_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, outcome))
}

use serde::Serialize;

use crate::model::{Attendance, AttendanceStatus, Marks, Role, User};
use crate::store::{KvBackend, RecordStore, StoreError};

/// Total marks over total max marks, as a percentage. 0 when nothing is out of
/// anything.
pub fn average_percentage(marks: &[Marks]) -> f64 {
    let total: f64 = marks.iter().map(|m| m.marks).sum();
    let max_total: f64 = marks.iter().map(|m| m.max_marks).sum();
    if max_total > 0.0 {
        (total / max_total) * 100.0
    } else {
        0.0
    }
}

/// Present rows over all rows, as a percentage. 0 for an empty slice.
pub fn attendance_percentage(rows: &[Attendance]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let present = rows
        .iter()
        .filter(|a| a.status == AttendanceStatus::Present)
        .count();
    (present as f64 / rows.len() as f64) * 100.0
}

/// Two-decimal display form, e.g. `90.00`.
pub fn format_percent(x: f64) -> String {
    format!("{:.2}", x)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub average_marks: String,
    pub attendance_percentage: String,
    pub total_courses: usize,
    pub total_marks: usize,
    pub total_attendance: usize,
}

pub fn student_progress<B: KvBackend>(
    store: &RecordStore<B>,
    student_id: &str,
) -> Result<StudentProgress, StoreError> {
    let marks = store.marks_by_student(student_id)?;
    let attendance = store.attendance_by_student(student_id, None)?;
    let courses = store.courses_by_student(student_id)?;

    Ok(StudentProgress {
        average_marks: format_percent(average_percentage(&marks)),
        attendance_percentage: format_percent(attendance_percentage(&attendance)),
        total_courses: courses.len(),
        total_marks: marks.len(),
        total_attendance: attendance.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStudentProgress {
    pub student_id: String,
    pub student_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    pub average_marks: String,
    pub attendance_percentage: String,
    pub marks_count: usize,
    pub attendance_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    pub course_name: String,
    pub students: Vec<CourseStudentProgress>,
}

/// Per-student figures for one course. The roster is every student user with
/// at least one marks or attendance row in the course, in user order.
pub fn course_progress<B: KvBackend>(
    store: &RecordStore<B>,
    course_id: &str,
) -> Result<Option<CourseProgress>, StoreError> {
    let Some(course) = store.course_by_id(course_id)? else {
        return Ok(None);
    };
    let course_marks = store.marks_by_course(course_id)?;
    let course_attendance = store.attendance_by_course(course_id)?;

    let roster: Vec<User> = store
        .users_by_role(Role::Student)?
        .into_iter()
        .filter(|s| {
            course_marks.iter().any(|m| m.student_id == s.id)
                || course_attendance.iter().any(|a| a.student_id == s.id)
        })
        .collect();

    let students = roster
        .into_iter()
        .map(|student| {
            let marks: Vec<Marks> = course_marks
                .iter()
                .filter(|m| m.student_id == student.id)
                .cloned()
                .collect();
            let attendance: Vec<Attendance> = course_attendance
                .iter()
                .filter(|a| a.student_id == student.id)
                .cloned()
                .collect();
            CourseStudentProgress {
                average_marks: format_percent(average_percentage(&marks)),
                attendance_percentage: format_percent(attendance_percentage(&attendance)),
                marks_count: marks.len(),
                attendance_count: attendance.len(),
                student_id: student.id,
                student_name: student.name,
                student_number: student.student_id,
            }
        })
        .collect();

    Ok(Some(CourseProgress {
        course_id: course.id,
        course_name: course.course_name,
        students,
    }))
}

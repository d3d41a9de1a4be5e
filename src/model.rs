//! Persisted record types.
//!
//! Every record serializes with camelCase keys so the stored blobs keep the
//! shape the front end reads. Name fields copied from other records
//! (`studentName`, `courseName`, ...) are snapshots taken at creation time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    /// Stored and compared as plain text.
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enrolled student ids. Nothing in the system fills this in; course
    /// membership is normally inferred from marks and attendance rows.
    #[serde(default)]
    pub students: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marks {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_type: String,
    pub teacher_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub status: AttendanceStatus,
    pub teacher_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub status: QueryStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<String>,
}

// Creation inputs: everything except the fields the store assigns.

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

impl NewUser {
    pub fn into_record(self, id: String, created_at: String) -> User {
        User {
            id,
            email: self.email,
            password: self.password,
            role: self.role,
            name: self.name,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub students: Vec<String>,
}

impl NewCourse {
    pub fn into_record(self, id: String, created_at: String) -> Course {
        Course {
            id,
            course_code: self.course_code,
            course_name: self.course_name,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            description: self.description,
            students: self.students,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarks {
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_type: String,
    pub teacher_id: String,
}

impl NewMarks {
    pub fn into_record(self, id: String, created_at: String) -> Marks {
        Marks {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            course_id: self.course_id,
            course_name: self.course_name,
            marks: self.marks,
            max_marks: self.max_marks,
            exam_type: self.exam_type,
            teacher_id: self.teacher_id,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub student_id: String,
    pub student_name: String,
    pub course_id: String,
    pub course_name: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub teacher_id: String,
}

impl NewAttendance {
    pub fn into_record(self, id: String, created_at: String) -> Attendance {
        Attendance {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            course_id: self.course_id,
            course_name: self.course_name,
            date: self.date,
            status: self.status,
            teacher_id: self.teacher_id,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuery {
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    pub question: String,
}

impl NewQuery {
    /// New queries always start out pending and unanswered.
    pub fn into_record(self, id: String, created_at: String) -> Query {
        Query {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            course_id: self.course_id,
            course_name: self.course_name,
            question: self.question,
            answer: None,
            status: QueryStatus::Pending,
            created_at,
            answered_at: None,
        }
    }
}

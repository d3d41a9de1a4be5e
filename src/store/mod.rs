//! Record store: the five entity collections and the session pointer.
//!
//! Each collection is a single JSON array stored under a fixed key and is
//! always read and written whole. Filters are linear scans over the loaded
//! collection and keep insertion order. The store does not check that ids a
//! record refers to actually exist.

mod backend;

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{
    Attendance, Course, Marks, NewAttendance, NewCourse, NewMarks, NewQuery, NewUser, Query,
    QueryStatus, Role, User,
};

#[cfg(test)]
pub use backend::MemoryKv;
pub use backend::{KvBackend, SqliteKv};

pub const USERS_KEY: &str = "college_users";
pub const COURSES_KEY: &str = "college_courses";
pub const MARKS_KEY: &str = "college_marks";
pub const ATTENDANCE_KEY: &str = "college_attendance";
pub const QUERIES_KEY: &str = "college_queries";
pub const CURRENT_USER_KEY: &str = "college_current_user";

/// Every key the store owns, in a stable order.
pub const ALL_KEYS: [&str; 6] = [
    USERS_KEY,
    COURSES_KEY,
    MARKS_KEY,
    ATTENDANCE_KEY,
    QUERIES_KEY,
    CURRENT_USER_KEY,
];

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("stored value under '{key}' is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A record type with its own collection key.
pub trait Collection: Serialize + DeserializeOwned {
    const KEY: &'static str;

    fn id(&self) -> &str;
}

impl Collection for User {
    const KEY: &'static str = USERS_KEY;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Collection for Course {
    const KEY: &'static str = COURSES_KEY;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Collection for Marks {
    const KEY: &'static str = MARKS_KEY;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Collection for Attendance {
    const KEY: &'static str = ATTENDANCE_KEY;
    fn id(&self) -> &str {
        &self.id
    }
}

impl Collection for Query {
    const KEY: &'static str = QUERIES_KEY;
    fn id(&self) -> &str {
        &self.id
    }
}

/// Millisecond timestamp followed by nine random base-36 characters.
/// Collisions are not checked.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut n = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    format!("{millis}{suffix}")
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct RecordStore<B> {
    backend: B,
}

impl<B: KvBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    // ---- generic collection plumbing -------------------------------------

    pub fn list<T: Collection>(&self) -> Result<Vec<T>, StoreError> {
        match self.backend.get(T::KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: T::KEY.to_string(),
                source,
            }),
        }
    }

    pub fn get_by_id<T: Collection>(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.list::<T>()?.into_iter().find(|r| r.id() == id))
    }

    fn filter<T, F>(&self, pred: F) -> Result<Vec<T>, StoreError>
    where
        T: Collection,
        F: Fn(&T) -> bool,
    {
        let mut all = self.list::<T>()?;
        all.retain(|r| pred(r));
        Ok(all)
    }

    fn save<T: Collection>(&mut self, records: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: T::KEY.to_string(),
            source,
        })?;
        self.backend.set(T::KEY, &raw)
    }

    fn append<T: Collection>(&mut self, record: T) -> Result<String, StoreError> {
        let id = record.id().to_string();
        let mut all = self.list::<T>()?;
        all.push(record);
        self.save(&all)?;
        debug!(collection = T::KEY, id = %id, count = all.len(), "record created");
        Ok(id)
    }

    /// Raw stored text for `key`, as written.
    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key)
    }

    /// Replace (`Some`) or delete (`None`) the raw text under `key`.
    pub fn write_raw(&mut self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(v) => self.backend.set(key, v),
            None => self.backend.remove(key),
        }
    }

    /// Apply a whole set of raw replacements in one backend batch.
    pub fn write_raw_all(&mut self, entries: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        self.backend.replace_all(entries)
    }

    // ---- users ------------------------------------------------------------

    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        self.list()
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.get_by_id(id)
    }

    /// First user with this exact email. Uniqueness is up to callers.
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.into_iter().find(|u| u.email == email))
    }

    pub fn users_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
        self.filter(|u: &User| u.role == role)
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<String, StoreError> {
        Ok(self.add_user(new)?.id)
    }

    /// Like `create_user`, but hands back the stored record.
    pub fn add_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        let user = new.into_record(generate_id(), now_timestamp());
        self.append(user.clone())?;
        Ok(user)
    }

    // ---- session pointer ----------------------------------------------------

    pub fn set_current_user(&mut self, user_id: Option<&str>) -> Result<(), StoreError> {
        self.write_raw(CURRENT_USER_KEY, user_id)
    }

    pub fn current_user_id(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(CURRENT_USER_KEY)
    }

    /// The user the session pointer names, or `None` when the pointer is unset
    /// or no longer matches a user. The daemon goes through `Session`; this
    /// reads the persisted pointer directly.
    #[cfg(test)]
    pub fn current_user(&self) -> Result<Option<User>, StoreError> {
        match self.current_user_id()? {
            Some(id) => self.user_by_id(&id),
            None => Ok(None),
        }
    }

    // ---- courses -------------------------------------------------------------

    pub fn courses(&self) -> Result<Vec<Course>, StoreError> {
        self.list()
    }

    pub fn course_by_id(&self, id: &str) -> Result<Option<Course>, StoreError> {
        self.get_by_id(id)
    }

    pub fn courses_by_teacher(&self, teacher_id: &str) -> Result<Vec<Course>, StoreError> {
        self.filter(|c: &Course| c.teacher_id == teacher_id)
    }

    pub fn courses_by_student(&self, student_id: &str) -> Result<Vec<Course>, StoreError> {
        self.filter(|c: &Course| c.students.iter().any(|s| s == student_id))
    }

    pub fn create_course(&mut self, new: NewCourse) -> Result<String, StoreError> {
        self.append(new.into_record(generate_id(), now_timestamp()))
    }

    // ---- marks -----------------------------------------------------------------

    pub fn marks(&self) -> Result<Vec<Marks>, StoreError> {
        self.list()
    }

    pub fn marks_by_id(&self, id: &str) -> Result<Option<Marks>, StoreError> {
        self.get_by_id(id)
    }

    pub fn marks_by_student(&self, student_id: &str) -> Result<Vec<Marks>, StoreError> {
        self.filter(|m: &Marks| m.student_id == student_id)
    }

    pub fn marks_by_course(&self, course_id: &str) -> Result<Vec<Marks>, StoreError> {
        self.filter(|m: &Marks| m.course_id == course_id)
    }

    pub fn create_marks(&mut self, new: NewMarks) -> Result<String, StoreError> {
        self.append(new.into_record(generate_id(), now_timestamp()))
    }

    // ---- attendance --------------------------------------------------------------

    pub fn attendance(&self) -> Result<Vec<Attendance>, StoreError> {
        self.list()
    }

    pub fn attendance_by_id(&self, id: &str) -> Result<Option<Attendance>, StoreError> {
        self.get_by_id(id)
    }

    /// Rows for one student, optionally narrowed to a single course.
    pub fn attendance_by_student(
        &self,
        student_id: &str,
        course_id: Option<&str>,
    ) -> Result<Vec<Attendance>, StoreError> {
        self.filter(|a: &Attendance| {
            a.student_id == student_id && course_id.map_or(true, |c| a.course_id == c)
        })
    }

    pub fn attendance_by_course(&self, course_id: &str) -> Result<Vec<Attendance>, StoreError> {
        self.filter(|a: &Attendance| a.course_id == course_id)
    }

    pub fn create_attendance(&mut self, new: NewAttendance) -> Result<String, StoreError> {
        self.append(new.into_record(generate_id(), now_timestamp()))
    }

    // ---- queries -------------------------------------------------------------------

    pub fn queries(&self) -> Result<Vec<Query>, StoreError> {
        self.list()
    }

    pub fn query_by_id(&self, id: &str) -> Result<Option<Query>, StoreError> {
        self.get_by_id(id)
    }

    pub fn queries_by_student(&self, student_id: &str) -> Result<Vec<Query>, StoreError> {
        self.filter(|q: &Query| q.student_id == student_id)
    }

    pub fn queries_by_teacher(&self, teacher_id: &str) -> Result<Vec<Query>, StoreError> {
        self.filter(|q: &Query| q.teacher_id == teacher_id)
    }

    pub fn create_query(&mut self, new: NewQuery) -> Result<String, StoreError> {
        self.append(new.into_record(generate_id(), now_timestamp()))
    }

    /// Record an answer and mark the query resolved. Unknown ids are ignored
    /// and nothing is written. Answering again overwrites the previous answer.
    pub fn answer_query(&mut self, query_id: &str, answer: &str) -> Result<(), StoreError> {
        let mut queries = self.queries()?;
        let Some(query) = queries.iter_mut().find(|q| q.id == query_id) else {
            debug!(id = %query_id, "answer for unknown query ignored");
            return Ok(());
        };
        query.answer = Some(answer.to_string());
        query.status = QueryStatus::Resolved;
        query.answered_at = Some(now_timestamp());
        self.save(&queries)?;
        info!(id = %query_id, "query resolved");
        Ok(())
    }
}

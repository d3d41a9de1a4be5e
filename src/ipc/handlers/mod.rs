pub mod attendance;
pub mod auth;
pub mod backup;
pub mod core;
pub mod courses;
pub mod marks;
pub mod progress;
pub mod queries;
pub mod users;

//! Record <-> DTO mapping
//!
//! Mappers are pure functions. Outgoing DTOs never carry the password hash,
//! and owners appear only as ids. Nested collections are mapped with the
//! "simple" variants, which stop one level down.
//!
//! Absent values stay absent: callers map an `Option` through these
//! functions with `Option::map`.

mod exercise;
mod goal;
mod user;
mod workout;

pub use exercise::ExerciseMapper;
pub use goal::GoalMapper;
pub use user::UserMapper;
pub use workout::WorkoutMapper;

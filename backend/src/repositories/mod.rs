//! Database repositories
//!
//! Provides data access layer for database operations. Each entity has a
//! repository trait with a Postgres implementation and an in-memory one;
//! services only ever see the `Repositories` bundle.

pub mod exercise;
pub mod goal;
pub mod memory;
pub mod user;
pub mod workout;

use sqlx::PgPool;
use std::sync::Arc;

pub use exercise::{ExerciseRecord, ExerciseRepository, PgExerciseRepository};
pub use goal::{GoalRecord, GoalRepository, PgGoalRepository};
pub use memory::MemoryDatabase;
pub use user::{PgUserRepository, UserRecord, UserRepository};
pub use workout::{PgWorkoutRepository, WorkoutRecord, WorkoutRepository};

/// Repository handles shared by all services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub workouts: Arc<dyn WorkoutRepository>,
    pub exercises: Arc<dyn ExerciseRepository>,
    pub goals: Arc<dyn GoalRepository>,
}

impl Repositories {
    /// Repositories backed by a Postgres pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            workouts: Arc::new(PgWorkoutRepository::new(pool.clone())),
            exercises: Arc::new(PgExerciseRepository::new(pool.clone())),
            goals: Arc::new(PgGoalRepository::new(pool)),
        }
    }

    /// Fresh, empty in-memory repositories
    pub fn in_memory() -> Self {
        MemoryDatabase::new().repositories()
    }
}

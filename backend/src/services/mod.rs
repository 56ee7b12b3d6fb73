//! Business logic services
//!
//! Services validate input, enforce the goal rules and orchestrate the
//! repositories. Each takes the `Repositories` bundle explicitly.

pub mod exercise;
pub mod goal;
pub mod user;
pub mod workout;

pub use exercise::ExerciseService;
pub use goal::GoalService;
pub use user::UserService;
pub use workout::WorkoutService;

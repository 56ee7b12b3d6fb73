use super::{GoalMapper, WorkoutMapper};
use crate::repositories::{GoalRecord, UserRecord, WorkoutRecord};
use fitness_tracker_shared::types::UserDto;

pub struct UserMapper;

impl UserMapper {
    /// Full view: workouts and goals as simple DTOs
    pub fn to_dto(user: &UserRecord, workouts: &[WorkoutRecord], goals: &[GoalRecord]) -> UserDto {
        UserDto {
            workouts: Some(workouts.iter().map(WorkoutMapper::to_simple_dto).collect()),
            goals: Some(goals.iter().map(GoalMapper::to_dto).collect()),
            ..Self::to_simple_dto(user)
        }
    }

    pub fn to_simple_dto(user: &UserRecord) -> UserDto {
        UserDto {
            id: Some(user.id),
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_of_birth: user.date_of_birth,
            gender: user.gender.clone(),
            height: user.height,
            weight: user.weight,
            fitness_level: user.fitness_level.clone(),
            workouts: None,
            goals: None,
        }
    }

    /// The password hash is left empty; only the service sets it
    pub fn to_entity(dto: &UserDto) -> UserRecord {
        UserRecord {
            id: dto.id.unwrap_or_default(),
            username: dto.username.clone().unwrap_or_default(),
            email: dto.email.clone().unwrap_or_default(),
            password_hash: String::new(),
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            date_of_birth: dto.date_of_birth,
            gender: dto.gender.clone(),
            height: dto.height,
            weight: dto.weight,
            fitness_level: dto.fitness_level.clone(),
        }
    }
}

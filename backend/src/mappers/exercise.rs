use crate::repositories::ExerciseRecord;
use fitness_tracker_shared::types::ExerciseDto;

pub struct ExerciseMapper;

impl ExerciseMapper {
    pub fn to_dto(record: &ExerciseRecord) -> ExerciseDto {
        ExerciseDto {
            id: Some(record.id),
            name: Some(record.name.clone()),
            description: record.description.clone(),
            category: record.category.clone(),
            sets: record.sets,
            reps: record.reps,
            weight: record.weight,
            duration: record.duration,
            rest_time: record.rest_time,
            workout_id: Some(record.workout_id),
        }
    }

    /// Missing id or workout id map to 0, meaning "not yet assigned"
    pub fn to_entity(dto: &ExerciseDto) -> ExerciseRecord {
        ExerciseRecord {
            id: dto.id.unwrap_or_default(),
            workout_id: dto.workout_id.unwrap_or_default(),
            name: dto.name.clone().unwrap_or_default(),
            description: dto.description.clone(),
            category: dto.category.clone(),
            sets: dto.sets,
            reps: dto.reps,
            weight: dto.weight,
            duration: dto.duration,
            rest_time: dto.rest_time,
        }
    }
}

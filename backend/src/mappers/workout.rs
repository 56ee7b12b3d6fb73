use super::ExerciseMapper;
use crate::repositories::{ExerciseRecord, WorkoutRecord};
use fitness_tracker_shared::types::WorkoutDto;

pub struct WorkoutMapper;

impl WorkoutMapper {
    /// Full view with the workout's exercises
    pub fn to_dto(record: &WorkoutRecord, exercises: &[ExerciseRecord]) -> WorkoutDto {
        WorkoutDto {
            exercises: Some(exercises.iter().map(ExerciseMapper::to_dto).collect()),
            ..Self::to_simple_dto(record)
        }
    }

    /// View without nested exercises, used inside user views
    pub fn to_simple_dto(record: &WorkoutRecord) -> WorkoutDto {
        WorkoutDto {
            id: Some(record.id),
            name: Some(record.name.clone()),
            description: record.description.clone(),
            start_time: Some(record.start_time),
            end_time: record.end_time,
            duration: record.duration,
            workout_type: record.workout_type.clone(),
            calories_burned: record.calories_burned,
            user_id: record.user_id,
            exercises: None,
        }
    }

    /// Nested exercises are ignored; the service creates them separately
    pub fn to_entity(dto: &WorkoutDto) -> WorkoutRecord {
        WorkoutRecord {
            id: dto.id.unwrap_or_default(),
            user_id: dto.user_id,
            name: dto.name.clone().unwrap_or_default(),
            description: dto.description.clone(),
            start_time: dto.start_time.unwrap_or_default(),
            end_time: dto.end_time,
            duration: dto.duration,
            workout_type: dto.workout_type.clone(),
            calories_burned: dto.calories_burned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn sample() -> WorkoutRecord {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        WorkoutRecord {
            id: 7,
            user_id: Some(3),
            name: "Leg day".to_string(),
            description: Some("Squats and lunges".to_string()),
            start_time: start,
            end_time: Some(start + chrono::Duration::minutes(50)),
            duration: Some(50),
            workout_type: Some("strength".to_string()),
            calories_burned: Some(420),
        }
    }

    fn squat(workout_id: i64) -> ExerciseRecord {
        ExerciseRecord {
            id: 1,
            workout_id,
            name: "Squat".to_string(),
            description: None,
            category: None,
            sets: Some(5),
            reps: Some(5),
            weight: Some(80.0),
            duration: None,
            rest_time: Some(90),
        }
    }

    #[test]
    fn test_round_trip_preserves_scalars() {
        let record = sample();
        let back = WorkoutMapper::to_entity(&WorkoutMapper::to_dto(&record, &[]));
        assert_eq!(back, record);
    }

    #[test]
    fn test_simple_dto_omits_exercises() {
        let dto = WorkoutMapper::to_simple_dto(&sample());
        assert!(dto.exercises.is_none());

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("exercises").is_none());
        assert_eq!(json["type"], "strength");
        assert_eq!(json["userId"], 3);
    }

    #[test]
    fn test_full_dto_nests_exercises() {
        let record = sample();
        let dto = WorkoutMapper::to_dto(&record, &[squat(record.id)]);
        let exercises = dto.exercises.unwrap();

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].workout_id, Some(7));
    }
}

use crate::repositories::GoalRecord;
use fitness_tracker_shared::{types::GoalDto, GoalStatus};

pub struct GoalMapper;

impl GoalMapper {
    pub fn to_dto(record: &GoalRecord) -> GoalDto {
        GoalDto {
            id: Some(record.id),
            title: Some(record.title.clone()),
            description: record.description.clone(),
            target_date: record.target_date,
            start_date: record.start_date,
            status: Some(record.status.clone()),
            category: record.category.clone(),
            target_value: record.target_value,
            unit: record.unit.clone(),
            current_value: record.current_value,
            user_id: record.user_id,
        }
    }

    /// A missing status becomes "active".
    pub fn to_entity(dto: &GoalDto) -> GoalRecord {
        GoalRecord {
            id: dto.id.unwrap_or_default(),
            user_id: dto.user_id,
            title: dto.title.clone().unwrap_or_default(),
            description: dto.description.clone(),
            start_date: dto.start_date,
            target_date: dto.target_date,
            status: dto
                .status
                .clone()
                .unwrap_or_else(|| GoalStatus::Active.as_str().to_string()),
            category: dto.category.clone(),
            target_value: dto.target_value,
            unit: dto.unit.clone(),
            current_value: dto.current_value,
        }
    }
}

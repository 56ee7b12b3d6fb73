//! In-memory repositories
//!
//! All four repositories share one table set behind a `tokio::sync::RwLock`
//! so cascades and foreign keys behave like the Postgres schema: ids come
//! from per-table sequences starting at 1, usernames and emails are unique,
//! and deleting a parent removes its children.

use super::{
    ExerciseRecord, ExerciseRepository, GoalRecord, GoalRepository, Repositories, UserRecord,
    UserRepository, WorkoutRecord, WorkoutRepository,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use fitness_tracker_shared::GoalStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, UserRecord>,
    workouts: BTreeMap<i64, WorkoutRecord>,
    exercises: BTreeMap<i64, ExerciseRecord>,
    goals: BTreeMap<i64, GoalRecord>,
    user_seq: i64,
    workout_seq: i64,
    exercise_seq: i64,
    goal_seq: i64,
}

impl Tables {
    fn insert_user(&mut self, user: &UserRecord) -> Result<UserRecord> {
        if self.users.values().any(|u| u.username == user.username) {
            bail!("duplicate key value violates unique constraint \"users_username_key\"");
        }
        if self.users.values().any(|u| u.email == user.email) {
            bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }

        let id = next_id(&mut self.user_seq);
        let record = UserRecord {
            id,
            ..user.clone()
        };
        self.users.insert(id, record.clone());
        Ok(record)
    }

    fn insert_workout(&mut self, workout: &WorkoutRecord) -> Result<WorkoutRecord> {
        if let Some(user_id) = workout.user_id {
            if !self.users.contains_key(&user_id) {
                bail!("insert on workouts violates foreign key: user {} missing", user_id);
            }
        }

        let id = next_id(&mut self.workout_seq);
        let record = WorkoutRecord {
            id,
            ..workout.clone()
        };
        self.workouts.insert(id, record.clone());
        Ok(record)
    }

    fn insert_exercise(&mut self, exercise: &ExerciseRecord) -> Result<ExerciseRecord> {
        if !self.workouts.contains_key(&exercise.workout_id) {
            bail!(
                "insert on exercises violates foreign key: workout {} missing",
                exercise.workout_id
            );
        }
        check_exercise_amounts(exercise)?;

        let id = next_id(&mut self.exercise_seq);
        let record = ExerciseRecord {
            id,
            ..exercise.clone()
        };
        self.exercises.insert(id, record.clone());
        Ok(record)
    }

    fn insert_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord> {
        if let Some(user_id) = goal.user_id {
            if !self.users.contains_key(&user_id) {
                bail!("insert on goals violates foreign key: user {} missing", user_id);
            }
        }
        check_goal_status(&goal.status)?;

        let id = next_id(&mut self.goal_seq);
        let record = GoalRecord {
            id,
            ..goal.clone()
        };
        self.goals.insert(id, record.clone());
        Ok(record)
    }

    fn remove_user(&mut self, id: i64) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }

        let owned: Vec<i64> = self
            .workouts
            .values()
            .filter(|w| w.user_id == Some(id))
            .map(|w| w.id)
            .collect();
        for workout_id in owned {
            self.remove_workout(workout_id);
        }
        self.goals.retain(|_, g| g.user_id != Some(id));
        true
    }

    fn remove_workout(&mut self, id: i64) -> bool {
        self.exercises.retain(|_, e| e.workout_id != id);
        self.workouts.remove(&id).is_some()
    }
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

/// Mirrors the `CHECK` on `goals.status`
fn check_goal_status(status: &str) -> Result<()> {
    if !GoalStatus::ALL.iter().any(|known| known.as_str() == status) {
        bail!("new row for goals violates check constraint: status '{}'", status);
    }
    Ok(())
}

/// Mirrors the non-negative `CHECK` on exercises
fn check_exercise_amounts(exercise: &ExerciseRecord) -> Result<()> {
    let counts = [exercise.sets, exercise.reps, exercise.duration, exercise.rest_time];
    let negative = counts.iter().flatten().any(|v| *v < 0)
        || exercise.weight.is_some_and(|w| w < 0.0);
    if negative {
        bail!("new row for exercises violates check constraint on amounts");
    }
    Ok(())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Shared in-memory database handle, cheap to clone
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository bundle over this database
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(MemoryUserRepository { db: self.clone() }),
            workouts: Arc::new(MemoryWorkoutRepository { db: self.clone() }),
            exercises: Arc::new(MemoryExerciseRepository { db: self.clone() }),
            goals: Arc::new(MemoryGoalRepository { db: self.clone() }),
        }
    }
}

pub struct MemoryUserRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.contains_key(&id))
    }

    async fn insert(&self, user: &UserRecord) -> Result<UserRecord> {
        let mut tables = self.db.tables.write().await;
        tables.insert_user(user)
    }

    async fn insert_with_goals(
        &self,
        user: &UserRecord,
        goals: &[GoalRecord],
    ) -> Result<(UserRecord, Vec<GoalRecord>)> {
        let mut tables = self.db.tables.write().await;
        let record = tables.insert_user(user)?;

        let mut saved = Vec::with_capacity(goals.len());
        for goal in goals {
            let owned = GoalRecord {
                user_id: Some(record.id),
                ..goal.clone()
            };
            match tables.insert_goal(&owned) {
                Ok(goal) => saved.push(goal),
                Err(e) => {
                    // Roll back; sequences keep their gaps like Postgres
                    tables.remove_user(record.id);
                    return Err(e);
                }
            }
        }

        Ok((record, saved))
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>> {
        let mut tables = self.db.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Ok(None);
        }
        let clash = tables
            .users
            .values()
            .any(|u| u.id != user.id && (u.username == user.username || u.email == user.email));
        if clash {
            bail!("duplicate key value violates unique constraint on users");
        }

        tables.users.insert(user.id, user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.remove_user(id))
    }
}

pub struct MemoryWorkoutRepository {
    db: MemoryDatabase,
}

impl MemoryWorkoutRepository {
    async fn select<F>(&self, filter: F) -> Vec<WorkoutRecord>
    where
        F: Fn(&WorkoutRecord) -> bool,
    {
        let tables = self.db.tables.read().await;
        tables
            .workouts
            .values()
            .filter(|w| filter(*w))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WorkoutRepository for MemoryWorkoutRepository {
    async fn find_all(&self) -> Result<Vec<WorkoutRecord>> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.workouts.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<WorkoutRecord>> {
        Ok(self.select(|w| w.user_id == Some(user_id)).await)
    }

    async fn find_by_user_id_and_type(
        &self,
        user_id: i64,
        workout_type: &str,
    ) -> Result<Vec<WorkoutRecord>> {
        Ok(self
            .select(|w| {
                w.user_id == Some(user_id) && w.workout_type.as_deref() == Some(workout_type)
            })
            .await)
    }

    async fn find_by_user_id_and_start_time_between(
        &self,
        user_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorkoutRecord>> {
        Ok(self
            .select(|w| w.user_id == Some(user_id) && w.start_time >= start && w.start_time <= end)
            .await)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let tables = self.db.tables.read().await;
        Ok(tables.workouts.contains_key(&id))
    }

    async fn insert(&self, workout: &WorkoutRecord) -> Result<WorkoutRecord> {
        let mut tables = self.db.tables.write().await;
        tables.insert_workout(workout)
    }

    async fn insert_with_exercises(
        &self,
        workout: &WorkoutRecord,
        exercises: &[ExerciseRecord],
    ) -> Result<(WorkoutRecord, Vec<ExerciseRecord>)> {
        let mut tables = self.db.tables.write().await;
        let record = tables.insert_workout(workout)?;

        let mut saved = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            let owned = ExerciseRecord {
                workout_id: record.id,
                ..exercise.clone()
            };
            match tables.insert_exercise(&owned) {
                Ok(exercise) => saved.push(exercise),
                Err(e) => {
                    tables.remove_workout(record.id);
                    return Err(e);
                }
            }
        }

        Ok((record, saved))
    }

    async fn update(&self, workout: &WorkoutRecord) -> Result<Option<WorkoutRecord>> {
        let mut tables = self.db.tables.write().await;
        let Some(existing) = tables.workouts.get_mut(&workout.id) else {
            return Ok(None);
        };

        *existing = WorkoutRecord {
            user_id: existing.user_id,
            ..workout.clone()
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.remove_workout(id))
    }
}

pub struct MemoryExerciseRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl ExerciseRepository for MemoryExerciseRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ExerciseRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.exercises.get(&id).cloned())
    }

    async fn find_by_workout_id(&self, workout_id: i64) -> Result<Vec<ExerciseRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .exercises
            .values()
            .filter(|e| e.workout_id == workout_id)
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let tables = self.db.tables.read().await;
        Ok(tables.exercises.contains_key(&id))
    }

    async fn insert(&self, exercise: &ExerciseRecord) -> Result<ExerciseRecord> {
        let mut tables = self.db.tables.write().await;
        tables.insert_exercise(exercise)
    }

    async fn update(&self, exercise: &ExerciseRecord) -> Result<Option<ExerciseRecord>> {
        check_exercise_amounts(exercise)?;
        let mut tables = self.db.tables.write().await;
        let Some(existing) = tables.exercises.get_mut(&exercise.id) else {
            return Ok(None);
        };

        *existing = ExerciseRecord {
            workout_id: existing.workout_id,
            ..exercise.clone()
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.exercises.remove(&id).is_some())
    }
}

pub struct MemoryGoalRepository {
    db: MemoryDatabase,
}

impl MemoryGoalRepository {
    async fn select<F>(&self, filter: F) -> Vec<GoalRecord>
    where
        F: Fn(&GoalRecord) -> bool,
    {
        let tables = self.db.tables.read().await;
        tables
            .goals
            .values()
            .filter(|g| filter(*g))
            .cloned()
            .collect()
    }

    async fn any<F>(&self, filter: F) -> bool
    where
        F: Fn(&GoalRecord) -> bool,
    {
        let tables = self.db.tables.read().await;
        tables.goals.values().any(filter)
    }
}

#[async_trait]
impl GoalRepository for MemoryGoalRepository {
    async fn find_all(&self) -> Result<Vec<GoalRecord>> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<GoalRecord>> {
        let tables = self.db.tables.read().await;
        Ok(tables.goals.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<GoalRecord>> {
        Ok(self.select(|g| g.user_id == Some(user_id)).await)
    }

    async fn find_by_user_id_and_status(
        &self,
        user_id: i64,
        status: &str,
    ) -> Result<Vec<GoalRecord>> {
        Ok(self
            .select(|g| g.user_id == Some(user_id) && eq_ignore_case(&g.status, status))
            .await)
    }

    async fn find_by_user_id_and_category(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<GoalRecord>> {
        Ok(self
            .select(|g| g.user_id == Some(user_id) && g.category.as_deref() == Some(category))
            .await)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let tables = self.db.tables.read().await;
        Ok(tables.goals.contains_key(&id))
    }

    async fn exists_by_user_status_title(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
    ) -> Result<bool> {
        Ok(self
            .any(|g| {
                g.user_id == Some(user_id)
                    && eq_ignore_case(&g.status, status)
                    && eq_ignore_case(&g.title, title)
            })
            .await)
    }

    async fn exists_by_user_status_title_excluding(
        &self,
        user_id: i64,
        status: &str,
        title: &str,
        exclude_id: i64,
    ) -> Result<bool> {
        Ok(self
            .any(|g| {
                g.id != exclude_id
                    && g.user_id == Some(user_id)
                    && eq_ignore_case(&g.status, status)
                    && eq_ignore_case(&g.title, title)
            })
            .await)
    }

    async fn insert(&self, goal: &GoalRecord) -> Result<GoalRecord> {
        let mut tables = self.db.tables.write().await;
        tables.insert_goal(goal)
    }

    async fn update(&self, goal: &GoalRecord) -> Result<Option<GoalRecord>> {
        check_goal_status(&goal.status)?;
        let mut tables = self.db.tables.write().await;
        let Some(existing) = tables.goals.get_mut(&goal.id) else {
            return Ok(None);
        };

        *existing = GoalRecord {
            user_id: existing.user_id,
            ..goal.clone()
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.goals.remove(&id).is_some())
    }
}

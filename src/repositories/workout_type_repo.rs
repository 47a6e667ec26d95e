use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{query_all, CreateWorkoutType, FromSqliteRow, WorkoutType};

#[derive(Clone)]
pub struct WorkoutTypeRepository {
    pool: DbPool,
}

impl WorkoutTypeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The whole catalog in display order.
    pub async fn find_all(&self) -> Result<Vec<WorkoutType>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let types = query_all(&conn, "SELECT * FROM workout_types ORDER BY name", [])?;
            Ok(types)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutType>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_types WHERE id = ?")?;
            let result = stmt.query_row([&id], WorkoutType::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Admin tooling only.
    pub async fn create(&self, input: CreateWorkoutType) -> Result<WorkoutType> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Workout type name is required".to_string()));
        }
        let workout_type = WorkoutType {
            id: Uuid::new_v4().to_string(),
            name,
            logging_mode: input.logging_mode,
            categories: input.categories,
        };
        let wt = workout_type.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_types
                    (id, name, logging_mode, category1_id, category2_id, category3_id, category4_id)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    wt.id,
                    wt.name,
                    wt.logging_mode.as_str(),
                    wt.categories[0],
                    wt.categories[1],
                    wt.categories[2],
                    wt.categories[3]
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(workout_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::{Dimension, LoggingMode};
    use crate::repositories::CategoryRepository;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_name() {
        let repo = WorkoutTypeRepository::new(setup_test_db());
        for name in ["Squat", "Bench Press", "Rowing"] {
            repo.create(CreateWorkoutType {
                name: name.to_string(),
                logging_mode: LoggingMode::Sets,
                categories: Default::default(),
            })
            .await
            .unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Bench Press", "Rowing", "Squat"]);
    }

    #[tokio::test]
    async fn test_deleting_category_clears_reference_only() {
        let pool = setup_test_db();
        let categories = CategoryRepository::new(pool.clone());
        let repo = WorkoutTypeRepository::new(pool);

        let barbell = categories.create(Dimension::ALL[0], "Barbell").await.unwrap();
        let legs = categories.create(Dimension::ALL[1], "Legs").await.unwrap();
        let squat = repo
            .create(CreateWorkoutType {
                name: "Squat".to_string(),
                logging_mode: LoggingMode::Sets,
                categories: [Some(barbell.id.clone()), Some(legs.id.clone()), None, None],
            })
            .await
            .unwrap();

        assert!(categories.delete(&barbell.id).await.unwrap());

        let found = repo.find_by_id(&squat.id).await.unwrap().unwrap();
        assert_eq!(found.categories[0], None);
        assert_eq!(found.categories[1].as_deref(), Some(legs.id.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_category_reference_is_rejected() {
        let repo = WorkoutTypeRepository::new(setup_test_db());
        let result = repo
            .create(CreateWorkoutType {
                name: "Ghost".to_string(),
                logging_mode: LoggingMode::Duration,
                categories: [Some("missing".to_string()), None, None, None],
            })
            .await;
        assert!(result.is_err());
    }
}

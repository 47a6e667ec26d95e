use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: DbPool,
}

fn ensure_workout_type_exists(conn: &Connection, workout_type_id: &str) -> Result<()> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM workout_types WHERE id = ?",
            [workout_type_id],
            |_| Ok(()),
        )
        .optional()?;
    exists.ok_or_else(|| AppError::NotFound("Workout type not found".to_string()))
}

fn is_member(conn: &Connection, user_id: &str, workout_type_id: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM favorites WHERE user_id = ? AND workout_type_id = ?",
        [user_id, workout_type_id],
        |row| row.get(0),
    )?;
    Ok(found)
}

fn insert(conn: &Connection, user_id: &str, workout_type_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO favorites (user_id, workout_type_id, created_at) VALUES (?, ?, ?)",
        rusqlite::params![user_id, workout_type_id, Utc::now()],
    )?;
    Ok(())
}

fn remove(conn: &Connection, user_id: &str, workout_type_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM favorites WHERE user_id = ? AND workout_type_id = ?",
        [user_id, workout_type_id],
    )?;
    Ok(())
}

impl FavoriteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<HashSet<String>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT workout_type_id FROM favorites WHERE user_id = ?")?;
            let ids = stmt
                .query_map([&user_id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<HashSet<_>>>()?;
            Ok(ids)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn is_favorite(&self, user_id: &str, workout_type_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let workout_type_id = workout_type_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            is_member(&conn, &user_id, &workout_type_id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Adding an existing favorite is a no-op.
    pub async fn add(&self, user_id: &str, workout_type_id: &str) -> Result<()> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let workout_type_id = workout_type_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            ensure_workout_type_exists(&conn, &workout_type_id)?;
            insert(&conn, &user_id, &workout_type_id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Removing a type that is not a favorite is a no-op.
    pub async fn remove(&self, user_id: &str, workout_type_id: &str) -> Result<()> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let workout_type_id = workout_type_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            ensure_workout_type_exists(&conn, &workout_type_id)?;
            remove(&conn, &user_id, &workout_type_id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Flip membership and return the new state.
    pub async fn toggle(&self, user_id: &str, workout_type_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let workout_type_id = workout_type_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            ensure_workout_type_exists(&tx, &workout_type_id)?;
            let now_favorite = if is_member(&tx, &user_id, &workout_type_id)? {
                remove(&tx, &user_id, &workout_type_id)?;
                false
            } else {
                insert(&tx, &user_id, &workout_type_id)?;
                true
            };
            tx.commit()?;
            tracing::debug!(
                "User {} favorite {} -> {}",
                user_id,
                workout_type_id,
                now_favorite
            );
            Ok(now_favorite)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::{CreateWorkoutType, LoggingMode, UserRole};
    use crate::repositories::{UserRepository, WorkoutTypeRepository};

    async fn setup() -> (FavoriteRepository, DbPool, String, String) {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        let user = UserRepository::new(pool.clone())
            .create("alice", UserRole::Member, None)
            .await
            .unwrap();
        let wt = WorkoutTypeRepository::new(pool.clone())
            .create(CreateWorkoutType {
                name: "Deadlift".to_string(),
                logging_mode: LoggingMode::Sets,
                categories: Default::default(),
            })
            .await
            .unwrap();
        (FavoriteRepository::new(pool.clone()), pool, user.id, wt.id)
    }

    fn row_count(pool: &DbPool) -> i64 {
        let conn = pool.get().unwrap();
        conn.query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_twice_keeps_one_row() {
        let (repo, pool, user_id, type_id) = setup().await;

        repo.add(&user_id, &type_id).await.unwrap();
        repo.add(&user_id, &type_id).await.unwrap();

        assert!(repo.is_favorite(&user_id, &type_id).await.unwrap());
        assert_eq!(row_count(&pool), 1);
    }

    #[tokio::test]
    async fn test_remove_non_favorite_is_noop() {
        let (repo, pool, user_id, type_id) = setup().await;

        repo.remove(&user_id, &type_id).await.unwrap();
        assert!(!repo.is_favorite(&user_id, &type_id).await.unwrap());
        assert_eq!(row_count(&pool), 0);
    }

    #[tokio::test]
    async fn test_toggle_flips_membership() {
        let (repo, _pool, user_id, type_id) = setup().await;

        assert!(repo.toggle(&user_id, &type_id).await.unwrap());
        assert!(repo.find_by_user(&user_id).await.unwrap().contains(&type_id));
        assert!(!repo.toggle(&user_id, &type_id).await.unwrap());
        assert!(repo.find_by_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_workout_type_is_not_found() {
        let (repo, _pool, user_id, _type_id) = setup().await;

        assert!(matches!(
            repo.add(&user_id, "missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.remove(&user_id, "missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}

use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, User};

/// Login sessions. Tokens are issued by the sign-in service; this side
/// resolves and expires them.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user. Returns the session token.
    pub async fn create(&self, user_id: &str) -> Result<String> {
        let pool = self.pool.clone();
        let token = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![token, user_id, now, expires_at],
            )?;
            Ok(token)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Resolve a token to its user if the session is still valid.
    /// Lazily deletes the session if it has expired.
    pub async fn find_user(&self, token: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let token = token.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let expires_at: Option<chrono::DateTime<Utc>> = conn
                .query_row(
                    "SELECT expires_at FROM sessions WHERE token = ?",
                    [&token],
                    |row| row.get(0),
                )
                .optional()?;

            match expires_at {
                Some(expires_at) if expires_at <= now => {
                    conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some(_) => {
                    let user = conn
                        .query_row(
                            "SELECT u.* FROM users u JOIN sessions s ON s.user_id = u.id WHERE s.token = ?",
                            [&token],
                            User::from_row,
                        )
                        .optional()?;
                    Ok(user)
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        let pool = self.pool.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Batch delete all expired sessions. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(removed)
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
    use crate::models::UserRole;
    use crate::repositories::UserRepository;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_token_resolves_to_user() {
        let pool = setup_test_db();
        let user = UserRepository::new(pool.clone())
            .create("alice", UserRole::Member, None)
            .await
            .unwrap();
        let repo = SessionRepository::new(pool);

        let token = repo.create(&user.id).await.unwrap();
        let found = repo.find_user(&token).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        repo.delete(&token).await.unwrap();
        assert!(repo.find_user(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let pool = setup_test_db();
        let user = UserRepository::new(pool.clone())
            .create("alice", UserRole::Member, None)
            .await
            .unwrap();
        {
            let conn = pool.get().unwrap();
            let past = Utc::now() - chrono::Duration::days(1);
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ('old', ?, ?, ?)",
                rusqlite::params![user.id, past, past],
            )
            .unwrap();
        }
        let repo = SessionRepository::new(pool);

        assert!(repo.find_user("old").await.unwrap().is_none());
        assert_eq!(repo.cleanup_expired().await.unwrap(), 0);
    }
}

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::authz::{ensure_can_access_member, ensure_owner};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{query_all, CommenterType, FromSqliteRow, RecordComment, User};

/// Day-scoped comments left by a member or their trainer.
#[derive(Clone)]
pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        member: &User,
        date: NaiveDate,
        commenter: &User,
        text: &str,
    ) -> Result<RecordComment> {
        ensure_can_access_member(commenter, member)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let comment = RecordComment {
            id: Uuid::new_v4().to_string(),
            user_id: member.id.clone(),
            date,
            commenter_type: CommenterType::from(commenter.role),
            commenter_id: commenter.id.clone(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        let c = comment.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO record_comments
                    (id, user_id, date, commenter_type, commenter_id, text, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    c.id,
                    c.user_id,
                    c.date,
                    c.commenter_type.as_str(),
                    c.commenter_id,
                    c.text,
                    c.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(comment)
    }

    pub async fn find_by_member(
        &self,
        member_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RecordComment>> {
        let pool = self.pool.clone();
        let member_id = member_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let comments: Vec<RecordComment> = query_all(
                &conn,
                "SELECT * FROM record_comments
                 WHERE user_id = ? AND date BETWEEN ? AND ?
                 ORDER BY date, created_at",
                rusqlite::params![member_id, start_date, end_date],
            )?;
            Ok(comments)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Only the author may delete a comment.
    pub async fn delete(&self, id: &str, commenter_id: &str) -> Result<()> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let commenter_id = commenter_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            let comment = conn
                .query_row(
                    "SELECT * FROM record_comments WHERE id = ?",
                    [&id],
                    RecordComment::from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
            ensure_owner(&comment, &commenter_id)?;
            conn.execute("DELETE FROM record_comments WHERE id = ?", [&id])?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

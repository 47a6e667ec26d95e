use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{query_all, TrainingSession};

/// PT appointments. Booking happens in the trainer tools; the tracker only
/// needs to know which days have one.
#[derive(Clone)]
pub struct TrainingSessionRepository {
    pool: DbPool,
}

impl TrainingSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        member_id: &str,
        trainer_id: &str,
        date: NaiveDate,
        start_time: Option<NaiveTime>,
        notes: Option<&str>,
    ) -> Result<TrainingSession> {
        let session = TrainingSession {
            id: Uuid::new_v4().to_string(),
            member_id: member_id.to_string(),
            trainer_id: trainer_id.to_string(),
            date,
            start_time,
            notes: notes.map(str::to_string),
            created_at: Utc::now(),
        };
        let s = session.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO training_sessions
                    (id, member_id, trainer_id, date, start_time, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    s.id,
                    s.member_id,
                    s.trainer_id,
                    s.date,
                    s.start_time,
                    s.notes,
                    s.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(session)
    }

    pub async fn find_by_member(
        &self,
        member_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TrainingSession>> {
        let pool = self.pool.clone();
        let member_id = member_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sessions: Vec<TrainingSession> = query_all(
                &conn,
                "SELECT * FROM training_sessions
                 WHERE member_id = ? AND date BETWEEN ? AND ?
                 ORDER BY date, start_time",
                rusqlite::params![member_id, start_date, end_date],
            )?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Days in the range with at least one appointment.
    pub async fn session_dates(
        &self,
        member_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>> {
        let pool = self.pool.clone();
        let member_id = member_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT DISTINCT date FROM training_sessions
                 WHERE member_id = ? AND date BETWEEN ? AND ?",
            )?;
            let dates = stmt
                .query_map(rusqlite::params![member_id, start_date, end_date], |row| {
                    row.get::<_, NaiveDate>(0)
                })?
                .collect::<rusqlite::Result<BTreeSet<_>>>()?;
            Ok(dates)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

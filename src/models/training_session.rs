use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// A personal-training appointment booked by a trainer for a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub member_id: String,
    pub trainer_id: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for TrainingSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            member_id: row.get("member_id")?,
            trainer_id: row.get("trainer_id")?,
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

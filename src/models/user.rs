use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Member,
    Trainer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Trainer => "trainer",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "trainer" => UserRole::Trainer,
            _ => UserRole::Member,
        }
    }

    pub fn is_trainer(&self) -> bool {
        matches!(self, UserRole::Trainer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    /// Trainer a member is assigned to.
    pub trainer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let role_str: String = row.get("role")?;
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            role: UserRole::parse(&role_str),
            trainer_id: row.get("trainer_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

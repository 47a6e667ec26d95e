use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::user::UserRole;
use super::FromSqliteRow;
use crate::authz::Owned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommenterType {
    Member,
    Trainer,
}

impl CommenterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommenterType::Member => "member",
            CommenterType::Trainer => "trainer",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "trainer" => CommenterType::Trainer,
            _ => CommenterType::Member,
        }
    }
}

impl From<UserRole> for CommenterType {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Member => CommenterType::Member,
            UserRole::Trainer => CommenterType::Trainer,
        }
    }
}

/// Comment attached to a member's day rather than to a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordComment {
    pub id: String,
    /// Member whose day is being commented on.
    pub user_id: String,
    pub date: NaiveDate,
    pub commenter_type: CommenterType,
    pub commenter_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Owned for RecordComment {
    fn owner_id(&self) -> &str {
        &self.commenter_id
    }

    fn kind() -> &'static str {
        "Comment"
    }
}

impl FromSqliteRow for RecordComment {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let commenter_type: String = row.get("commenter_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            commenter_type: CommenterType::parse(&commenter_type),
            commenter_id: row.get("commenter_id")?,
            text: row.get("text")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    /// Defaults to the commenter's own day.
    #[serde(default)]
    pub member_id: Option<String>,
    pub date: String,
    pub text: String,
}

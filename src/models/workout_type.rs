use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::category::Dimension;
use super::FromSqliteRow;

/// Whether records of a workout type capture a duration or a list of sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    Duration,
    #[default]
    Sets,
}

impl LoggingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingMode::Duration => "duration",
            LoggingMode::Sets => "sets",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "duration" => LoggingMode::Duration,
            _ => LoggingMode::Sets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutType {
    pub id: String,
    pub name: String,
    pub logging_mode: LoggingMode,
    /// Category id per dimension, index 0 is dimension 1.
    pub categories: [Option<String>; Dimension::COUNT],
}

impl WorkoutType {
    pub fn category(&self, dimension: Dimension) -> Option<&str> {
        self.categories[dimension.index()].as_deref()
    }
}

impl FromSqliteRow for WorkoutType {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let mode: String = row.get("logging_mode")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            logging_mode: LoggingMode::parse(&mode),
            categories: [
                row.get("category1_id")?,
                row.get("category2_id")?,
                row.get("category3_id")?,
                row.get("category4_id")?,
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutType {
    pub name: String,
    #[serde(default)]
    pub logging_mode: LoggingMode,
    #[serde(default)]
    pub categories: [Option<String>; Dimension::COUNT],
}

/// Catalog entry annotated for the picker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutTypeEntry {
    #[serde(flatten)]
    pub workout_type: WorkoutType,
    pub is_favorite: bool,
}

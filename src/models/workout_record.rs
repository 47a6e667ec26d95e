use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::comment::RecordComment;
use super::workout_type::LoggingMode;
use super::FromSqliteRow;
use crate::authz::Owned;
use crate::error::{AppError, Result};

/// Minutes stored for a duration-mode record created without an explicit duration.
pub const DEFAULT_DURATION_MINUTES: i32 = 30;

/// Parse a `YYYY-MM-DD` civil date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// A set as submitted by a client. Blank weight or reps are allowed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetInput {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default)]
    pub is_completed: bool,
}

/// A persisted set. Blank inputs have already been stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub set_number: i32,
    pub weight: f64,
    pub reps: i32,
    pub is_completed: bool,
}

impl WorkoutSet {
    /// The set created when a sets-mode record is submitted without any detail.
    pub fn empty() -> Self {
        Self {
            set_number: 1,
            weight: 0.0,
            reps: 0,
            is_completed: false,
        }
    }
}

impl FromSqliteRow for WorkoutSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            set_number: row.get("set_number")?,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
            is_completed: row.get("is_completed")?,
        })
    }
}

/// Number sets from 1 in submission order and replace blanks with zero.
///
/// An empty submission becomes a single empty set rather than an error.
pub fn normalize_sets(inputs: &[SetInput]) -> Result<Vec<WorkoutSet>> {
    if inputs.is_empty() {
        return Ok(vec![WorkoutSet::empty()]);
    }

    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let weight = input.weight.unwrap_or(0.0);
            let reps = input.reps.unwrap_or(0);
            if !weight.is_finite() || weight < 0.0 {
                return Err(AppError::Validation(format!(
                    "Set {} has an invalid weight",
                    i + 1
                )));
            }
            if reps < 0 {
                return Err(AppError::Validation(format!(
                    "Set {} has negative reps",
                    i + 1
                )));
            }
            Ok(WorkoutSet {
                set_number: i as i32 + 1,
                weight,
                reps,
                is_completed: input.is_completed,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    /// `None` marks a free-text record.
    pub workout_type_id: Option<String>,
    pub text_content: Option<String>,
    pub duration_minutes: Option<i32>,
    /// Completion flag for duration-mode records; sets carry their own.
    pub is_completed: bool,
    pub sets: Vec<WorkoutSet>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutRecord {
    pub fn is_free_text(&self) -> bool {
        self.workout_type_id.is_none()
    }
}

impl Owned for WorkoutRecord {
    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn kind() -> &'static str {
        "Workout record"
    }
}

impl FromSqliteRow for WorkoutRecord {
    /// Sets are loaded separately and start out empty.
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            workout_type_id: row.get("workout_type_id")?,
            text_content: row.get("text_content")?,
            duration_minutes: row.get("duration_minutes")?,
            is_completed: row.get("is_completed")?,
            sets: Vec::new(),
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkoutRecord {
    pub date: String,
    #[serde(default)]
    pub workout_type_id: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub sets: Option<Vec<SetInput>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkoutRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub sets: Option<Vec<SetInput>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Record joined with its workout type and the comments left on its day.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutRecordWithType {
    #[serde(flatten)]
    pub record: WorkoutRecord,
    pub workout_type_name: Option<String>,
    pub logging_mode: Option<LoggingMode>,
    pub comments: Vec<RecordComment>,
}

/// What the calendar needs to know about one record, without its sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub date: NaiveDate,
    pub is_free_text: bool,
    pub is_duration: bool,
    pub is_completed: bool,
    pub set_count: i64,
    pub completed_set_count: i64,
}

impl FromSqliteRow for RecordSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get("date")?,
            is_free_text: row.get("is_free_text")?,
            is_duration: row.get("is_duration")?,
            is_completed: row.get("is_completed")?,
            set_count: row.get("set_count")?,
            completed_set_count: row.get("completed_set_count")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl RecordQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if start_date > end_date {
            return Err(AppError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
            limit: None,
            offset: None,
        })
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
            limit: None,
            offset: None,
        }
    }
}

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::authz::ensure_owner;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    normalize_sets, parse_date, query_all, CreateWorkoutRecord, FromSqliteRow, LoggingMode,
    RecordComment, RecordQuery, RecordSummary, UpdateWorkoutRecord, WorkoutRecord,
    WorkoutRecordWithType, WorkoutSet, DEFAULT_DURATION_MINUTES,
};

#[derive(Clone)]
pub struct WorkoutRecordRepository {
    pool: DbPool,
}

fn find_logging_mode(conn: &Connection, workout_type_id: &str) -> Result<LoggingMode> {
    let mode: Option<String> = conn
        .query_row(
            "SELECT logging_mode FROM workout_types WHERE id = ?",
            [workout_type_id],
            |row| row.get(0),
        )
        .optional()?;
    mode.map(|m| LoggingMode::parse(&m))
        .ok_or_else(|| AppError::NotFound("Workout type not found".to_string()))
}

fn load_sets(conn: &Connection, record_id: &str) -> Result<Vec<WorkoutSet>> {
    let sets = query_all(
        conn,
        "SELECT * FROM workout_sets WHERE record_id = ? ORDER BY set_number",
        [record_id],
    )?;
    Ok(sets)
}

fn load_record(conn: &Connection, id: &str) -> Result<Option<WorkoutRecord>> {
    let record = conn
        .query_row(
            "SELECT * FROM workout_records WHERE id = ?",
            [id],
            WorkoutRecord::from_row,
        )
        .optional()?;

    match record {
        Some(mut record) => {
            record.sets = load_sets(conn, &record.id)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

fn insert_sets(conn: &Connection, record_id: &str, sets: &[WorkoutSet]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO workout_sets (record_id, set_number, weight, reps, is_completed)
         VALUES (?, ?, ?, ?, ?)",
    )?;
    for set in sets {
        stmt.execute(rusqlite::params![
            record_id,
            set.set_number,
            set.weight,
            set.reps,
            set.is_completed
        ])?;
    }
    Ok(())
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Validate a submission against the workout type's logging mode and fill in defaults.
fn build_record(
    user_id: &str,
    date: NaiveDate,
    mode: Option<LoggingMode>,
    input: CreateWorkoutRecord,
) -> Result<WorkoutRecord> {
    let has_sets = input.sets.as_ref().is_some_and(|s| !s.is_empty());
    let text_content = non_empty(input.text_content);

    let (text_content, duration_minutes, is_completed, sets) = match mode {
        None => {
            if has_sets || input.duration_minutes.is_some() {
                return Err(AppError::Validation(
                    "Free-text records cannot carry sets or a duration".to_string(),
                ));
            }
            if input.is_completed.is_some() {
                return Err(AppError::Validation(
                    "Free-text records have no completion state".to_string(),
                ));
            }
            let text = text_content.ok_or_else(|| {
                AppError::Validation("Free-text records need text content".to_string())
            })?;
            (Some(text), None, false, Vec::new())
        }
        Some(mode) => {
            if text_content.is_some() {
                return Err(AppError::Validation(
                    "Text content is only allowed on free-text records".to_string(),
                ));
            }
            match mode {
                LoggingMode::Duration => {
                    if has_sets {
                        return Err(AppError::Validation(
                            "Sets supplied for a duration workout".to_string(),
                        ));
                    }
                    let minutes = input.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
                    if minutes < 0 {
                        return Err(AppError::Validation(
                            "Duration must not be negative".to_string(),
                        ));
                    }
                    (
                        None,
                        Some(minutes),
                        input.is_completed.unwrap_or(false),
                        Vec::new(),
                    )
                }
                LoggingMode::Sets => {
                    if input.duration_minutes.is_some() {
                        return Err(AppError::Validation(
                            "Duration supplied for a sets workout".to_string(),
                        ));
                    }
                    let mut sets = normalize_sets(input.sets.as_deref().unwrap_or_default())?;
                    // Same rule as an update: the record flag marks every set
                    if let Some(done) = input.is_completed {
                        for set in &mut sets {
                            set.is_completed = done;
                        }
                    }
                    (None, None, false, sets)
                }
            }
        }
    };

    Ok(WorkoutRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        date,
        workout_type_id: input.workout_type_id,
        text_content,
        duration_minutes,
        is_completed,
        sets,
        notes: non_empty(input.notes),
        created_at: Utc::now(),
    })
}

/// Apply a partial update in place. Returns whether the set list changed.
fn apply_patch(
    record: &mut WorkoutRecord,
    mode: Option<LoggingMode>,
    date: Option<NaiveDate>,
    patch: UpdateWorkoutRecord,
) -> Result<bool> {
    if let Some(date) = date {
        record.date = date;
    }
    if let Some(notes) = patch.notes {
        record.notes = non_empty(Some(notes));
    }

    if patch.text_content.is_some() {
        if mode.is_some() {
            return Err(AppError::Validation(
                "Text content is only allowed on free-text records".to_string(),
            ));
        }
        record.text_content = Some(non_empty(patch.text_content).ok_or_else(|| {
            AppError::Validation("Free-text records need text content".to_string())
        })?);
    }

    if let Some(minutes) = patch.duration_minutes {
        if mode != Some(LoggingMode::Duration) {
            return Err(AppError::Validation(
                "Duration supplied for a record without duration logging".to_string(),
            ));
        }
        if minutes < 0 {
            return Err(AppError::Validation(
                "Duration must not be negative".to_string(),
            ));
        }
        record.duration_minutes = Some(minutes);
    }

    let mut sets_changed = false;
    if let Some(inputs) = patch.sets {
        if mode != Some(LoggingMode::Sets) {
            if !inputs.is_empty() {
                return Err(AppError::Validation(
                    "Sets supplied for a record without set logging".to_string(),
                ));
            }
        } else {
            record.sets = normalize_sets(&inputs)?;
            sets_changed = true;
        }
    }

    if let Some(done) = patch.is_completed {
        match mode {
            Some(LoggingMode::Duration) => record.is_completed = done,
            // Marking a sets record done or undone applies to every set
            Some(LoggingMode::Sets) => {
                for set in &mut record.sets {
                    set.is_completed = done;
                }
                sets_changed = true;
            }
            None => {
                return Err(AppError::Validation(
                    "Free-text records have no completion state".to_string(),
                ))
            }
        }
    }

    Ok(sets_changed)
}

impl WorkoutRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, input: CreateWorkoutRecord) -> Result<WorkoutRecord> {
        let date = parse_date(&input.date)?;
        let pool = self.pool.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<WorkoutRecord> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let mode = input
                .workout_type_id
                .as_deref()
                .map(|id| find_logging_mode(&tx, id))
                .transpose()?;
            let record = build_record(&user_id, date, mode, input)?;

            tx.execute(
                "INSERT INTO workout_records
                    (id, user_id, date, workout_type_id, text_content, duration_minutes,
                     is_completed, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    record.id,
                    record.user_id,
                    record.date,
                    record.workout_type_id,
                    record.text_content,
                    record.duration_minutes,
                    record.is_completed,
                    record.notes,
                    record.created_at
                ],
            )?;
            insert_sets(&tx, &record.id, &record.sets)?;
            tx.commit()?;

            tracing::debug!(
                "Created workout record {} for user {} on {} ({} sets)",
                record.id,
                record.user_id,
                record.date,
                record.sets.len()
            );
            Ok(record)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutRecord>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            load_record(&conn, &id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        patch: UpdateWorkoutRecord,
    ) -> Result<WorkoutRecord> {
        let date = patch.date.as_deref().map(parse_date).transpose()?;
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<WorkoutRecord> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let mut record = load_record(&tx, &id)?
                .ok_or_else(|| AppError::NotFound("Workout record not found".to_string()))?;
            ensure_owner(&record, &user_id)?;

            let mode = record
                .workout_type_id
                .as_deref()
                .map(|type_id| find_logging_mode(&tx, type_id))
                .transpose()?;
            let sets_changed = apply_patch(&mut record, mode, date, patch)?;

            tx.execute(
                "UPDATE workout_records
                 SET date = ?, text_content = ?, duration_minutes = ?, is_completed = ?, notes = ?
                 WHERE id = ?",
                rusqlite::params![
                    record.date,
                    record.text_content,
                    record.duration_minutes,
                    record.is_completed,
                    record.notes,
                    record.id
                ],
            )?;
            if sets_changed {
                tx.execute("DELETE FROM workout_sets WHERE record_id = ?", [&record.id])?;
                insert_sets(&tx, &record.id, &record.sets)?;
            }
            tx.commit()?;

            tracing::debug!("Updated workout record {}", record.id);
            Ok(record)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<()> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let record = load_record(&tx, &id)?
                .ok_or_else(|| AppError::NotFound("Workout record not found".to_string()))?;
            ensure_owner(&record, &user_id)?;

            tx.execute("DELETE FROM workout_sets WHERE record_id = ?", [&id])?;
            tx.execute("DELETE FROM workout_records WHERE id = ?", [&id])?;
            tx.commit()?;

            tracing::debug!("Deleted workout record {}", id);
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Records in an inclusive date range, newest day first and in logging
    /// order within a day, each with its sets and the day's comments.
    pub async fn list(
        &self,
        user_id: &str,
        query: RecordQuery,
    ) -> Result<Vec<WorkoutRecordWithType>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT r.*, wt.name AS workout_type_name, wt.logging_mode AS type_logging_mode
                 FROM workout_records r
                 LEFT JOIN workout_types wt ON r.workout_type_id = wt.id
                 WHERE r.user_id = ? AND r.date BETWEEN ? AND ?
                 ORDER BY r.date DESC, r.created_at ASC
                 LIMIT ? OFFSET ?",
            )?;
            let rows = stmt
                .query_map(
                    rusqlite::params![
                        user_id,
                        query.start_date,
                        query.end_date,
                        query.limit.unwrap_or(-1),
                        query.offset.unwrap_or(0)
                    ],
                    |row| {
                        let record = WorkoutRecord::from_row(row)?;
                        let name: Option<String> = row.get("workout_type_name")?;
                        let mode: Option<String> = row.get("type_logging_mode")?;
                        Ok((record, name, mode.map(|m| LoggingMode::parse(&m))))
                    },
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut stmt = conn.prepare(
                "SELECT s.* FROM workout_sets s
                 JOIN workout_records r ON s.record_id = r.id
                 WHERE r.user_id = ? AND r.date BETWEEN ? AND ?
                 ORDER BY s.record_id, s.set_number",
            )?;
            let mut sets_by_record: HashMap<String, Vec<WorkoutSet>> = HashMap::new();
            let set_rows = stmt.query_map(
                rusqlite::params![user_id, query.start_date, query.end_date],
                |row| {
                    Ok((row.get::<_, String>("record_id")?, WorkoutSet::from_row(row)?))
                },
            )?;
            for set_row in set_rows {
                let (record_id, set) = set_row?;
                sets_by_record.entry(record_id).or_default().push(set);
            }

            let mut stmt = conn.prepare(
                "SELECT * FROM record_comments
                 WHERE user_id = ? AND date BETWEEN ? AND ?
                 ORDER BY created_at",
            )?;
            let mut comments_by_date: HashMap<NaiveDate, Vec<RecordComment>> = HashMap::new();
            let comment_rows = stmt.query_map(
                rusqlite::params![user_id, query.start_date, query.end_date],
                RecordComment::from_row,
            )?;
            for comment in comment_rows {
                let comment = comment?;
                comments_by_date.entry(comment.date).or_default().push(comment);
            }

            let records = rows
                .into_iter()
                .map(|(mut record, workout_type_name, logging_mode)| {
                    record.sets = sets_by_record.remove(&record.id).unwrap_or_default();
                    let comments = comments_by_date
                        .get(&record.date)
                        .cloned()
                        .unwrap_or_default();
                    WorkoutRecordWithType {
                        record,
                        workout_type_name,
                        logging_mode,
                        comments,
                    }
                })
                .collect();
            Ok(records)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Record count per day. No set detail is read.
    pub async fn count_by_date(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, i64>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT date, COUNT(*) FROM workout_records
                 WHERE user_id = ? AND date BETWEEN ? AND ?
                 GROUP BY date",
            )?;
            let counts = stmt
                .query_map(rusqlite::params![user_id, start_date, end_date], |row| {
                    Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
            Ok(counts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Per-record completion inputs with set counts aggregated in SQL.
    pub async fn completion_summaries(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RecordSummary>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT r.date,
                        r.workout_type_id IS NULL AS is_free_text,
                        r.duration_minutes IS NOT NULL AS is_duration,
                        r.is_completed,
                        COUNT(s.set_number) AS set_count,
                        COALESCE(SUM(s.is_completed), 0) AS completed_set_count
                 FROM workout_records r
                 LEFT JOIN workout_sets s ON s.record_id = r.id
                 WHERE r.user_id = ? AND r.date BETWEEN ? AND ?
                 GROUP BY r.id
                 ORDER BY r.date",
            )?;
            let summaries = stmt
                .query_map(
                    rusqlite::params![user_id, start_date, end_date],
                    RecordSummary::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(summaries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

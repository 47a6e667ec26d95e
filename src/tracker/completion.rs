//! Day-level completion derived from records and their sets.
//!
//! Nothing stores the result; it is recomputed from record data on every read.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{RecordSummary, WorkoutRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionState {
    /// Nothing logged.
    #[default]
    None,
    Incomplete,
    Complete,
}

impl CompletionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionState::None => "none",
            CompletionState::Incomplete => "incomplete",
            CompletionState::Complete => "complete",
        }
    }
}

/// How a single record counts toward its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    FreeText,
    Done,
    Pending,
}

/// Anything that can report its own completion: full records or SQL summaries.
pub trait Completable {
    fn date(&self) -> NaiveDate;
    fn status(&self) -> RecordStatus;
}

impl Completable for WorkoutRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn status(&self) -> RecordStatus {
        if self.is_free_text() {
            RecordStatus::FreeText
        } else if self.duration_minutes.is_some() {
            if self.is_completed {
                RecordStatus::Done
            } else {
                RecordStatus::Pending
            }
        } else if !self.sets.is_empty() && self.sets.iter().all(|s| s.is_completed) {
            RecordStatus::Done
        } else {
            RecordStatus::Pending
        }
    }
}

impl Completable for RecordSummary {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn status(&self) -> RecordStatus {
        if self.is_free_text {
            RecordStatus::FreeText
        } else if self.is_duration {
            if self.is_completed {
                RecordStatus::Done
            } else {
                RecordStatus::Pending
            }
        } else if self.set_count > 0 && self.completed_set_count == self.set_count {
            RecordStatus::Done
        } else {
            RecordStatus::Pending
        }
    }
}

/// Classify one day's records.
///
/// Free-text records do not take part in the check, but a day holding only
/// free-text records still counts as `Incomplete`.
pub fn aggregate_day<T: Completable>(records: &[T]) -> CompletionState {
    if records.is_empty() {
        return CompletionState::None;
    }

    let mut structured = records
        .iter()
        .map(Completable::status)
        .filter(|status| *status != RecordStatus::FreeText)
        .peekable();

    if structured.peek().is_none() {
        return CompletionState::Incomplete;
    }

    if structured.all(|status| status == RecordStatus::Done) {
        CompletionState::Complete
    } else {
        CompletionState::Incomplete
    }
}

/// Completion per date for every date that has at least one record.
pub fn aggregate_by_date<T: Completable + Clone>(records: &[T]) -> BTreeMap<NaiveDate, CompletionState> {
    let mut by_date: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date()).or_default().push(record.clone());
    }

    by_date
        .into_iter()
        .map(|(date, day)| (date, aggregate_day(&day)))
        .collect()
}

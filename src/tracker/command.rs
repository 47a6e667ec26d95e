//! Typed commands issued by tracker UIs and the dispatcher that routes them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::CalendarView;
use super::filter::FilterState;
use crate::error::Result;
use crate::models::{
    parse_date, CreateWorkoutRecord, Dimension, UpdateWorkoutRecord, WorkoutRecord,
};
use crate::repositories::{FavoriteRepository, WorkoutRecordRepository};

/// Per-client tracker state. The UI layer owns it and hands it back with
/// every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerContext {
    #[serde(default)]
    pub filter: FilterState,
    pub calendar: CalendarView,
}

impl TrackerContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            filter: FilterState::default(),
            calendar: CalendarView::new(today),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddRecord {
        record: CreateWorkoutRecord,
    },
    UpdateRecord {
        id: String,
        patch: UpdateWorkoutRecord,
    },
    DeleteRecord {
        id: String,
    },
    ToggleFavorite {
        workout_type_id: String,
    },
    SelectFilter {
        dimension: Dimension,
        category_id: String,
    },
    ClearFilters,
    Search {
        text: String,
    },
    ToggleFavoritesOnly,
    PrevMonth,
    NextMonth,
    SelectDate {
        date: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandOutcome {
    RecordSaved { record: WorkoutRecord },
    RecordDeleted { id: String },
    FavoriteToggled { workout_type_id: String, is_favorite: bool },
    ContextChanged,
}

/// Routes commands either to a pure context transition or to the stores.
#[derive(Clone)]
pub struct Dispatcher {
    pub records: WorkoutRecordRepository,
    pub favorites: FavoriteRepository,
}

impl Dispatcher {
    pub fn new(records: WorkoutRecordRepository, favorites: FavoriteRepository) -> Self {
        Self { records, favorites }
    }

    pub async fn dispatch(
        &self,
        ctx: &mut TrackerContext,
        user_id: &str,
        command: Command,
    ) -> Result<CommandOutcome> {
        match command {
            Command::AddRecord { record } => {
                let record = self.records.create(user_id, record).await?;
                focus_date(ctx, record.date);
                Ok(CommandOutcome::RecordSaved { record })
            }
            Command::UpdateRecord { id, patch } => {
                let record = self.records.update(&id, user_id, patch).await?;
                focus_date(ctx, record.date);
                Ok(CommandOutcome::RecordSaved { record })
            }
            Command::DeleteRecord { id } => {
                self.records.delete(&id, user_id).await?;
                Ok(CommandOutcome::RecordDeleted { id })
            }
            Command::ToggleFavorite { workout_type_id } => {
                let is_favorite = self.favorites.toggle(user_id, &workout_type_id).await?;
                Ok(CommandOutcome::FavoriteToggled {
                    workout_type_id,
                    is_favorite,
                })
            }
            command => {
                apply(ctx, command)?;
                Ok(CommandOutcome::ContextChanged)
            }
        }
    }
}

fn focus_date(ctx: &mut TrackerContext, date: NaiveDate) {
    ctx.calendar.select_date(date);
}

/// Pure state transitions. Persistence commands leave the context untouched.
pub fn apply(ctx: &mut TrackerContext, command: Command) -> Result<()> {
    match command {
        Command::SelectFilter {
            dimension,
            category_id,
        } => ctx.filter.select_category(dimension, &category_id),
        Command::ClearFilters => ctx.filter.clear(),
        Command::Search { text } => ctx.filter.set_search(&text),
        Command::ToggleFavoritesOnly => ctx.filter.toggle_favorites_only(),
        Command::PrevMonth => ctx.calendar.prev_month(),
        Command::NextMonth => ctx.calendar.next_month(),
        Command::SelectDate { date } => ctx.calendar.select_date(parse_date(&date)?),
        Command::AddRecord { .. }
        | Command::UpdateRecord { .. }
        | Command::DeleteRecord { .. }
        | Command::ToggleFavorite { .. } => {}
    }
    Ok(())
}

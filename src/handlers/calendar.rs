use std::collections::BTreeMap;

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{parse_date, RecordQuery};
use crate::repositories::{TrainingSessionRepository, WorkoutRecordRepository};
use crate::tracker::calendar::{grid_bounds, weeks, GridAnnotations};
use crate::tracker::{aggregate_by_date, build_month_grid, CalendarCell, TrailingPolicy, YearMonth};

#[derive(Clone)]
pub struct CalendarState {
    pub record_repo: WorkoutRecordRepository,
    pub training_session_repo: TrainingSessionRepository,
}

#[derive(Template)]
#[template(path = "calendar.html")]
struct CalendarTemplate {
    user: AuthUser,
    month: YearMonth,
    prev: YearMonth,
    next: YearMonth,
    weekdays: [&'static str; 7],
    weeks: Vec<Vec<CalendarCell>>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
    selected: Option<String>,
}

impl MonthQuery {
    fn year_month(&self, today: NaiveDate) -> Result<YearMonth> {
        match (self.year, self.month) {
            (None, None) => Ok(YearMonth::containing(today)),
            (Some(year), Some(month)) => YearMonth::new(year, month)
                .ok_or_else(|| AppError::Validation(format!("Invalid month {}-{}", year, month))),
            _ => Err(AppError::BadRequest(
                "year and month must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn month_cells(
    state: &CalendarState,
    user_id: &str,
    month: YearMonth,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Result<Vec<CalendarCell>> {
    let policy = TrailingPolicy::default();
    let (start, end) = grid_bounds(month, policy);

    let summaries = state
        .record_repo
        .completion_summaries(user_id, start, end)
        .await?;
    let completion = aggregate_by_date(&summaries);
    let sessions = state
        .training_session_repo
        .session_dates(user_id, start, end)
        .await?;

    let annotations = GridAnnotations {
        today: Some(today),
        selected,
        completion: Some(&completion),
        sessions: Some(&sessions),
    };
    Ok(build_month_grid(month, policy, &annotations))
}

pub async fn grid(
    State(state): State<CalendarState>,
    auth_user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CalendarResponse>> {
    let today = today();
    let month = query.year_month(today)?;
    let selected = query.selected.as_deref().map(parse_date).transpose()?;

    let cells = month_cells(&state, &auth_user.id, month, today, selected).await?;
    Ok(Json(CalendarResponse {
        year: month.year,
        month: month.month,
        cells,
    }))
}

/// Record count per day, for cheap month overviews.
pub async fn summary(
    State(state): State<CalendarState>,
    auth_user: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<BTreeMap<NaiveDate, i64>>> {
    let range = RecordQuery::new(parse_date(&query.start_date)?, parse_date(&query.end_date)?)?;
    let counts = state
        .record_repo
        .count_by_date(&auth_user.id, range.start_date, range.end_date)
        .await?;
    Ok(Json(counts))
}

pub async fn page(
    State(state): State<CalendarState>,
    auth_user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<Response> {
    let today = today();
    let month = query.year_month(today)?;
    let selected = query.selected.as_deref().map(parse_date).transpose()?;
    let cells = month_cells(&state, &auth_user.id, month, today, selected).await?;

    let template = CalendarTemplate {
        user: auth_user,
        month,
        prev: month.prev(),
        next: month.next(),
        weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        weeks: weeks(&cells),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(year: Option<i32>, month: Option<u32>) -> MonthQuery {
        MonthQuery {
            year,
            month,
            selected: None,
        }
    }

    #[test]
    fn test_month_query_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            query(None, None).year_month(today).unwrap(),
            YearMonth::new(2026, 10).unwrap()
        );
        assert_eq!(
            query(Some(2026), Some(2)).year_month(today).unwrap(),
            YearMonth::new(2026, 2).unwrap()
        );
        assert!(matches!(
            query(Some(2026), None).year_month(today),
            Err(AppError::BadRequest(_))
        ));
        assert!(query(Some(2026), Some(13)).year_month(today).is_err());
    }
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    parse_date, CreateWorkoutRecord, RecordQuery, UpdateWorkoutRecord, WorkoutRecord,
    WorkoutRecordWithType,
};
use crate::repositories::WorkoutRecordRepository;

#[derive(Clone)]
pub struct RecordsState {
    pub record_repo: WorkoutRecordRepository,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    start_date: String,
    end_date: String,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ListQuery {
    fn into_record_query(self) -> Result<RecordQuery> {
        let mut query = RecordQuery::new(parse_date(&self.start_date)?, parse_date(&self.end_date)?)?;
        if self.limit.is_some_and(|l| l < 0) || self.offset.is_some_and(|o| o < 0) {
            return Err(AppError::Validation(
                "limit and offset must not be negative".to_string(),
            ));
        }
        query.limit = self.limit;
        query.offset = self.offset;
        Ok(query)
    }
}

pub async fn list(
    State(state): State<RecordsState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutRecordWithType>>> {
    let query = query.into_record_query()?;
    let records = state.record_repo.list(&auth_user.id, query).await?;
    Ok(Json(records))
}

pub async fn create(
    State(state): State<RecordsState>,
    auth_user: AuthUser,
    WithRejection(Json(input), _): WithRejection<Json<CreateWorkoutRecord>, AppError>,
) -> Result<(StatusCode, Json<WorkoutRecord>)> {
    let record = state.record_repo.create(&auth_user.id, input).await?;
    tracing::debug!("Created record {} on {}", record.id, record.date);
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<RecordsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<UpdateWorkoutRecord>, AppError>,
) -> Result<Json<WorkoutRecord>> {
    let record = state.record_repo.update(&id, &auth_user.id, patch).await?;
    Ok(Json(record))
}

pub async fn delete(
    State(state): State<RecordsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.record_repo.delete(&id, &auth_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

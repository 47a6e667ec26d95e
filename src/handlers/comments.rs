use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::authz::ensure_can_access_member;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{parse_date, CreateComment, RecordComment, RecordQuery, User};
use crate::repositories::{CommentRepository, UserRepository};

#[derive(Clone)]
pub struct CommentsState {
    pub comment_repo: CommentRepository,
    pub user_repo: UserRepository,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    date: String,
    member_id: Option<String>,
}

async fn load_user(user_repo: &UserRepository, id: &str) -> Result<User> {
    user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// The caller and the member whose day is addressed, defaulting to the
/// caller's own day.
async fn viewer_and_member(
    state: &CommentsState,
    auth_user: &AuthUser,
    member_id: Option<&str>,
) -> Result<(User, User)> {
    let viewer = load_user(&state.user_repo, &auth_user.id).await?;
    let member = match member_id {
        Some(id) if id != viewer.id => load_user(&state.user_repo, id).await?,
        _ => viewer.clone(),
    };
    Ok((viewer, member))
}

pub async fn list(
    State(state): State<CommentsState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RecordComment>>> {
    let date = parse_date(&query.date)?;
    let (viewer, member) = viewer_and_member(&state, &auth_user, query.member_id.as_deref()).await?;
    ensure_can_access_member(&viewer, &member)?;

    let day = RecordQuery::day(date);
    let comments = state
        .comment_repo
        .find_by_member(&member.id, day.start_date, day.end_date)
        .await?;
    Ok(Json(comments))
}

pub async fn create(
    State(state): State<CommentsState>,
    auth_user: AuthUser,
    WithRejection(Json(input), _): WithRejection<Json<CreateComment>, AppError>,
) -> Result<(StatusCode, Json<RecordComment>)> {
    let date = parse_date(&input.date)?;
    let (commenter, member) =
        viewer_and_member(&state, &auth_user, input.member_id.as_deref()).await?;

    let comment = state
        .comment_repo
        .create(&member, date, &commenter, &input.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete(
    State(state): State<CommentsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.comment_repo.delete(&id, &auth_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

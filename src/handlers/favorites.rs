use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::repositories::FavoriteRepository;

#[derive(Clone)]
pub struct FavoritesState {
    pub favorite_repo: FavoriteRepository,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub workout_type_id: String,
    pub is_favorite: bool,
}

pub async fn list(
    State(state): State<FavoritesState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<String>>> {
    let mut ids: Vec<String> = state
        .favorite_repo
        .find_by_user(&auth_user.id)
        .await?
        .into_iter()
        .collect();
    ids.sort();
    Ok(Json(ids))
}

pub async fn add(
    State(state): State<FavoritesState>,
    auth_user: AuthUser,
    Path(type_id): Path<String>,
) -> Result<StatusCode> {
    state.favorite_repo.add(&auth_user.id, &type_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<FavoritesState>,
    auth_user: AuthUser,
    Path(type_id): Path<String>,
) -> Result<StatusCode> {
    state.favorite_repo.remove(&auth_user.id, &type_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle(
    State(state): State<FavoritesState>,
    auth_user: AuthUser,
    Path(type_id): Path<String>,
) -> Result<Json<FavoriteStatus>> {
    let is_favorite = state.favorite_repo.toggle(&auth_user.id, &type_id).await?;
    Ok(Json(FavoriteStatus {
        workout_type_id: type_id,
        is_favorite,
    }))
}

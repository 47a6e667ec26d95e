use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Category, Dimension, WorkoutTypeEntry};
use crate::repositories::{CategoryRepository, FavoriteRepository, WorkoutTypeRepository};
use crate::tracker::{filter_workout_types, FilterState};

#[derive(Clone)]
pub struct CatalogState {
    pub category_repo: CategoryRepository,
    pub workout_type_repo: WorkoutTypeRepository,
    pub favorite_repo: FavoriteRepository,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutTypesQuery {
    cat1: Option<String>,
    cat2: Option<String>,
    cat3: Option<String>,
    cat4: Option<String>,
    q: Option<String>,
    #[serde(default)]
    favorites_only: bool,
}

impl WorkoutTypesQuery {
    fn into_filter(self) -> FilterState {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        FilterState {
            selected: [
                non_empty(self.cat1),
                non_empty(self.cat2),
                non_empty(self.cat3),
                non_empty(self.cat4),
            ],
            search_text: self.q.unwrap_or_default(),
            favorites_only: self.favorites_only,
        }
    }
}

pub async fn list_categories(
    State(state): State<CatalogState>,
    _auth_user: AuthUser,
    Path(dimension): Path<u8>,
) -> Result<Json<Vec<Category>>> {
    let dimension = Dimension::new(dimension).ok_or_else(|| {
        AppError::Validation(format!("Dimension must be 1-{}", Dimension::COUNT))
    })?;
    let categories = state.category_repo.find_by_dimension(dimension).await?;
    Ok(Json(categories))
}

/// Catalog filtered by the picker state, each entry flagged with the
/// caller's favorite status.
pub async fn list_workout_types(
    State(state): State<CatalogState>,
    auth_user: AuthUser,
    Query(query): Query<WorkoutTypesQuery>,
) -> Result<Json<Vec<WorkoutTypeEntry>>> {
    let filter = query.into_filter();
    let workout_types = state.workout_type_repo.find_all().await?;
    let favorites = state.favorite_repo.find_by_user(&auth_user.id).await?;

    let entries = filter_workout_types(&workout_types, &filter, &favorites)
        .into_iter()
        .map(|workout_type| WorkoutTypeEntry {
            is_favorite: favorites.contains(&workout_type.id),
            workout_type: workout_type.clone(),
        })
        .collect();
    Ok(Json(entries))
}

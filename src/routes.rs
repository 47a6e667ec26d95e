use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};

use crate::db::DbPool;
use crate::handlers::{auth, calendar, catalog, comments, favorites, health, records, tracker};
use crate::repositories::{
    CategoryRepository, CommentRepository, FavoriteRepository, SessionRepository,
    TrainingSessionRepository, UserRepository, WorkoutRecordRepository, WorkoutTypeRepository,
};
use crate::tracker::Dispatcher;

/// Per-area handler states, all backed by one pool.
#[derive(Clone)]
pub struct AppStates {
    pub health: health::HealthState,
    pub auth: auth::AuthState,
    pub catalog: catalog::CatalogState,
    pub favorites: favorites::FavoritesState,
    pub records: records::RecordsState,
    pub calendar: calendar::CalendarState,
    pub comments: comments::CommentsState,
    pub tracker: tracker::TrackerState,
    pub session_repo: SessionRepository,
}

impl AppStates {
    pub fn new(pool: DbPool) -> Self {
        let user_repo = UserRepository::new(pool.clone());
        let session_repo = SessionRepository::new(pool.clone());
        let category_repo = CategoryRepository::new(pool.clone());
        let workout_type_repo = WorkoutTypeRepository::new(pool.clone());
        let favorite_repo = FavoriteRepository::new(pool.clone());
        let record_repo = WorkoutRecordRepository::new(pool.clone());
        let comment_repo = CommentRepository::new(pool.clone());
        let training_session_repo = TrainingSessionRepository::new(pool.clone());

        Self {
            health: health::HealthState { pool },
            auth: auth::AuthState {
                session_repo: session_repo.clone(),
            },
            catalog: catalog::CatalogState {
                category_repo,
                workout_type_repo,
                favorite_repo: favorite_repo.clone(),
            },
            favorites: favorites::FavoritesState {
                favorite_repo: favorite_repo.clone(),
            },
            records: records::RecordsState {
                record_repo: record_repo.clone(),
            },
            calendar: calendar::CalendarState {
                record_repo: record_repo.clone(),
                training_session_repo,
            },
            comments: comments::CommentsState {
                comment_repo,
                user_repo,
            },
            tracker: tracker::TrackerState {
                dispatcher: Dispatcher::new(record_repo, favorite_repo),
            },
            session_repo,
        }
    }
}

pub fn create_router(states: AppStates) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .with_state(states.health)
        // Session
        .route("/api/me", get(auth::me))
        .route("/api/logout", post(auth::logout))
        .with_state(states.auth)
        // Catalog
        .route("/api/categories/{dimension}", get(catalog::list_categories))
        .route("/api/workout-types", get(catalog::list_workout_types))
        .with_state(states.catalog)
        // Favorites
        .route("/api/favorites", get(favorites::list))
        .route(
            "/api/favorites/{type_id}",
            put(favorites::add).delete(favorites::remove),
        )
        .route("/api/favorites/{type_id}/toggle", post(favorites::toggle))
        .with_state(states.favorites)
        // Records
        .route("/api/records", get(records::list).post(records::create))
        .route(
            "/api/records/{id}",
            put(records::update).delete(records::delete),
        )
        .with_state(states.records)
        // Calendar
        .route("/api/calendar", get(calendar::grid))
        .route("/api/calendar/summary", get(calendar::summary))
        .route("/calendar", get(calendar::page))
        .with_state(states.calendar)
        // Comments
        .route("/api/comments", get(comments::list).post(comments::create))
        .route("/api/comments/{id}", delete(comments::delete))
        .with_state(states.comments)
        // Tracker commands
        .route("/api/tracker/commands", post(tracker::dispatch))
        .with_state(states.tracker)
        // Session lookup for the AuthUser extractor
        .layer(Extension(states.session_repo))
}

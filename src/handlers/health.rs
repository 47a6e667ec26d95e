use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::DbPool;
use crate::version::GIT_VERSION;

#[derive(Clone)]
pub struct HealthState {
    pub pool: DbPool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    git_version: &'static str,
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let pool = state.pool.clone();
    let reachable = tokio::task::spawn_blocking(move || {
        pool.get()
            .map_err(|e| e.to_string())
            .and_then(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(|e| e.to_string())
            })
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(|r| r);

    let database = match reachable {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check could not reach the database: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
        git_version: GIT_VERSION,
    })
}

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::tracker::{Command, CommandOutcome, Dispatcher, TrackerContext};

#[derive(Clone)]
pub struct TrackerState {
    pub dispatcher: Dispatcher,
}

/// A command plus the context the client currently holds. A client without a
/// context starts from today's month.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub context: Option<TrackerContext>,
    pub command: Command,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub context: TrackerContext,
    pub outcome: CommandOutcome,
}

pub async fn dispatch(
    State(state): State<TrackerState>,
    auth_user: AuthUser,
    WithRejection(Json(request), _): WithRejection<Json<CommandRequest>, AppError>,
) -> Result<Json<CommandResponse>> {
    let mut context = request
        .context
        .unwrap_or_else(|| TrackerContext::new(Local::now().date_naive()));

    let outcome = state
        .dispatcher
        .dispatch(&mut context, &auth_user.id, request.command)
        .await?;

    Ok(Json(CommandResponse { context, outcome }))
}

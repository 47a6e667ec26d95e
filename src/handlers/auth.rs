use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::repositories::SessionRepository;
use crate::session::{get_session_token, remove_session_cookie};

#[derive(Clone)]
pub struct AuthState {
    pub session_repo: SessionRepository,
}

pub async fn me(auth_user: AuthUser) -> Json<AuthUser> {
    Json(auth_user)
}

/// Drops the server-side session and clears the cookie.
pub async fn logout(
    State(state): State<AuthState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> Result<Response> {
    if let Some(token) = get_session_token(&jar) {
        state.session_repo.delete(&token).await?;
    }
    tracing::info!("User {} signed out", auth_user.username);

    let jar = jar.add(remove_session_cookie());
    Ok((jar, StatusCode::NO_CONTENT).into_response())
}

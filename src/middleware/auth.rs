use axum::{extract::FromRequestParts, http::request::Parts, Extension};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{User, UserRole};
use crate::repositories::SessionRepository;
use crate::session::get_session_token;

/// The signed-in caller, resolved from the `session` cookie.
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub trainer_id: Option<String>,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            trainer_id: user.trainer_id,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(session_repo) = Extension::<SessionRepository>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = get_session_token(&jar).ok_or(AppError::Unauthorized)?;

        match session_repo.find_user(&token).await? {
            Some(user) => Ok(user.into()),
            None => {
                tracing::debug!("Rejected unknown or expired session token");
                Err(AppError::Unauthorized)
            }
        }
    }
}

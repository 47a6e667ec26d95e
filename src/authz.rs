//! Ownership checks shared by every mutating repository call.

use crate::error::{AppError, Result};
use crate::models::User;

/// Anything that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> &str;

    /// Human-readable noun used in error messages.
    fn kind() -> &'static str;
}

/// Fails with `Forbidden` unless `user_id` owns `item`.
pub fn ensure_owner<T: Owned>(item: &T, user_id: &str) -> Result<()> {
    if item.owner_id() == user_id {
        Ok(())
    } else {
        tracing::warn!(
            "User {} attempted to modify {} owned by {}",
            user_id,
            T::kind(),
            item.owner_id()
        );
        Err(AppError::Forbidden(format!(
            "{} belongs to another user",
            T::kind()
        )))
    }
}

/// A member's day is visible to the member and to their linked trainer.
pub fn ensure_can_access_member(viewer: &User, member: &User) -> Result<()> {
    if viewer.id == member.id || member.trainer_id.as_deref() == Some(viewer.id.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not linked to this member".to_string(),
        ))
    }
}

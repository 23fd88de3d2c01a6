//! Role-based authorization guards.
//!
//! These are the coarse, per-endpoint gates. Per-document decisions are made
//! by the documents access policy.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for endpoints restricted to teachers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireTeacher(user): RequireTeacher) { ... }
/// ```
pub struct RequireTeacher(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireTeacher
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_teacher() {
            return Err(AppError::Forbidden("Teacher access required".to_string()));
        }

        Ok(RequireTeacher(user.clone()))
    }
}

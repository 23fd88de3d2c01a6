//! Per-document access decisions.
//!
//! Pure functions over a caller, a visibility tier and an operation. Route
//! guards do the coarse role gating; this decides for a concrete document.

use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::documents::models::Visibility;

/// Who is asking. `identity` is `None` for anonymous requests.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub identity: Option<Uuid>,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.identity.is_none()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<&AuthenticatedUser> for Caller {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            identity: Some(user.user_id),
            roles: user.roles.clone(),
        }
    }
}

impl From<Option<&AuthenticatedUser>> for Caller {
    fn from(user: Option<&AuthenticatedUser>) -> Self {
        user.map(Caller::from).unwrap_or_else(Caller::anonymous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthorized,
    Forbidden,
}

/// Decide whether `caller` may perform `operation` on a document of `visibility`.
///
/// Rules are evaluated in order; the first match wins.
pub fn check(caller: &Caller, visibility: Visibility, operation: Operation) -> Decision {
    if operation == Operation::Read && visibility == Visibility::Public {
        return Decision::Allow;
    }

    if caller.is_anonymous() {
        return Decision::Unauthorized;
    }

    let allowed = match (operation, visibility) {
        (Operation::Read, Visibility::Teacher) => caller.has_role(Role::Teacher),
        (Operation::Read, _) => true,
        (Operation::Write, _) | (Operation::Delete, _) => caller.has_role(Role::Teacher),
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

pub fn can_access(caller: &Caller, visibility: Visibility, operation: Operation) -> bool {
    check(caller, visibility, operation) == Decision::Allow
}

/// Like [`check`], but as a `Result` carrying the matching HTTP error
pub fn authorize(caller: &Caller, visibility: Visibility, operation: Operation) -> Result<(), AppError> {
    match check(caller, visibility, operation) {
        Decision::Allow => Ok(()),
        Decision::Unauthorized => Err(AppError::Unauthorized(
            "Authentication required".to_string(),
        )),
        Decision::Forbidden => Err(AppError::Forbidden(format!(
            "Not allowed to {:?} {} documents",
            operation, visibility
        ))),
    }
}

//! Service layer: authorization gate plus orchestration of repository calls.
//!
//! Every public service function first calls [`ensure_role`] and only then
//! touches the repository. Services are generic over the repository traits so
//! they can be exercised against the `mockall` mock.

use thiserror::Error;

use crate::domain::types::Role;
use crate::models::auth::AuthenticatedUser;

pub mod api;
pub mod feedback;
pub mod incidents;
pub mod volunteers;

/// Roles allowed to manage volunteers.
pub const VOLUNTEER_MANAGERS: &[Role] = &[Role::Admin];
/// Roles allowed to moderate feedback.
pub const FEEDBACK_MODERATORS: &[Role] = &[Role::Admin, Role::Employee];
/// Roles allowed to see the incident list.
pub const INCIDENT_VIEWERS: &[Role] = &[Role::Admin, Role::Employee];
/// Roles allowed to move incidents between statuses.
pub const INCIDENT_DISPATCHERS: &[Role] = &[Role::Admin];

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Bad user input: filters, forms or a disallowed transition.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    /// Stored data the presenter cannot map.
    #[error("data defect: {0}")]
    DataDefect(String),

    /// A multi-step write was rolled back.
    #[error("transaction failed: {0}")]
    Transaction(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub fn has_role(user: &AuthenticatedUser, allowed: &[Role]) -> bool {
    allowed.contains(&user.role())
}

/// Authorization gate run before any service logic.
pub fn ensure_role(user: &AuthenticatedUser, allowed: &[Role]) -> ServiceResult<()> {
    if has_role(user, allowed) {
        Ok(())
    } else {
        log::warn!("User {} with role '{}' denied access", user.email, user.role);
        Err(ServiceError::Unauthorized)
    }
}

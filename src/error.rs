//! Service-level error taxonomy.
//!
//! Every guard failure in the core surfaces as one of these variants so the
//! transport layer can map them to its own status codes. Storage failures
//! are carried opaquely; the core never interprets them.

use thiserror::Error;

use crate::status::TransitionError;

/// Typed errors produced by the article service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The entity does not exist, or the caller may not know it exists.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    /// The entity is visible but the operation is not permitted.
    #[error("operation not permitted: {reason}")]
    Forbidden { reason: String },
    /// A state-machine or uniqueness rule was violated.
    #[error("conflict: {reason}")]
    Conflict { reason: String },
    /// Input was malformed in a way the boundary layer did not catch.
    #[error("invalid input: {reason}")]
    Validation { reason: String },
    /// Opaque storage failure.
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    /// Connection pool failure.
    #[error("database connection unavailable: {0}")]
    Pool(String),
    /// Search backend failure.
    #[error(transparent)]
    Search(#[from] crate::search::SearchError),
}

impl ServiceError {
    /// Not-found error for an article, also used for access denials on
    /// single fetch so inaccessible articles stay invisible.
    #[must_use]
    pub const fn article_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "article",
            id,
        }
    }

    #[must_use]
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidTransition { .. } => Self::conflict(err.to_string()),
            TransitionError::NotPermitted { .. } => Self::forbidden(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ArticleStatus, StatusAction};

    #[test]
    fn invalid_transition_maps_to_conflict() {
        let err: ServiceError = TransitionError::InvalidTransition {
            status: ArticleStatus::Blocked,
            action: StatusAction::Hide,
        }
        .into();
        assert!(matches!(err, ServiceError::Conflict { .. }));
        assert!(err.to_string().contains("BLOCKED"), "names the status: {err}");
    }

    #[test]
    fn wrong_actor_maps_to_forbidden() {
        let err: ServiceError = TransitionError::NotPermitted {
            status: ArticleStatus::Moderation,
            action: StatusAction::Publish,
        }
        .into();
        assert!(matches!(err, ServiceError::Forbidden { .. }));
    }
}

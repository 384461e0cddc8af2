use actix_web::{HttpResponse, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

/// Typed failure of a workflow operation. Every guard violation names the
/// violated condition; no variant ever accompanies a state change.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed input (rating out of range, empty title, ...).
    #[error("{0}")]
    Validation(String),

    /// The actor lacks the role or ownership the action requires.
    #[error("{0}")]
    Forbidden(String),

    /// Absent, or filtered out by the visibility rules. A filtered-out ad
    /// is reported as not found rather than forbidden so its existence
    /// never leaks.
    #[error("{0}")]
    NotFound(String),

    /// A state-machine guard failed (wrong status, missing report, ...).
    #[error("{0}")]
    InvalidTransition(String),

    /// A concurrent writer won the race; the caller may retry.
    #[error("{0}")]
    Conflict(String),

    /// Uniqueness violated: duplicate review, or a duplicate application
    /// the ledger could not upsert.
    #[error("{0}")]
    AlreadyExists(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }
}

impl actix_web::ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Db(e) = self {
            tracing::error!("workflow database error: {e}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn error_kinds_map_to_expected_statuses() {
        assert_eq!(
            WorkflowError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WorkflowError::invalid("ad not OPEN").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WorkflowError::forbidden("no").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            WorkflowError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WorkflowError::already_exists("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            WorkflowError::Conflict("raced".into()).status_code(),
            StatusCode::CONFLICT
        );
    }
}

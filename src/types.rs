use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

use crate::services::entity::{EntityKind, Relation, UniqueField};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: i32 },
    #[error("{kind} with id {id} does not exist")]
    InvalidReference { kind: EntityKind, id: i32 },
    #[error("{} with this {} already exists", .field.owner(), .field.column())]
    DuplicateValue { field: UniqueField },
    #[error("Cannot delete {} {}: related {} records exist", .relation.parent(), .id, .relation.child())]
    DependentRowsExist { relation: Relation, id: i32 },
    #[error("{0}")]
    BadRequest(String),
    #[error("Conflicting concurrent write, retry the request")]
    Conflict,
    #[error("Storage failure: {0}")]
    Storage(diesel::result::Error),
    #[error("Connection pool failure: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Database actor is unavailable: {0}")]
    Mailbox(#[from] actix::MailboxError),
}

#[derive(Error, Debug)]
#[error("Failed to initialize connection pool: {0}")]
pub struct PoolInitializationError(pub String);

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::SerializationFailure,
                _,
            ) => AppError::Conflict,
            other => AppError::Storage(other),
        }
    }
}

impl AppError {
    fn detail(&self) -> String {
        match self {
            AppError::Storage(_) | AppError::Pool(_) | AppError::Mailbox(_) => {
                "Internal storage error".to_owned()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidReference { .. }
            | AppError::DuplicateValue { .. }
            | AppError::DependentRowsExist { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Storage(_) | AppError::Pool(_) | AppError::Mailbox(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed on the storage side");
        }

        HttpResponse::build(self.status_code()).json(json!({ "detail": self.detail() }))
    }
}

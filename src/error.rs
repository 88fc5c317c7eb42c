use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::types::api::ErrorDetail;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("missing paste content")]
    MissingContent,
    #[error("missing or empty user id")]
    MissingOwner,
    #[error("password must be at most 72 bytes")]
    PasswordTooLong,
    #[error("expiry must be a non-negative number of minutes within range")]
    InvalidTtl,
    #[error("could not allocate a unique url id after {attempts} attempts")]
    KeysExhausted { attempts: u32 },
    #[error("database error")]
    Database {
        #[from]
        source: sqlx::Error,
    },
    #[error("password hashing error")]
    Hashing {
        #[from]
        source: bcrypt::BcryptError,
    },
    #[error("password hashing task failed")]
    HashingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl AppError {
    /// Whether the caller supplied bad input, as opposed to a server-side failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::MissingContent
                | AppError::MissingOwner
                | AppError::PasswordTooLong
                | AppError::InvalidTtl
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_validation() {
            let body = ErrorDetail {
                detail: self.to_string(),
                reason: None,
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        error!(error = ?self, "request failed");

        let body = ErrorDetail {
            detail: "internal server error".to_owned(),
            reason: None,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

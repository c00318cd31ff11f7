//! Central error type with HTTP mapping.
//!
//! Every failure path must produce a distinguishable, user-facing message:
//! the teacher has to be able to tell whether to retry, change input
//! (duration), or contact support (permission). Duplicate slots are the one
//! non-fatal case and never reach this type; batch handlers report them as
//! skip counts in a success body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::SlotWriteError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("permission denied: {0}")]
    Permission(String),

    #[error("required data missing: {0}")]
    MissingField(&'static str),

    #[error("invalid duration {0} minutes; switch to 30 or 60 and retry")]
    InvalidDuration(u32),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<SlotWriteError> for AppError {
    fn from(err: SlotWriteError) -> Self {
        match err {
            SlotWriteError::PermissionDenied => {
                AppError::Permission("calendar belongs to another teacher".into())
            }
            SlotWriteError::MissingField(field) => AppError::MissingField(field),
            SlotWriteError::InvalidDuration(minutes) => AppError::InvalidDuration(minutes),
            SlotWriteError::NotFound => AppError::NotFound("slot".into()),
            SlotWriteError::Booked => {
                AppError::Conflict("slot is booked and cannot be deleted".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Permission(_) => (StatusCode::FORBIDDEN, "permission denied"),
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, "required data missing"),
            AppError::InvalidDuration(_) => {
                (StatusCode::BAD_REQUEST, "invalid duration, switch and retry")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "resource not found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "resource conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad request"),
            AppError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "export failed"),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

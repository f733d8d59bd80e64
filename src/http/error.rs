use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::version::error::CheckError;

/// Request-boundary failures, each mapped to one status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request did not name a program at all
    #[error("Bad Request")]
    BadRequest,

    /// Browser-style GET queries are disabled
    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Check(#[from] CheckError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Check(CheckError::ProgramNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Check(CheckError::MissingField(_) | CheckError::InvalidField { .. }) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Message shown to clients. Unknown programs are not echoed back.
    pub fn message(&self) -> String {
        match self {
            ApiError::Check(CheckError::ProgramNotFound(_)) => "Program Not Found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Plain-text body, matching the legacy endpoint
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

/// JSON body `{"error": "..."}` for structured clients
#[derive(Debug)]
pub struct JsonError(pub ApiError);

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let body = ErrBody {
            error: self.0.message(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

impl From<CheckError> for JsonError {
    fn from(err: CheckError) -> Self {
        JsonError(err.into())
    }
}

impl From<ApiError> for JsonError {
    fn from(err: ApiError) -> Self {
        JsonError(err)
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use userapi_shared::{error::ServiceError, models::ErrorResponse};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid user id '{0}': expected an integer")]
    InvalidId(String),
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::Service(err) => (
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.detail(),
            ),
            AppError::InvalidBody(rejection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
            }
            AppError::InvalidId(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Request failed: status={}, detail={}", status, detail);
        } else {
            tracing::warn!("Request rejected: status={}, detail={}", status, detail);
        }

        let body = ErrorResponse {
            detail,
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

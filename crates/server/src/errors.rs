use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{message, error?}` with the given status.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self { status, message: message.into(), error }
    }

    /// Map a service outcome; `failure` is the message used for storage errors.
    pub fn from_service(e: ServiceError, failure: &'static str) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Dados inválidos", Some(msg)),
            ServiceError::Conflict(_) => Self::new(StatusCode::BAD_REQUEST, "Matrícula já existe", None),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Aluno não encontrado", None),
            ServiceError::InvalidIdentifier(_) => Self::new(StatusCode::BAD_REQUEST, "ID inválido", None),
            ServiceError::Db(msg) => {
                error!(err = %msg, "{}", failure);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure, Some(msg))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = MessageBody { message: self.message, error: self.error };
        (self.status, Json(body)).into_response()
    }
}

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum LibraryServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid index")]
    InvalidIndex,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidSession,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Too many requests")]
    RateLimitExceeded,

    #[error("Not found")]
    NotFound,

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

impl ResponseError for LibraryServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LibraryServerError::Validation(_) => StatusCode::BAD_REQUEST,
            LibraryServerError::InvalidIndex => StatusCode::BAD_REQUEST,
            LibraryServerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LibraryServerError::MissingToken => StatusCode::UNAUTHORIZED,
            LibraryServerError::InvalidSession => StatusCode::UNAUTHORIZED,
            LibraryServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            LibraryServerError::NotFound => StatusCode::NOT_FOUND,
            LibraryServerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LibraryServerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LibraryServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LibraryServerError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            // Keep file paths and parser details out of client responses.
            log::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ErrorResponse {
            status: "error",
            message,
        })
    }
}

pub type Result<T> = std::result::Result<T, LibraryServerError>;

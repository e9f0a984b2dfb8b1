// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a flat `{"error": ...}` body
#[derive(Error, Debug)]
pub enum PoiError {
    #[error("Poi not found with id: {0}")]
    NotFound(i64),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Path segment that does not name a poi id
    #[error("Unparseable path: {0}")]
    InvalidPath(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl PoiError {
    /// Message safe to hand to clients
    /// Storage details stay in the server log
    fn public_message(&self) -> String {
        match self {
            PoiError::NotFound(_) => "not found".to_string(),
            PoiError::InvalidGeometry(_) => self.to_string(),
            PoiError::DatabaseError(_) => "Database error".to_string(),
            PoiError::InternalError(_) => "Internal server error".to_string(),
            PoiError::InvalidPath(_) => "not found".to_string(),
            PoiError::InvalidQuery(_) => "invalid query string".to_string(),
        }
    }
}

impl From<sqlx::Error> for PoiError {
    fn from(e: sqlx::Error) -> Self {
        PoiError::DatabaseError(e.to_string())
    }
}

/// Convert PoiError to HTTP response
impl ResponseError for PoiError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(json!({ "error": self.public_message() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PoiError::NotFound(_) => StatusCode::NOT_FOUND,
            PoiError::InvalidGeometry(_) => StatusCode::BAD_REQUEST,
            PoiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PoiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PoiError::InvalidPath(_) => StatusCode::NOT_FOUND,
            PoiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

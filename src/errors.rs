use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Validation(String),

    /// Per-field validation failures, reported as an `errors` array.
    #[error("Validation failed")]
    FieldErrors(Vec<FieldError>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Auth(String),

    #[error("Insufficient wallet balance")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("{0}")]
    NotFound(String),

    #[error("Password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub path: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::FieldErrors(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid credentials" }),
            ),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            AppError::InsufficientFunds {
                required,
                available,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "Insufficient wallet balance",
                    "required": required,
                    "available": available,
                }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
            AppError::Token(e) => {
                tracing::error!("Token error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let path = camel_case(field);
                errors.iter().map(move |e| FieldError {
                    msg: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                    path: path.clone(),
                })
            })
            .collect();

        field_errors.sort_by(|a, b| a.path.cmp(&b.path));
        AppError::FieldErrors(field_errors)
    }
}

// Struct fields are snake_case; the wire paths are camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let response = AppError::Validation("All fields are required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_map_to_401() {
        let response = AppError::Auth("No token provided".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn insufficient_funds_maps_to_400() {
        let response = AppError::InsufficientFunds {
            required: 300.0,
            available: 120.0,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response =
            AppError::NotFound("No feedback found for this order".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn field_paths_are_camel_cased() {
        assert_eq!(camel_case("service_quality"), "serviceQuality");
        assert_eq!(camel_case("rating"), "rating");
    }
}

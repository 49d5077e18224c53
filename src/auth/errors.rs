use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::error;

/// Failures reported by a [`UserStore`](crate::auth::repo::UserStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{field} is required")]
    Validation { field: &'static str },
    #[error("{field} is already taken")]
    Conflict { field: &'static str },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a raw sqlx error using the `users` table constraint names.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let field = match db.constraint() {
                    Some("users_name_key") => "name",
                    Some("users_email_key") => "email",
                    _ => "accessToken",
                };
                return StoreError::Conflict { field };
            }
        }
        StoreError::Database(err)
    }

    /// Field-level error descriptor sent to clients.
    pub fn descriptor(&self) -> Value {
        match self {
            StoreError::Validation { field } => field_error(field, "required", self.to_string()),
            StoreError::Conflict { field } => field_error(field, "unique", self.to_string()),
            StoreError::Database(e) => field_error("store", "store", e.to_string()),
        }
    }
}

fn field_error(field: &str, kind: &str, message: String) -> Value {
    let mut errors = Map::new();
    errors.insert(field.to_string(), json!({ "kind": kind, "message": message }));
    Value::Object(errors)
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not create user: {0}")]
    Registration(StoreError),
    #[error("could not create user: {0}")]
    InvalidBody(String),
    #[error("store request failed: {0}")]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Registration(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Could not create user", "errors": e.descriptor() })),
            )
                .into_response(),
            ApiError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Could not create user",
                    "errors": field_error("body", "invalid", message),
                })),
            )
                .into_response(),
            // Store failures are reported as client errors, conflict or not.
            ApiError::Store(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Store request failed", "errors": e.descriptor() })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

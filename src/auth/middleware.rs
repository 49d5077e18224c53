//! Bearer-token gate for protected routes.
//!
//! The `Authorization` header carries the raw access token issued at registration.
//! A `Bearer ` prefix is accepted and stripped.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    auth::{
        errors::{ApiError, StoreError},
        repo::UserStore,
        repo_types::User,
    },
    state::AppState,
};

/// Decision taken for one request.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Continue down the chain with this user attached.
    Authenticated(User),
    /// Short-circuit with [`LoggedOut`].
    Rejected,
}

/// `401 {"loggedOut": true}`
#[derive(Debug, Clone, Copy)]
pub struct LoggedOut;

impl IntoResponse for LoggedOut {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "loggedOut": true }))).into_response()
    }
}

fn token_from_header(header: Option<&str>) -> Option<&str> {
    let value = header?.trim_start();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve an `Authorization` header value to a user.
pub async fn authenticate(
    store: &dyn UserStore,
    header: Option<&str>,
) -> Result<AuthOutcome, StoreError> {
    let Some(token) = token_from_header(header) else {
        return Ok(AuthOutcome::Rejected);
    };
    Ok(match store.find_by_access_token(token).await? {
        Some(user) => AuthOutcome::Authenticated(user),
        None => AuthOutcome::Rejected,
    })
}

/// Axum middleware: inserts the authenticated [`User`] into request extensions or answers 401.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let has_header = req.headers().contains_key(AUTHORIZATION);
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match authenticate(state.store.as_ref(), header.as_deref()).await? {
        AuthOutcome::Authenticated(user) => {
            debug!(user_id = %user.id, "request authenticated");
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        AuthOutcome::Rejected => {
            warn!(uri = %req.uri(), has_header, "unauthenticated request");
            Ok(LoggedOut.into_response())
        }
    }
}

pub mod handlers;

use crate::{auth::middleware::require_user, state::AppState};
use axum::{middleware, Router};

/// Protected routes; every request passes through [`require_user`] first.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .route_layer(middleware::from_fn_with_state(state, require_user))
}

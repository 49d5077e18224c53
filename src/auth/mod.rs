use crate::state::AppState;
use axum::Router;

mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}

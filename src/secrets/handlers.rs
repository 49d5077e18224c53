use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{auth::repo_types::User, state::AppState};

pub const SECRET_MESSAGE: &str = "This is a super secret message";

#[derive(Debug, Serialize)]
pub struct SecretResponse {
    pub secret: &'static str,
}

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/secrets", get(get_secret))
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn get_secret(Extension(user): Extension<User>) -> Json<SecretResponse> {
    info!("secret served");
    Json(SecretResponse {
        secret: SECRET_MESSAGE,
    })
}

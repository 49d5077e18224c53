use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for `POST /users`. Missing fields surface as validation errors, not 422s.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /sessions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned with 201 after registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub access_token: String,
}

/// Body of `POST /sessions`, always sent with 200.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum LoginResponse {
    #[serde(rename_all = "camelCase")]
    Session { user_id: Uuid, access_token: String },
    #[serde(rename_all = "camelCase")]
    NotFound { not_found: bool },
}

impl LoginResponse {
    pub fn not_found() -> Self {
        LoginResponse::NotFound { not_found: true }
    }
}

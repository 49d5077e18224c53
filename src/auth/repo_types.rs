use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // assigned by the store
    pub name: String,               // unique
    pub email: String,              // unique
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 PHC string, not exposed in JSON
    #[serde(skip_serializing)]
    pub access_token: String,       // 256 hex chars, fixed at creation
    pub created_at: OffsetDateTime, // creation timestamp
}

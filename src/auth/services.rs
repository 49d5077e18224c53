use anyhow::Context;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, error};

use crate::auth::{
    errors::{ApiError, StoreError},
    repo::UserStore,
    repo_types::User,
};

/// Bytes of CSPRNG output behind every access token.
pub const ACCESS_TOKEN_BYTES: usize = 128;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hex-encoded random bearer token, `2 * ACCESS_TOKEN_BYTES` characters long.
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// Argon2 is slow on purpose; keep it off the async workers.
async fn off_runtime<T, F>(f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("password hashing task")?
}

/// Hash the password and insert the user.
///
/// An absent password is a validation failure; blank `name`/`email` are rejected by the store.
pub async fn register(
    store: &dyn UserStore,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<User, ApiError> {
    let password = password.ok_or(ApiError::Registration(StoreError::Validation {
        field: "password",
    }))?;
    let hash = off_runtime(move || hash_password(&password)).await?;
    store
        .create(name, email, &hash)
        .await
        .map_err(ApiError::Registration)
}

/// Resolve credentials to a user. `None` covers unknown email, wrong password and missing fields.
pub async fn login(
    store: &dyn UserStore,
    email: Option<&str>,
    password: Option<String>,
) -> Result<Option<User>, ApiError> {
    let (Some(email), Some(password)) = (email, password) else {
        return Ok(None);
    };
    let Some(user) = store.find_by_email(email).await? else {
        debug!("login unknown email");
        return Ok(None);
    };
    let hash = user.password_hash.clone();
    let ok = off_runtime(move || verify_password(&password, &hash)).await?;
    Ok(ok.then_some(user))
}

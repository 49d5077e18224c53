use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        errors::ApiError,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/sessions", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "registration body rejected");
        ApiError::InvalidBody(rejection.body_text())
    })?;
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();

    let user = match services::register(state.store.as_ref(), &name, &email, payload.password).await
    {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, %name, %email, "registration failed");
            return Err(e);
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            access_token: user.access_token,
        }),
    ))
}

/// Credential mismatch is answered with 200 `{"notFound": true}`, not a 4xx.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!(error = %rejection, "login body rejected");
            return Ok(Json(LoginResponse::not_found()));
        }
    };
    let user = services::login(
        state.store.as_ref(),
        payload.email.as_deref(),
        payload.password,
    )
    .await?;

    match user {
        Some(user) => {
            info!(user_id = %user.id, "user logged in");
            Ok(Json(LoginResponse::Session {
                user_id: user.id,
                access_token: user.access_token,
            }))
        }
        None => {
            warn!(email = ?payload.email, "login rejected");
            Ok(Json(LoginResponse::not_found()))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{app::build_app, state::AppState};

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn register_returns_201_with_id_and_token() {
        let app = build_app(AppState::fake());
        let (status, body) = post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
        let token = body["accessToken"].as_str().unwrap();
        assert_eq!(token.len(), 256);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn duplicate_email_or_name_is_400() {
        let app = build_app(AppState::fake());
        let (status, _) = post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = post_json(
            &app,
            "/users",
            json!({ "name": "grace", "email": "ada@x.com", "password": "pw2" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Could not create user");
        assert_eq!(body["errors"]["email"]["kind"], "unique");

        let (status, body) = post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "other@x.com", "password": "pw2" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["name"]["kind"], "unique");
    }

    #[tokio::test]
    async fn missing_password_is_400_with_field_error() {
        let app = build_app(AppState::fake());
        let (status, body) =
            post_json(&app, "/users", json!({ "name": "ada", "email": "ada@x.com" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["password"]["kind"], "required");
    }

    #[tokio::test]
    async fn mistyped_registration_field_is_400_with_body_error() {
        let app = build_app(AppState::fake());
        let (status, body) = post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": 123 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Could not create user");
        assert_eq!(body["errors"]["body"]["kind"], "invalid");
    }

    #[tokio::test]
    async fn registration_without_json_content_type_is_400() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .body(Body::from(
                        json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"]["body"]["kind"], "invalid");
    }

    #[tokio::test]
    async fn unreadable_login_bodies_are_200_not_found() {
        let app = build_app(AppState::fake());
        post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" }),
        )
        .await;

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sessions")
                    .body(Body::from(
                        json!({ "email": "ada@x.com", "password": "pw1" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "notFound": true }));

        let (status, body) =
            post_json(&app, "/sessions", json!({ "email": 42, "password": "pw1" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "notFound": true }));
    }

    #[tokio::test]
    async fn login_returns_the_registration_token() {
        let app = build_app(AppState::fake());
        let (_, reg) = post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" }),
        )
        .await;

        for _ in 0..2 {
            let (status, body) = post_json(
                &app,
                "/sessions",
                json!({ "email": "ada@x.com", "password": "pw1" }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["userId"], reg["id"]);
            assert_eq!(body["accessToken"], reg["accessToken"]);
        }
    }

    #[tokio::test]
    async fn bad_credentials_are_200_not_found() {
        let app = build_app(AppState::fake());
        post_json(
            &app,
            "/users",
            json!({ "name": "ada", "email": "ada@x.com", "password": "pw1" }),
        )
        .await;

        let (status, body) = post_json(
            &app,
            "/sessions",
            json!({ "email": "ada@x.com", "password": "wrong" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "notFound": true }));

        let (status, body) = post_json(
            &app,
            "/sessions",
            json!({ "email": "nobody@x.com", "password": "pw1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "notFound": true }));
    }
}

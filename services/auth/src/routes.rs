//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::{debug, info};

use crate::{
    SharedCredentials,
    error::AuthError,
    models::{LoginRequest, RegisterRequest},
};

/// Create the router for the authentication endpoints
///
/// Meant to be nested under `/api/auth`.
pub fn create_router<S>(credentials: SharedCredentials) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(credentials)
}

/// User registration endpoint
pub async fn register(
    State(credentials): State<SharedCredentials>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;
    info!("Registration attempt");

    let response = credentials.register(payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(credentials): State<SharedCredentials>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    // A body that cannot name a user is a failed login, not a bad request.
    let Json(payload) = payload.map_err(|rejection| {
        debug!("Login body rejected: {}", rejection.body_text());
        AuthError::InvalidCredentials
    })?;
    info!("Login attempt");

    let response = credentials.authenticate(payload).await?;

    Ok((StatusCode::OK, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwt::{JwtConfig, JwtService},
        models::AuthResponse,
        password::PasswordHasher,
        repositories::InMemoryUserRepository,
        service::CredentialService,
    };
    use axum::{
        body::Body,
        http::{Method, Request, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let credentials = Arc::new(CredentialService::new(
            Arc::new(InMemoryUserRepository::new()),
            JwtService::new(JwtConfig::with_secret("test-secret")).unwrap(),
            PasswordHasher::with_params(8, 1, 1).unwrap(),
        ));
        create_router(credentials)
    }

    async fn post_json(app: &Router, path: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn register_returns_created_with_token_and_summary() {
        let app = app();
        let (status, body) = post_json(
            &app,
            "/register",
            json!({"name": "Alice", "email": "a@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let response: AuthResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "a@x.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_register_is_bad_request() {
        let app = app();
        let body = json!({"name": "Alice", "email": "a@x.com", "password": "pw123"}).to_string();

        post_json(&app, "/register", body.clone()).await;
        let (status, response) = post_json(&app, "/register", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Registration failed");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, response) = post_json(&app(), "/register", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }

    #[tokio::test]
    async fn login_failures_are_unauthorized_and_identical() {
        let app = app();
        post_json(
            &app,
            "/register",
            json!({"name": "Alice", "email": "a@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        let wrong_password = post_json(
            &app,
            "/login",
            json!({"email": "a@x.com", "password": "bad"}).to_string(),
        )
        .await;
        let unknown_email = post_json(
            &app,
            "/login",
            json!({"email": "zz@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn login_with_mistyped_fields_is_unauthorized() {
        let app = app();
        post_json(
            &app,
            "/register",
            json!({"name": "Alice", "email": "a@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        for body in [
            json!({"email": 123, "password": "pw123"}).to_string(),
            json!({"email": "a@x.com", "password": ["pw123"]}).to_string(),
            "{not json".to_string(),
        ] {
            let (status, response) = post_json(&app, "/login", body).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(response["error"], "Invalid login credentials");
        }
    }

    #[tokio::test]
    async fn login_succeeds_with_registered_credentials() {
        let app = app();
        post_json(
            &app,
            "/register",
            json!({"name": "Alice", "email": "a@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        let (status, body) = post_json(
            &app,
            "/login",
            json!({"email": "a@x.com", "password": "pw123"}).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["name"], "Alice");
    }
}

//! Middleware for bearer token validation

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{SharedCredentials, error::AuthError};

/// Require a valid `Authorization: Bearer <token>` header
///
/// On success the resolved [`AuthUser`](crate::models::AuthUser) is added to
/// the request extensions for handlers to pick up.
pub async fn require_auth(
    State(credentials): State<SharedCredentials>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        debug!("Request without bearer token");
        return Err(AuthError::Unauthenticated);
    };

    let user = credentials.verify_token(bearer.token()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

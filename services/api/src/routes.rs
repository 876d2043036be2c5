//! API service routes

use auth::AuthUser;
use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::InvoicePayload,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/api/invoices/:id",
            put(update_invoice).delete(delete_invoice),
        )
        .route_layer(middleware::from_fn_with_state(
            state.credentials.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/auth",
            auth::routes::create_router(state.credentials.clone()),
        )
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_healthy().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "invoice-api"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "service": "invoice-api"
            })),
        )
    }
}

/// List the caller's invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let invoices = state.invoices.list(user.id).await?;
    debug!("Listing {} invoices for user {}", invoices.len(), user.id);

    Ok(Json(invoices))
}

/// Create an invoice owned by the caller
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<InvoicePayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let invoice = payload
        .into_new_invoice()
        .map_err(ApiError::ValidationFailure)?;

    let created = state.invoices.create(user.id, &invoice).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Apply a partial update to one of the caller's invoices
pub async fn update_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<InvoicePayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_invoice_id(&id)?;
    let Json(payload) = payload?;
    let changes = payload
        .into_changes()
        .map_err(ApiError::ValidationFailure)?;

    let updated = state
        .invoices
        .update(user.id, id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Updated invoice {} for user {}", id, user.id);
    Ok(Json(updated))
}

/// Delete one of the caller's invoices
pub async fn delete_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_invoice_id(&id)?;

    let deleted = state
        .invoices
        .delete(user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Deleted invoice {} for user {}", id, user.id);
    Ok(Json(deleted))
}

/// An id that cannot name any record is reported like a missing one
fn parse_invoice_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!(
            parse_invoice_id("not-a-uuid"),
            Err(ApiError::NotFound)
        ));
        let id = Uuid::new_v4();
        assert_eq!(parse_invoice_id(&id.to_string()).unwrap(), id);
    }
}

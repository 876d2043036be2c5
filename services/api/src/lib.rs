//! Invoice tracker HTTP service
//!
//! Serves the credential endpoints from the `auth` crate under `/api/auth`
//! and the owner-scoped invoice endpoints under `/api/invoices`.

use axum::{
    Router,
    http::{Method, header},
};
use common::config::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    sensitive_headers::SetSensitiveHeadersLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use state::{AppState, build_state};

/// Build the complete application with its middleware stack
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        // Keep bearer tokens out of traces.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any),
        );

    routes::create_router(state).layer(middleware)
}

use super::handlers::{self, MAX_UPLOAD_BYTES};
use super::state::AppState;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            allowed_origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid CORS origin in configuration")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-user-email"),
        ])
        .allow_credentials(true);

    let router = Router::new()
        // Root
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users/save", post(handlers::save_user))
        .route("/users", get(handlers::list_users))
        .route("/users/", get(handlers::list_users))
        // Assessments
        .route("/assessments/all", get(handlers::list_assessments))
        .route("/assessments/save", post(handlers::save_assessment))
        .route(
            "/assessments/:id",
            get(handlers::get_assessment).delete(handlers::delete_assessment),
        )
        // Uploads
        .route(
            "/upload",
            get(handlers::upload_status).post(handlers::upload_video),
        )
        // Uploads can exceed axum's default 2MB body cap
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024))
        .layer(cors)
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

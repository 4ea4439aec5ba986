use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{files, health, metadata, users};
use crate::AppState;

/// Build the gateway router.
///
/// `max_upload_bytes` bounds every request body, multipart uploads included.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        // Relational store
        .route("/insert", post(users::insert_user))
        .route("/fetch", get(users::fetch_users))
        // Object store
        .route("/upload", post(files::upload_file))
        .route("/list_files", get(files::list_files))
        // Metadata store
        .route("/get_file_metadata", get(metadata::get_file_metadata))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

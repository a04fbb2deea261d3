use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;
use crate::shared::constants::MULTIPART_OVERHEAD;

/// Create routes for the categories feature
///
/// Note: authentication is left to layers added by the caller
pub fn routes(service: Arc<CategoryService>, max_upload_size: usize) -> Router {
    // Allow body size up to the upload limit plus multipart overhead
    let body_limit = DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/category",
            get(handlers::list_categories)
                .post(handlers::create_category)
                .layer(body_limit),
        )
        .route(
            "/category/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category)
                .layer(body_limit),
        )
        .route(
            "/category/edit/{id}",
            post(handlers::update_category)
                .put(handlers::update_category)
                .layer(body_limit),
        )
        .with_state(service)
}

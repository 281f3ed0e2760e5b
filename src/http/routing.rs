use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

/// Wraps the todo routes with the root-level health check and a
/// permissive CORS policy for cross-origin front ends.
pub fn app(todos: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", todos)
        .layer(CorsLayer::permissive())
}

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::handlers::feedback;
use crate::state::AppState;

/// Creates the application router: the feedback chat route plus request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/feedback/chat", get(feedback::chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

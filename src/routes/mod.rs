//! Route definitions.

pub mod health;
pub mod summary;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::require_principal;
use crate::AppState;

/// Build the application router, mounted under the configured base path.
pub fn router(state: AppState) -> Router {
    let summary_routes = Router::new()
        .route("/summary", get(summary::index))
        .route("/summary/", get(summary::index))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    let pages = Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(summary_routes);

    let app = if state.config.base_path.is_empty() {
        pages
    } else {
        Router::new().nest(&state.config.base_path, pages)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

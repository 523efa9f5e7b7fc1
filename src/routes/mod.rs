//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A single resource collection is exposed at `/comments`. GET and POST are
//! routed to handlers; every other method lands on the method fallback and
//! gets a fixed 405 body.

pub mod comments;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/comments",
            get(comments::list_comments)
                .post(comments::create_comment)
                .fallback(comments::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

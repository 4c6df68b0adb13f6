//! Todo REST Server
//!
//! HTTP/JSON CRUD API for to-do items on top of a pluggable [`ItemStore`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use todo_core::ItemStore;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Requests taking longer than this are answered with 408
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

/// Build the router for the given store
pub fn app(store: Arc<dyn ItemStore>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/todo", post(handlers::items::create))
        .route("/todos", get(handlers::items::list))
        .route(
            "/todo/:id",
            get(handlers::items::get)
                .put(handlers::items::update)
                .delete(handlers::items::delete),
        )
        // Descriptions have no length cap
        .layer(DefaultBodyLimit::disable())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

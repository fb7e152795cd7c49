pub mod contacts;
pub mod health;

use crate::store::ContactStore;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/contacts", post(contacts::create_contact))
        .route(
            "/v1/contacts/:id",
            get(contacts::get_contact).patch(contacts::update_contact),
        )
        .layer(cors)
        .with_state(state)
}

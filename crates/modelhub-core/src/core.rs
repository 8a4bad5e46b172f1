use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use modelhub_storage::HubStorage;
use modelhub_upstream::Upstream;

use crate::handlers;

pub struct CoreState {
    pub storage: HubStorage,
    pub upstream: Upstream,
}

pub struct Core {
    state: Arc<CoreState>,
}

impl Core {
    pub fn new(storage: HubStorage, upstream: Upstream) -> Self {
        Self {
            state: Arc::new(CoreState { storage, upstream }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api", get(handlers::root))
            .route("/api/", get(handlers::root))
            .route(
                "/api/status",
                post(handlers::create_status_check).get(handlers::list_status_checks),
            )
            .route("/api/api-keys", post(handlers::save_api_key))
            .route(
                "/api/api-keys/{provider}",
                get(handlers::get_api_key).delete(handlers::delete_api_key),
            )
            .route("/api/models", get(handlers::all_models))
            .route("/api/models/{tier}", get(handlers::models_for_tier))
            .route("/api/chat", post(handlers::chat))
            .route("/api/generate-image", post(handlers::generate_image))
            .route("/api/generate-audio", post(handlers::generate_audio))
            .route("/api/generate-video", post(handlers::generate_video))
            .with_state(self.state.clone())
    }

    pub fn state(&self) -> Arc<CoreState> {
        self.state.clone()
    }
}

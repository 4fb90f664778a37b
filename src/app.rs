use axum::{
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{api, state::AppState, ws};

/// All routes: the round socket, the REST API and the static UI fallback
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let api_routes = Router::new()
        .route("/packs", get(api::list_packs))
        .route("/packs/{id}", get(api::get_pack))
        .route("/words", get(api::list_words).post(api::add_word))
        .route("/words/generate", post(api::generate_words))
        .route(
            "/words/{id}",
            put(api::update_word).delete(api::delete_word),
        )
        .route("/images", post(api::generate_image))
        .route("/library/export", get(api::export_library))
        .route("/library/import", post(api::import_library));

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

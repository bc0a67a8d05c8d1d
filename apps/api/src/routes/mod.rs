pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::documents::handlers as documents;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/login", post(auth::handle_login))
        .route("/profile/:email", post(profile::handle_save_profile))
        .route("/upload/:email", post(documents::handle_upload))
        .route("/download/:email", get(documents::handle_download))
        // Resume binaries ride in the request body, so the cap doubles as
        // the upload size limit (default 50 MiB).
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /health                                  health::health          │
//! │                                                                         │
//! │  GET  /api/equipment                           equipment::list         │
//! │  POST /api/upload-database                     equipment::upload       │
//! │                                                                         │
//! │  POST /api/calculate-quote                     quotes::calculate       │
//! │  POST /api/customize-quote                     quotes::customize       │
//! │  GET  /api/quotes/{id}                         quotes::get_quote       │
//! │  POST /api/quotes/{id}/quantity                quotes::edit_quantity   │
//! │  POST /api/quotes/{id}/swap                    quotes::swap_item       │
//! │  POST /api/quotes/{id}/recalculate             quotes::recalculate     │
//! │  POST /api/quotes/{id}/commands                quotes::apply_command   │
//! │                                                                         │
//! │  POST /api/quotes/{id}/document                documents::for_session  │
//! │  POST /api/generate-document                   documents::generate     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod documents;
pub mod equipment;
pub mod health;
pub mod quotes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Uploaded catalogs and logo data URLs can be larger than axum's 2 MB default.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/equipment", get(equipment::list))
        .route("/api/upload-database", post(equipment::upload))
        .route("/api/calculate-quote", post(quotes::calculate))
        .route("/api/customize-quote", post(quotes::customize))
        .route("/api/quotes/{id}", get(quotes::get_quote))
        .route("/api/quotes/{id}/quantity", post(quotes::edit_quantity))
        .route("/api/quotes/{id}/swap", post(quotes::swap_item))
        .route("/api/quotes/{id}/recalculate", post(quotes::recalculate))
        .route("/api/quotes/{id}/commands", post(quotes::apply_command))
        .route("/api/quotes/{id}/document", post(documents::for_session))
        .route("/api/generate-document", post(documents::generate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

//! # Solar Quote API
//!
//! HTTP server in front of the quote engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Quote API Server                                │
//! │                                                                         │
//! │  Browser form ──► axum Router (routes/) ──► QuoteEngine (solar-core)   │
//! │                        │                        ▲                       │
//! │                        │                        │ Arc<Catalog> snapshot │
//! │                        ▼                        │                       │
//! │                 ┌──────────────┐        ┌───────┴────────┐              │
//! │                 │ QuoteSessions│        │  CatalogStore  │              │
//! │                 │ (state.rs)   │        │ (solar-catalog)│              │
//! │                 └──────────────┘        └────────────────┘              │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                 render.rs ──► HTML quotation download                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Environment variables:
//! - `SOLAR_CONFIG` - Path of the TOML config file
//! - `SOLAR_BIND_ADDR` / `SOLAR_PORT` - Listen address (default: 0.0.0.0:3000)
//! - `SOLAR_CATALOG_PATH` - Catalog file (default: data/catalog.json)
//! - `SOLAR_UPLOAD_DIR` - Where uploaded catalogs are kept
//! - `SOLAR_COMPANY_NAME` - Company name printed on documents
//! - `SOLAR_SESSION_TTL_SECS` - Idle lifetime of a quote session
//! - `RUST_LOG` - Log filter

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{CompanyProfile, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;

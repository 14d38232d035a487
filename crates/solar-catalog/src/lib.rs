//! # solar-catalog: Equipment Catalog for Solar Quote
//!
//! Supplies the priced equipment the quote engine selects from.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Solar Quote Data Flow                            │
//! │                                                                         │
//! │  POST /api/calculate-quote                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   solar-catalog (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ CatalogStore  │    │    source     │    │    sample    │   │   │
//! │  │   │  (store.rs)   │◄───│ read / write  │◄───│ 5 panels     │   │   │
//! │  │   │ Arc snapshot  │    │ parse+validate│    │ 6 inverters  │   │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘   │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  QuoteEngine<Arc<Catalog>> (solar-core)                                 │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │                      Catalog files                              │   │
//! │  │        data/catalog.json   data/uploads/uploaded_<ms>.json      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The live, replaceable catalog
//! - [`source`] - JSON catalog files
//! - [`sample`] - Built-in sample catalog
//! - [`error`] - Catalog error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solar_catalog::{CatalogStore, StoreConfig};
//! use solar_core::QuoteEngine;
//!
//! let store = CatalogStore::open(StoreConfig::new("./data/catalog.json")).await?;
//! let engine = QuoteEngine::new(store.snapshot());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod sample;
pub mod source;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CatalogError, CatalogResult};
pub use sample::sample_catalog;
pub use source::{parse_catalog, read_catalog, write_catalog};
pub use store::{CatalogStore, StoreConfig, UploadReceipt};

//! # solar-core: Pure Quoting Logic for Residential Solar
//!
//! Sizing, equipment selection, pricing and quote editing, as pure functions
//! over an injected catalog.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Solar Quote Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    quote-api (axum)                             │   │
//! │  │   /api/calculate-quote  /api/quotes/{id}/...  /api/equipment    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ solar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌───────────┐  ┌──────────┐  ┌────────────┐    │   │
//! │  │   │  sizing  │─►│ selection │─►│  quote   │◄─│   engine   │    │   │
//! │  │   │  kWh, kW │  │ 1st match │  │  totals  │  │  commands  │    │   │
//! │  │   └──────────┘  └─────┬─────┘  └──────────┘  └────────────┘    │   │
//! │  │                       │ CatalogProvider                         │   │
//! │  │   NO I/O • NO LOGGING • NO LOCKS • PURE FUNCTIONS              │   │
//! │  └───────────────────────┼─────────────────────────────────────────┘   │
//! │                          │                                              │
//! │  ┌───────────────────────▼─────────────────────────────────────────┐   │
//! │  │                 solar-catalog (catalog sourcing)                │   │
//! │  │        JSON catalog files, uploads, built-in sample data        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (catalog items, customer, configuration, quote)
//! - [`money`] - Money type in whole đồng (integer arithmetic)
//! - [`catalog`] - The `CatalogProvider` trait and in-memory `Catalog`
//! - [`sizing`] - Consumption estimate and required power
//! - [`selection`] - First-match component selection and accessory kit
//! - [`quote`] - Line items and derived totals
//! - [`engine`] - `QuoteEngine` and `QuoteCommand`
//! - [`savings`] - Savings and payback estimate
//! - [`validation`] - Caller-side input and catalog checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use solar_core::money::Money;
//! use solar_core::types::TaxRate;
//!
//! let subtotal = Money::from_dong(10_000_000);
//! let vat = subtotal.calculate_tax(TaxRate::from_bps(1000)).unwrap();
//! assert_eq!(vat.dong(), 1_000_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod error;
pub mod money;
pub mod quote;
pub mod savings;
pub mod selection;
pub mod sizing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogProvider};
pub use engine::{QuoteCommand, QuoteEngine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use quote::generate_quote;
pub use savings::{estimate_savings, SavingsEstimate};
pub use types::*;

// =============================================================================
// Domain Constants
// =============================================================================

/// Tariff (đồng per kWh) used when the customer gives none.
pub const DEFAULT_ELECTRICITY_PRICE: f64 = 2500.0;

/// Assumed monthly yield (kWh) of one installed kW under local conditions.
pub const MONTHLY_YIELD_PER_KW: f64 = 120.0;

/// Days in the billing month used for daily consumption.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Panel rating chosen when the catalog has one.
pub const PREFERRED_PANEL_WATTS: u32 = 450;

/// Upper bound of the preferred inverter band, as a multiple of required kW.
pub const INVERTER_HEADROOM: f64 = 1.2;

/// Battery capacity margin over evening consumption.
pub const BATTERY_BUFFER: f64 = 1.2;

/// DC cable run per panel, in meters.
pub const DC_CABLE_METERS_PER_PANEL: i64 = 5;

/// AC cable run per installation, in meters.
pub const AC_CABLE_METERS: i64 = 50;

/// VAT applied to every quote (10%).
pub const VAT_RATE: TaxRate = TaxRate::from_bps(1000);

/// Fixed đồng per US dollar for the indicative USD total.
pub const USD_EXCHANGE_RATE: i64 = 24_000;

/// Installment terms offered, in months.
pub const INSTALLMENT_TERMS: [i64; 3] = [12, 24, 36];

/// Maximum catalog code length.
pub const MAX_CODE_LENGTH: usize = 50;

/// Maximum customer or item name length.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest quantity a quote line accepts.
pub const MAX_QUANTITY: i64 = 100_000;

/// Largest monthly consumption (kWh), given or estimated, that is sized.
pub const MAX_MONTHLY_CONSUMPTION_KWH: f64 = 1_000_000.0;

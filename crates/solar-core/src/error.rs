//! # Error Types
//!
//! Domain-specific error types for solar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  solar-core errors (this file)                                         │
//! │  ├── CoreError        - Sizing/selection failures                      │
//! │  └── ValidationError  - Customer input and catalog checks              │
//! │                                                                         │
//! │  solar-catalog errors (separate crate)                                 │
//! │  └── CatalogError     - Reading, parsing, replacing catalog files      │
//! │                                                                         │
//! │  quote-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Anomalies that are not failures (an accessory code missing from the
//! catalog, a swap to an unknown code) never surface here: the engine skips
//! the line or reports [`crate::MutationOutcome::Unchanged`].

use thiserror::Error;

use crate::types::EquipmentCategory;

// =============================================================================
// Core Error
// =============================================================================

/// Quote engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required catalog category has no items to choose from.
    ///
    /// ## When This Occurs
    /// - Sizing requested before a catalog with panels, inverters and
    ///   batteries was loaded
    /// - An uploaded catalog left one of those categories empty
    #[error("No eligible {category} in the catalog")]
    NoEligibleEquipment { category: EquipmentCategory },

    /// A quantity or amount does not fit the quote arithmetic.
    ///
    /// ## When This Occurs
    /// - A line quantity times its unit price exceeds `i64` đồng
    /// - The subtotal, or the subtotal with VAT, exceeds `i64` đồng
    /// - Sizing was asked for more kW than panel counts can express
    ///
    /// The quote the operation was applied to is left as it was.
    #[error("Quote amounts exceed the supported range")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the `validation` module, which callers run before handing
/// customer input or a new catalog to the engine.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a catalog code with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Morning and evening usage shares do not add up.
    #[error("morning and evening usage must sum to 100%, got {morning}% + {evening}%")]
    UsageSplit { morning: u32, evening: u32 },

    /// Duplicate value (e.g. the same code twice in one category).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

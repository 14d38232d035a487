//! # Validation Module
//!
//! Caller-side checks run before anything reaches the quote engine.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP request body                                             │
//! │  └── Type validation (serde deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── validate_customer_input  (before sizing)                           │
//! │  ├── validate_quantity        (before a line quantity edit)             │
//! │  ├── validate_configuration   (before pricing a caller's configuration) │
//! │  └── validate_catalog         (before a catalog replaces the live one)  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: QuoteEngine                                                   │
//! │  └── Trusts its input. A morning/evening split that does not sum to     │
//! │      100 is NOT re-checked there and yields an inconsistent split.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use solar_core::validation::{coerce_quantity, validate_code};
//!
//! validate_code("PV-450-1").unwrap();
//! assert_eq!(coerce_quantity("abc"), 1);
//! ```

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::sizing::estimate_monthly_consumption;
use crate::types::{CustomerInput, SystemConfiguration};
use crate::{
    DEFAULT_ELECTRICITY_PRICE, MAX_CODE_LENGTH, MAX_MONTHLY_CONSUMPTION_KWH, MAX_NAME_LENGTH,
    MAX_QUANTITY,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use solar_core::validation::validate_code;
///
/// assert!(validate_code("ACC-MOUNT-1").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("PV 450").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required display name (customer or catalog item).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage (0 to 100 inclusive).
pub fn validate_percent(field: &str, value: u32) -> ValidationResult<()> {
    if value > 100 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a requested line quantity.
///
/// Values below 1 are not an error (the edit clamps them to 1); anything
/// above [`MAX_QUANTITY`] is.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a free-text quantity the way the quote editor accepts it.
///
/// Leading whitespace and an optional sign are allowed, then the leading run
/// of digits is read (`"12 panels"` → 12, `"2.7"` → 2). Anything that does
/// not yield a positive integer becomes 1.
///
/// ## Example
/// ```rust
/// use solar_core::validation::coerce_quantity;
///
/// assert_eq!(coerce_quantity("10"), 10);
/// assert_eq!(coerce_quantity("0"), 1);
/// assert_eq!(coerce_quantity(""), 1);
/// ```
pub fn coerce_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    match rest[..digits_end].parse::<i64>() {
        Ok(n) if !negative && n > 0 => n,
        _ => 1,
    }
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a customer form before sizing.
///
/// ## Rules
/// - Name required, at most 200 characters
/// - Monthly bill > 0
/// - Electricity price and monthly consumption > 0 when given
/// - Monthly consumption, given or estimated from the bill, at most
///   1 000 000 kWh
/// - Savings target 0-100%
/// - Morning and evening usage each 0-100% and summing to exactly 100%
pub fn validate_customer_input(input: &CustomerInput) -> ValidationResult<()> {
    validate_name("customerName", &input.customer_name)?;

    if !input.monthly_bill.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "monthlyBill".to_string(),
        });
    }

    if let Some(price) = input.electricity_price {
        validate_positive("electricityPrice", price)?;
    }

    if let Some(consumption) = input.monthly_consumption {
        validate_positive("monthlyConsumption", consumption)?;
    }

    let monthly = input.monthly_consumption.unwrap_or_else(|| {
        estimate_monthly_consumption(
            input.monthly_bill,
            input.electricity_price.unwrap_or(DEFAULT_ELECTRICITY_PRICE),
        )
    });
    if !monthly.is_finite() || monthly > MAX_MONTHLY_CONSUMPTION_KWH {
        return Err(ValidationError::OutOfRange {
            field: "monthlyConsumption".to_string(),
            min: 0,
            max: MAX_MONTHLY_CONSUMPTION_KWH as i64,
        });
    }

    validate_percent("savingsPercent", input.savings_percent)?;
    validate_percent("morningUsage", input.morning_usage)?;
    validate_percent("eveningUsage", input.evening_usage)?;

    if input.morning_usage + input.evening_usage != 100 {
        return Err(ValidationError::UsageSplit {
            morning: input.morning_usage,
            evening: input.evening_usage,
        });
    }

    Ok(())
}

/// Validates a caller-supplied configuration before it is priced.
///
/// ## Rules
/// - Every quantity at most [`MAX_QUANTITY`]
/// - No negative prices
pub fn validate_configuration(config: &SystemConfiguration) -> ValidationResult<()> {
    let mut lines: Vec<(&str, &str, i64, i64)> = Vec::with_capacity(3 + config.accessories.len());
    if let Some(pv) = &config.pv {
        lines.push(("pv", pv.item.code.as_str(), pv.quantity, pv.item.price.dong()));
    }
    if let Some(inverter) = &config.inverter {
        lines.push(("inverter", inverter.item.code.as_str(), inverter.quantity, inverter.item.price.dong()));
    }
    if let Some(battery) = &config.battery {
        lines.push(("battery", battery.item.code.as_str(), battery.quantity, battery.item.price.dong()));
    }
    for accessory in &config.accessories {
        lines.push((
            "accessories",
            accessory.item.code.as_str(),
            accessory.quantity,
            accessory.item.price.dong(),
        ));
    }

    for (slot, code, quantity, price) in lines {
        validate_quantity(&format!("{}[{}].quantity", slot, code), quantity)?;
        if price < 0 {
            return Err(ValidationError::OutOfRange {
                field: format!("{}[{}].price", slot, code),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

/// Validates a catalog before it replaces the live one.
///
/// ## Rules
/// - Every code valid and unique within its category
/// - Every name present
/// - No negative prices
/// - Panel watts, inverter kW and battery kWh strictly positive
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for panel in &catalog.pv_panels {
        validate_entry(&mut seen, "pvPanels", &panel.code, &panel.name, panel.price.dong())?;
        if panel.power_w == 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("pvPanels[{}].powerW", panel.code),
            });
        }
    }

    seen.clear();
    for inverter in &catalog.inverters {
        validate_entry(&mut seen, "inverters", &inverter.code, &inverter.name, inverter.price.dong())?;
        validate_positive(&format!("inverters[{}].powerKW", inverter.code), inverter.power_kw)?;
    }

    seen.clear();
    for battery in &catalog.batteries {
        validate_entry(&mut seen, "batteries", &battery.code, &battery.name, battery.price.dong())?;
        validate_positive(&format!("batteries[{}].capacity", battery.code), battery.capacity)?;
    }

    seen.clear();
    for accessory in &catalog.accessories {
        validate_entry(
            &mut seen,
            "accessories",
            &accessory.code,
            &accessory.name,
            accessory.price.dong(),
        )?;
    }

    Ok(())
}

fn validate_entry<'a>(
    seen: &mut HashSet<&'a str>,
    category: &str,
    code: &'a str,
    name: &str,
    price: i64,
) -> ValidationResult<()> {
    validate_code(code)?;
    validate_name(&format!("{}[{}].name", category, code), name)?;

    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: format!("{}[{}].price", category, code),
            min: 0,
            max: i64::MAX,
        });
    }

    if !seen.insert(code) {
        return Err(ValidationError::Duplicate {
            field: format!("{}.code", category),
            value: code.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Core domain types used throughout Solar Quote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (read-only)       Sizing result            Pricing result      │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │ PvPanel         │   │ SystemConfiguration │   │ Quote           │   │
//! │  │ Inverter        │──►│  pv / inverter /    │──►│  items          │   │
//! │  │ Battery         │   │  battery / accs     │   │  subtotal, vat  │   │
//! │  │ Accessory       │   └─────────────────────┘   │  total, USD     │   │
//! │  └─────────────────┘                             │  installments   │   │
//! │                                                  └─────────────────┘   │
//! │  CustomerInput ──► CustomerSummary (derived consumption figures)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Shape
//! Field names are camelCase on the wire (`monthlyBill`, `powerKW`,
//! `totalUSD`) because the quote form and stored quotes use those names.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so Vietnamese VAT of 10% is 1000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Equipment Category
// =============================================================================

/// The four catalog categories. Also the category label of a quote line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EquipmentCategory {
    Panel,
    Inverter,
    Battery,
    Accessory,
}

impl EquipmentCategory {
    /// Unit label printed next to the quantity of a main-equipment line.
    /// Accessories carry their own unit in the catalog.
    pub fn default_unit(&self) -> &'static str {
        match self {
            EquipmentCategory::Panel => "panel",
            EquipmentCategory::Inverter | EquipmentCategory::Battery => "set",
            EquipmentCategory::Accessory => "piece",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EquipmentCategory::Panel => "Panel",
            EquipmentCategory::Inverter => "Inverter",
            EquipmentCategory::Battery => "Battery",
            EquipmentCategory::Accessory => "Accessory",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for EquipmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "panel" | "pv" | "pv_panel" => Ok(EquipmentCategory::Panel),
            "inverter" => Ok(EquipmentCategory::Inverter),
            "battery" => Ok(EquipmentCategory::Battery),
            "accessory" => Ok(EquipmentCategory::Accessory),
            other => Err(format!("unknown equipment category: {}", other)),
        }
    }
}

// =============================================================================
// Catalog Items
// =============================================================================

/// A photovoltaic panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PvPanel {
    /// Catalog code, unique within panels (e.g. `PV-450-1`).
    pub code: String,
    pub name: String,
    /// Rated output in watts.
    #[serde(rename = "powerW")]
    pub power_w: u32,
    /// Unit price.
    pub price: Money,
    #[serde(default)]
    pub brand: Option<String>,
    /// Warranty in years.
    pub warranty: u32,
}

/// A grid/hybrid inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Inverter {
    pub code: String,
    pub name: String,
    /// Rated output in kilowatts.
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    pub price: Money,
    #[serde(default)]
    pub brand: Option<String>,
    pub warranty: u32,
}

/// A storage battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub code: String,
    pub name: String,
    /// Usable capacity in kWh.
    pub capacity: f64,
    pub price: Money,
    #[serde(default)]
    pub brand: Option<String>,
    pub warranty: u32,
}

/// Mounting, cabling, protection, metering, labor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    pub code: String,
    pub name: String,
    /// Pricing unit, e.g. `meter`, `piece`, `kW`.
    pub unit: String,
    pub price: Money,
    /// Free text shown where main equipment shows a warranty.
    #[serde(default)]
    pub note: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// What the customer filled in on the quote form.
///
/// `morning_usage + evening_usage` must equal 100. That is checked by
/// [`crate::validation::validate_customer_input`] before sizing; the engine
/// itself trusts the split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    /// Monthly electricity bill.
    pub monthly_bill: Money,
    /// Monthly consumption in kWh; estimated from the bill when absent.
    #[serde(default)]
    pub monthly_consumption: Option<f64>,
    /// Tariff per kWh; [`crate::DEFAULT_ELECTRICITY_PRICE`] when absent.
    #[serde(default)]
    pub electricity_price: Option<f64>,
    /// Share of consumption to offset, 0-100.
    pub savings_percent: u32,
    /// Share of daily usage in daylight hours, 0-100.
    pub morning_usage: u32,
    /// Share of daily usage after sunset, 0-100.
    pub evening_usage: u32,
}

/// Customer details plus the consumption figures derived during sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub monthly_bill: Money,
    /// kWh per month (given or estimated).
    pub monthly_consumption: f64,
    /// kWh per day.
    pub daily_consumption: f64,
    pub electricity_price: f64,
    pub savings_percent: u32,
    /// kWh per month the system should offset.
    pub target_savings: f64,
    /// kWh per day used in daylight hours.
    pub morning_usage: f64,
    /// kWh per day used after sunset.
    pub evening_usage: f64,
}

// =============================================================================
// System Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PanelSelection {
    pub item: PvPanel,
    pub quantity: i64,
    /// Installed array power in kW.
    pub total_power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InverterSelection {
    pub item: Inverter,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatterySelection {
    pub item: Battery,
    pub quantity: i64,
    /// Installed storage in kWh.
    pub total_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccessorySelection {
    pub item: Accessory,
    pub quantity: i64,
    /// What the line is for, e.g. "DC cable between panels".
    pub description: String,
}

/// The equipment chosen for one sized system.
///
/// Slots are optional so that a configuration supplied by a caller for
/// re-pricing may leave some out; sizing always fills all three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfiguration {
    /// Required system power in kW.
    #[serde(rename = "powerKW", default)]
    pub power_kw: i64,
    #[serde(default)]
    pub pv: Option<PanelSelection>,
    #[serde(default)]
    pub inverter: Option<InverterSelection>,
    #[serde(default)]
    pub battery: Option<BatterySelection>,
    #[serde(default)]
    pub accessories: Vec<AccessorySelection>,
}

// =============================================================================
// Quote
// =============================================================================

/// One priced row of a quote.
///
/// ## Invariant
/// `total_price == unit_price × quantity` after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    pub category: EquipmentCategory,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: Money,
    pub total_price: Money,
    /// Warranty text ("25 years") or the accessory note.
    pub warranty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentOption {
    pub months: i64,
    pub monthly_payment: Money,
}

/// A priced quote. Every field except `items` is derived from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub items: Vec<QuoteLineItem>,
    pub subtotal: Money,
    pub vat: Money,
    pub total: Money,
    /// Total in whole US dollars.
    #[serde(rename = "totalUSD")]
    pub total_usd: i64,
    pub installment_options: Vec<InstallmentOption>,
}

/// Everything a sizing run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteResult {
    pub customer: CustomerSummary,
    pub system: SystemConfiguration,
    pub quote: Quote,
}

/// Whether a mutation changed the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied,
    /// Unknown code, out-of-range line, or a category mismatch.
    Unchanged,
}

impl MutationOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

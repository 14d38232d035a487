//! # Quote Engine
//!
//! Ties sizing, selection and pricing to an injected catalog, and applies
//! in-place edits to a quote the caller holds.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerInput ──► calculate_system() ──► QuoteResult                   │
//! │                                            { customer, system, quote }  │
//! │                                                      │                  │
//! │                   ┌──────────────────────────────────┘                  │
//! │                   ▼                                                     │
//! │  apply(QuoteCommand::EditQuantity { index, quantity })                  │
//! │  apply(QuoteCommand::SwapItem { index, category, code })                │
//! │  apply(QuoteCommand::Recalculate)                                       │
//! │                   │                                                     │
//! │                   └──► MutationOutcome::Applied | Unchanged             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine keeps no per-quote state and takes no locks. A quote is
//! single-writer: callers sharing one across threads serialize edits.
//!
//! Edits are all-or-nothing. A command that fails (an overflowing quantity)
//! returns an error and leaves both the quote and the configuration as they
//! were.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogProvider;
use crate::error::CoreResult;
use crate::quote::{self, warranty_years};
use crate::selection::{self, panel_power_kw};
use crate::sizing::size_system;
use crate::types::{
    CustomerInput, EquipmentCategory, MutationOutcome, Quote, QuoteResult, SystemConfiguration,
};

/// An edit a caller can dispatch against a held quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuoteCommand {
    /// Set a line's quantity (values below 1 become 1).
    EditQuantity { index: usize, quantity: i64 },
    /// Point a line at another catalog item of the same category.
    SwapItem {
        index: usize,
        category: EquipmentCategory,
        code: String,
    },
    /// Re-derive all totals from the current lines.
    Recalculate,
}

/// Quote engine over a catalog provider.
#[derive(Debug, Clone)]
pub struct QuoteEngine<C> {
    catalog: C,
}

impl<C: CatalogProvider> QuoteEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Sizes a system for one customer, selects equipment and prices it.
    ///
    /// Input is assumed valid (see [`crate::validation::validate_customer_input`]).
    pub fn calculate_system(&self, input: &CustomerInput) -> CoreResult<QuoteResult> {
        let sizing = size_system(input);
        let system = self.select_components(sizing.power_kw, sizing.customer.evening_usage)?;
        let quote = self.generate_quote(&system)?;

        Ok(QuoteResult {
            customer: sizing.customer,
            system,
            quote,
        })
    }

    pub fn select_components(&self, power_kw: i64, evening_kwh: f64) -> CoreResult<SystemConfiguration> {
        selection::select_components(&self.catalog, power_kw, evening_kwh)
    }

    pub fn generate_quote(&self, system: &SystemConfiguration) -> CoreResult<Quote> {
        quote::generate_quote(system)
    }

    pub fn edit_quantity(
        &self,
        quote: &mut Quote,
        index: usize,
        quantity: i64,
    ) -> CoreResult<MutationOutcome> {
        quote.set_line_quantity(index, quantity)
    }

    /// Replaces the item on line `index` with catalog item `code`.
    ///
    /// Unchanged when the line does not exist, the line is not of `category`,
    /// `category` is [`EquipmentCategory::Accessory`], or `code` is not in the
    /// catalog. On success the matching slot of `system` is patched too.
    pub fn swap_item(
        &self,
        quote: &mut Quote,
        system: &mut SystemConfiguration,
        index: usize,
        category: EquipmentCategory,
        code: &str,
    ) -> CoreResult<MutationOutcome> {
        match quote.items.get(index) {
            Some(line) if line.category == category => {}
            _ => return Ok(MutationOutcome::Unchanged),
        }

        let mut edited = quote.clone();
        let mut patched = system.clone();
        let line = &mut edited.items[index];

        match category {
            EquipmentCategory::Panel => {
                let Some(panel) = self.catalog.find_panel(code) else {
                    return Ok(MutationOutcome::Unchanged);
                };
                line.replace_item(&panel.code, &panel.name, panel.price, warranty_years(panel.warranty))?;
                if let Some(pv) = patched.pv.as_mut() {
                    pv.total_power = panel_power_kw(panel.power_w, pv.quantity);
                    pv.item = panel.clone();
                }
            }
            EquipmentCategory::Inverter => {
                let Some(inverter) = self.catalog.find_inverter(code) else {
                    return Ok(MutationOutcome::Unchanged);
                };
                line.replace_item(
                    &inverter.code,
                    &inverter.name,
                    inverter.price,
                    warranty_years(inverter.warranty),
                )?;
                if let Some(slot) = patched.inverter.as_mut() {
                    slot.item = inverter.clone();
                }
            }
            EquipmentCategory::Battery => {
                let Some(battery) = self.catalog.find_battery(code) else {
                    return Ok(MutationOutcome::Unchanged);
                };
                line.replace_item(
                    &battery.code,
                    &battery.name,
                    battery.price,
                    warranty_years(battery.warranty),
                )?;
                if let Some(slot) = patched.battery.as_mut() {
                    slot.total_capacity = battery.capacity * slot.quantity as f64;
                    slot.item = battery.clone();
                }
            }
            EquipmentCategory::Accessory => return Ok(MutationOutcome::Unchanged),
        }

        edited.recalculate_totals()?;
        *quote = edited;
        *system = patched;
        Ok(MutationOutcome::Applied)
    }

    pub fn recalculate(&self, quote: &mut Quote) -> CoreResult<MutationOutcome> {
        quote.recalculate_totals()?;
        Ok(MutationOutcome::Applied)
    }

    /// Dispatches one command against a held quote and its configuration.
    pub fn apply(
        &self,
        quote: &mut Quote,
        system: &mut SystemConfiguration,
        command: &QuoteCommand,
    ) -> CoreResult<MutationOutcome> {
        match command {
            QuoteCommand::EditQuantity { index, quantity } => {
                self.edit_quantity(quote, *index, *quantity)
            }
            QuoteCommand::SwapItem {
                index,
                category,
                code,
            } => self.swap_item(quote, system, *index, *category, code),
            QuoteCommand::Recalculate => self.recalculate(quote),
        }
    }
}

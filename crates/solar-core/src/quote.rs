//! # Quote Assembly & Pricing
//!
//! Flattens a [`SystemConfiguration`] into priced line items and derives the
//! quote totals from them.
//!
//! ## Totals Are Derived State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► subtotal = Σ total_price                                     │
//! │               ├──► vat   = round(subtotal × 10%)                        │
//! │               └──► total = round(subtotal × 110%)   (rounded on its own)│
//! │                        ├──► total_usd    = round(total / 24 000)        │
//! │                        └──► installments = round(total / 12 | 24 | 36)  │
//! │                                                                         │
//! │  Every mutation of `items` MUST be followed by recalculate_totals().    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `total` is not `subtotal + vat`. Both are rounded from the exact subtotal,
//! so they can disagree by one đồng.
//!
//! All arithmetic is checked. A line or total that would not fit in an i64
//! fails with [`CoreError::AmountOverflow`], and the quote keeps its previous
//! lines and totals.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    EquipmentCategory, InstallmentOption, MutationOutcome, Quote, QuoteLineItem,
    SystemConfiguration,
};
use crate::{INSTALLMENT_TERMS, USD_EXCHANGE_RATE, VAT_RATE};

/// Warranty text for accessories that carry no note.
pub const DEFAULT_ACCESSORY_WARRANTY: &str = "Per manufacturer";

/// Human-readable warranty for a main component.
pub fn warranty_years(years: u32) -> String {
    format!("{} years", years)
}

/// `unit_price × quantity`.
pub fn line_total(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .checked_multiply_quantity(quantity)
        .ok_or(CoreError::AmountOverflow)
}

/// Prices a configuration.
///
/// Empty slots are skipped, as are accessories with a non-positive quantity.
/// Main components are kept whatever their quantity.
pub fn generate_quote(config: &SystemConfiguration) -> CoreResult<Quote> {
    let mut items = Vec::with_capacity(3 + config.accessories.len());

    if let Some(pv) = &config.pv {
        items.push(QuoteLineItem::new(
            EquipmentCategory::Panel,
            &pv.item.code,
            &pv.item.name,
            pv.quantity,
            EquipmentCategory::Panel.default_unit(),
            pv.item.price,
            warranty_years(pv.item.warranty),
        )?);
    }

    if let Some(inverter) = &config.inverter {
        items.push(QuoteLineItem::new(
            EquipmentCategory::Inverter,
            &inverter.item.code,
            &inverter.item.name,
            inverter.quantity,
            EquipmentCategory::Inverter.default_unit(),
            inverter.item.price,
            warranty_years(inverter.item.warranty),
        )?);
    }

    if let Some(battery) = &config.battery {
        items.push(QuoteLineItem::new(
            EquipmentCategory::Battery,
            &battery.item.code,
            &battery.item.name,
            battery.quantity,
            EquipmentCategory::Battery.default_unit(),
            battery.item.price,
            warranty_years(battery.item.warranty),
        )?);
    }

    for accessory in config.accessories.iter().filter(|a| a.quantity > 0) {
        items.push(QuoteLineItem::new(
            EquipmentCategory::Accessory,
            &accessory.item.code,
            &accessory.item.name,
            accessory.quantity,
            &accessory.item.unit,
            accessory.item.price,
            accessory
                .item
                .note
                .clone()
                .filter(|note| !note.is_empty())
                .unwrap_or_else(|| DEFAULT_ACCESSORY_WARRANTY.to_string()),
        )?);
    }

    Quote::from_items(items)
}

// =============================================================================
// Line Items
// =============================================================================

impl QuoteLineItem {
    pub fn new(
        category: EquipmentCategory,
        code: &str,
        name: &str,
        quantity: i64,
        unit: &str,
        unit_price: Money,
        warranty: String,
    ) -> CoreResult<Self> {
        Ok(QuoteLineItem {
            category,
            code: code.to_string(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            unit_price,
            total_price: line_total(unit_price, quantity)?,
            warranty,
        })
    }

    /// Sets the quantity and recomputes the line total. On overflow the line
    /// is left untouched.
    pub fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        self.total_price = line_total(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Points the line at another catalog item, keeping its quantity.
    pub fn replace_item(
        &mut self,
        code: &str,
        name: &str,
        unit_price: Money,
        warranty: String,
    ) -> CoreResult<()> {
        self.total_price = line_total(unit_price, self.quantity)?;
        self.code = code.to_string();
        self.name = name.to_string();
        self.unit_price = unit_price;
        self.warranty = warranty;
        Ok(())
    }
}

// =============================================================================
// Quote Totals
// =============================================================================

impl Quote {
    /// Builds a quote and derives all totals from `items`.
    pub fn from_items(items: Vec<QuoteLineItem>) -> CoreResult<Self> {
        let mut quote = Quote {
            items,
            subtotal: Money::zero(),
            vat: Money::zero(),
            total: Money::zero(),
            total_usd: 0,
            installment_options: Vec::new(),
        };
        quote.recalculate_totals()?;
        Ok(quote)
    }

    /// Re-derives every total from the current line items.
    ///
    /// Line totals are recomputed first, so a line whose quantity was edited
    /// directly still ends up consistent. Calling this twice in a row is a
    /// no-op the second time. Nothing is written unless every figure fits.
    pub fn recalculate_totals(&mut self) -> CoreResult<()> {
        let line_totals = self
            .items
            .iter()
            .map(|item| line_total(item.unit_price, item.quantity))
            .collect::<CoreResult<Vec<Money>>>()?;
        let subtotal = line_totals
            .iter()
            .try_fold(Money::zero(), |sum, line| sum.checked_add(*line))
            .ok_or(CoreError::AmountOverflow)?;
        let vat = subtotal
            .calculate_tax(VAT_RATE)
            .ok_or(CoreError::AmountOverflow)?;
        let total = subtotal.gross_up(VAT_RATE).ok_or(CoreError::AmountOverflow)?;

        for (item, line_total) in self.items.iter_mut().zip(line_totals) {
            item.total_price = line_total;
        }
        self.subtotal = subtotal;
        self.vat = vat;
        self.total = total;
        self.total_usd = self.total.divide_rounded(USD_EXCHANGE_RATE).dong();
        self.installment_options = INSTALLMENT_TERMS
            .iter()
            .map(|&months| InstallmentOption {
                months,
                monthly_payment: self.total.divide_rounded(months),
            })
            .collect();
        Ok(())
    }

    /// Sets a line's quantity (at least 1) and re-totals.
    ///
    /// Returns [`MutationOutcome::Unchanged`] for an out-of-range index. The
    /// edit is made on a copy and only kept once the new totals are known,
    /// so an overflowing quantity leaves the quote exactly as it was.
    pub fn set_line_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<MutationOutcome> {
        if index >= self.items.len() {
            return Ok(MutationOutcome::Unchanged);
        }

        let mut edited = self.clone();
        edited.items[index].set_quantity(quantity.max(1))?;
        edited.recalculate_totals()?;
        *self = edited;
        Ok(MutationOutcome::Applied)
    }

    /// Difference between `total` and `subtotal + vat`, in đồng.
    pub fn rounding_drift(&self) -> i64 {
        self.total.dong() - (self.subtotal + self.vat).dong()
    }
}

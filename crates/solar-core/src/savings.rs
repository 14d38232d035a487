//! Savings estimate shown next to a quote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::MONTHLY_YIELD_PER_KW;

/// What the installed system is expected to save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEstimate {
    /// kWh produced per month.
    pub monthly_production: f64,
    pub monthly_savings: Money,
    pub annual_savings: Money,
    /// Whole years to recover the quote total; `None` when nothing is saved.
    pub payback_years: Option<i64>,
}

/// Estimates savings for `power_kw` of installed power at the given tariff.
///
/// Payback is the quote total divided by annual savings, rounded up.
pub fn estimate_savings(power_kw: i64, electricity_price: f64, quote_total: Money) -> SavingsEstimate {
    let monthly_production = power_kw as f64 * MONTHLY_YIELD_PER_KW;
    let monthly_savings = Money::round_from_estimate(monthly_production * electricity_price);
    // An estimate, so out-of-range figures clamp rather than fail
    let annual_savings = monthly_savings.saturating_multiply_quantity(12);

    let payback_years = annual_savings.is_positive().then(|| {
        let total = i128::from(quote_total.dong().max(0));
        let annual = i128::from(annual_savings.dong());
        ((total + annual - 1) / annual) as i64
    });

    SavingsEstimate {
        monthly_production,
        monthly_savings,
        annual_savings,
        payback_years,
    }
}

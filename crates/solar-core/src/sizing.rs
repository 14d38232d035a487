//! # Consumption & Sizing
//!
//! Turns what the customer told us into the numbers selection needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  monthly bill ─┐                                                        │
//! │                ├─► monthly kWh ──► daily kWh ──► morning / evening kWh  │
//! │  tariff ───────┘        │                              │                │
//! │                         ▼                              ▼                │
//! │              target kWh (× savings %)          battery sizing           │
//! │                         │                                               │
//! │                         ▼                                               │
//! │         required kW = ceil(target / 120)  ──► panel & inverter sizing   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::types::{CustomerInput, CustomerSummary};
use crate::{DAYS_PER_MONTH, DEFAULT_ELECTRICITY_PRICE, MONTHLY_YIELD_PER_KW};

/// Estimated monthly consumption (kWh) from the bill and the tariff.
///
/// No rounding: `1_000_000 / 2500 = 400.0`, `1_000_000 / 3000 = 333.33…`.
pub fn estimate_monthly_consumption(monthly_bill: Money, electricity_price: f64) -> f64 {
    monthly_bill.dong() as f64 / electricity_price
}

/// Daily consumption on a fixed 30-day month.
pub fn daily_consumption(monthly_kwh: f64) -> f64 {
    monthly_kwh / DAYS_PER_MONTH
}

/// kWh per month the system has to offset.
pub fn target_savings(monthly_kwh: f64, savings_percent: u32) -> f64 {
    monthly_kwh * (savings_percent as f64 / 100.0)
}

/// Installed power needed to produce `target_kwh` per month, rounded UP to
/// the next whole kW so the system is never under-provisioned.
///
/// ## Example
/// ```rust
/// use solar_core::sizing::required_power_kw;
///
/// assert_eq!(required_power_kw(200.0), 2);
/// assert_eq!(required_power_kw(240.0), 2);
/// assert_eq!(required_power_kw(240.5), 3);
/// ```
pub fn required_power_kw(target_kwh: f64) -> i64 {
    (target_kwh / MONTHLY_YIELD_PER_KW).ceil() as i64
}

/// Splits daily consumption by the given share (0-100).
pub fn usage_share(daily_kwh: f64, percent: u32) -> f64 {
    daily_kwh * (percent as f64 / 100.0)
}

/// Intermediate result of sizing one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingResult {
    pub customer: CustomerSummary,
    pub power_kw: i64,
}

/// Runs the whole consumption pipeline for one customer.
///
/// A missing or non-positive consumption falls back to the bill estimate,
/// and a missing or non-positive tariff falls back to
/// [`DEFAULT_ELECTRICITY_PRICE`]. The morning/evening split is used as given.
pub fn size_system(input: &CustomerInput) -> SizingResult {
    let electricity_price = input
        .electricity_price
        .filter(|price| *price > 0.0)
        .unwrap_or(DEFAULT_ELECTRICITY_PRICE);

    let monthly = input
        .monthly_consumption
        .filter(|kwh| *kwh > 0.0)
        .unwrap_or_else(|| estimate_monthly_consumption(input.monthly_bill, electricity_price));

    let daily = daily_consumption(monthly);
    let target = target_savings(monthly, input.savings_percent);
    let power_kw = required_power_kw(target);

    SizingResult {
        customer: CustomerSummary {
            name: input.customer_name.clone(),
            phone: input.customer_phone.clone(),
            address: input.customer_address.clone(),
            monthly_bill: input.monthly_bill,
            monthly_consumption: monthly,
            daily_consumption: daily,
            electricity_price,
            savings_percent: input.savings_percent,
            target_savings: target,
            morning_usage: usage_share(daily, input.morning_usage),
            evening_usage: usage_share(daily, input.evening_usage),
        },
        power_kw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bill: i64, savings: u32, morning: u32, evening: u32) -> CustomerInput {
        CustomerInput {
            customer_name: "Tran Thi B".to_string(),
            customer_phone: None,
            customer_address: None,
            monthly_bill: Money::from_dong(bill),
            monthly_consumption: None,
            electricity_price: Some(2500.0),
            savings_percent: savings,
            morning_usage: morning,
            evening_usage: evening,
        }
    }

    #[test]
    fn test_bill_of_one_million_sizes_to_two_kw() {
        let result = size_system(&input(1_000_000, 50, 50, 50));

        assert_eq!(result.customer.monthly_consumption, 400.0);
        assert!((result.customer.daily_consumption - 13.333).abs() < 0.001);
        assert_eq!(result.customer.target_savings, 200.0);
        assert_eq!(result.power_kw, 2);
    }

    #[test]
    fn test_explicit_consumption_wins_over_estimate() {
        let mut customer = input(1_000_000, 100, 50, 50);
        customer.monthly_consumption = Some(600.0);

        let result = size_system(&customer);
        assert_eq!(result.customer.monthly_consumption, 600.0);
        assert_eq!(result.power_kw, 5);
    }

    #[test]
    fn test_missing_tariff_uses_default() {
        let mut customer = input(500_000, 100, 50, 50);
        customer.electricity_price = None;

        let result = size_system(&customer);
        assert_eq!(result.customer.electricity_price, DEFAULT_ELECTRICITY_PRICE);
        assert_eq!(result.customer.monthly_consumption, 200.0);
    }

    #[test]
    fn test_estimate_is_not_rounded() {
        let kwh = estimate_monthly_consumption(Money::from_dong(1_000_000), 3000.0);
        assert!((kwh - 333.333).abs() < 0.001);
    }

    #[test]
    fn test_required_power_always_rounds_up() {
        assert_eq!(required_power_kw(0.0), 0);
        assert_eq!(required_power_kw(0.1), 1);
        assert_eq!(required_power_kw(120.0), 1);
        assert_eq!(required_power_kw(120.01), 2);
    }

    #[test]
    fn test_split_follows_percentages() {
        let result = size_system(&input(1_500_000, 50, 30, 70));
        let daily = result.customer.daily_consumption;

        assert!((result.customer.morning_usage - daily * 0.3).abs() < 1e-9);
        assert!((result.customer.evening_usage - daily * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_unbalanced_split_does_not_cover_daily_consumption() {
        // 60 + 30 = 90: the engine trusts the caller, so 10% goes missing.
        let result = size_system(&input(1_500_000, 50, 60, 30));
        let split = result.customer.morning_usage + result.customer.evening_usage;

        assert!((split - result.customer.daily_consumption).abs() > 1e-6);
        assert!((split - result.customer.daily_consumption * 0.9).abs() < 1e-9);
    }
}

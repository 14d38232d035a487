//! # Sample Catalog
//!
//! A small, realistic catalog for development and first start.
//!
//! Rows are listed in load order. The 450 W panel comes first, and inverters
//! are deliberately NOT sorted by power, so selection order is visible.

use solar_core::{Accessory, Battery, Catalog, Inverter, Money, PvPanel};

/// (code, name, watts, price, brand, warranty years)
const PANELS: &[(&str, &str, u32, i64, &str, u32)] = &[
    ("PV-450-1", "Mono panel 450W Tier 1", 450, 2_500_000, "JinkoSolar", 25),
    ("PV-540-1", "Mono panel 540W Tier 1", 540, 3_200_000, "Longi", 25),
    ("PV-460-2", "Poly panel 460W", 460, 2_200_000, "Canadian Solar", 25),
    ("PV-550-2", "Bifacial panel 550W", 550, 3_500_000, "Trina Solar", 25),
    ("PV-400-3", "Budget mono panel 400W", 400, 1_800_000, "JA Solar", 20),
];

/// (code, name, kWh, price, brand, warranty years)
const BATTERIES: &[(&str, &str, f64, i64, &str, u32)] = &[
    ("BAT-5-1", "Lithium battery 5kWh", 5.0, 45_000_000, "Tesla Powerwall", 10),
    ("BAT-10-1", "Lithium battery 10kWh", 10.0, 85_000_000, "LG Chem", 10),
    ("BAT-13-1", "Lithium battery 13.5kWh", 13.5, 120_000_000, "Tesla Powerwall 2", 10),
    ("BAT-6-2", "Lithium battery 6.5kWh", 6.5, 55_000_000, "BYD", 10),
    ("BAT-15-2", "Lithium battery 15kWh", 15.0, 140_000_000, "Sonnen", 10),
];

/// (code, name, kW, price, brand, warranty years)
const INVERTERS: &[(&str, &str, f64, i64, &str, u32)] = &[
    ("INV-5-1", "Hybrid inverter 5kW", 5.0, 25_000_000, "SolarEdge", 12),
    ("INV-8-1", "Hybrid inverter 8kW", 8.0, 35_000_000, "Fronius", 10),
    ("INV-10-1", "Hybrid inverter 10kW", 10.0, 45_000_000, "Huawei", 10),
    ("INV-3-2", "String inverter 3kW", 3.0, 15_000_000, "SMA", 10),
    ("INV-6-2", "String inverter 6kW", 6.0, 22_000_000, "ABB", 10),
    ("INV-15-1", "Hybrid inverter 15kW", 15.0, 65_000_000, "GoodWe", 10),
];

/// (code, name, unit, price, note)
const ACCESSORIES: &[(&str, &str, &str, i64, &str)] = &[
    ("ACC-MOUNT-1", "Tile roof mounting kit", "set", 500_000, "For 1 panel"),
    ("ACC-MOUNT-2", "Metal roof mounting kit", "set", 400_000, "For 1 panel"),
    ("ACC-CABLE-1", "DC cable 4mm2", "meter", 15_000, "Panel interconnect cable"),
    ("ACC-CABLE-2", "AC cable 6mm2", "meter", 25_000, "AC cable"),
    ("ACC-BREAKER-1", "DC circuit breaker", "piece", 800_000, "63A"),
    ("ACC-BREAKER-2", "AC circuit breaker", "piece", 600_000, "32A"),
    ("ACC-METER-1", "Bidirectional meter", "piece", 3_500_000, "Utility meter"),
    ("ACC-INSTALL-1", "Installation", "kW", 2_000_000, "Per system power"),
];

/// Builds the sample catalog.
pub fn sample_catalog() -> Catalog {
    Catalog {
        pv_panels: PANELS
            .iter()
            .map(|&(code, name, power_w, price, brand, warranty)| PvPanel {
                code: code.to_string(),
                name: name.to_string(),
                power_w,
                price: Money::from_dong(price),
                brand: Some(brand.to_string()),
                warranty,
            })
            .collect(),
        batteries: BATTERIES
            .iter()
            .map(|&(code, name, capacity, price, brand, warranty)| Battery {
                code: code.to_string(),
                name: name.to_string(),
                capacity,
                price: Money::from_dong(price),
                brand: Some(brand.to_string()),
                warranty,
            })
            .collect(),
        inverters: INVERTERS
            .iter()
            .map(|&(code, name, power_kw, price, brand, warranty)| Inverter {
                code: code.to_string(),
                name: name.to_string(),
                power_kw,
                price: Money::from_dong(price),
                brand: Some(brand.to_string()),
                warranty,
            })
            .collect(),
        accessories: ACCESSORIES
            .iter()
            .map(|&(code, name, unit, price, note)| Accessory {
                code: code.to_string(),
                name: name.to_string(),
                unit: unit.to_string(),
                price: Money::from_dong(price),
                note: Some(note.to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_core::selection::ACCESSORY_BILL;
    use solar_core::validation::validate_catalog;
    use solar_core::{CatalogProvider, CustomerInput, QuoteEngine};

    #[test]
    fn test_sample_is_valid_and_complete() {
        let catalog = sample_catalog();
        assert!(validate_catalog(&catalog).is_ok());
        assert_eq!(catalog.pv_panels.len(), 5);
        assert_eq!(catalog.batteries.len(), 5);
        assert_eq!(catalog.inverters.len(), 6);
        assert_eq!(catalog.accessories.len(), 8);

        for rule in ACCESSORY_BILL.iter() {
            assert!(catalog.find_accessory(rule.code).is_some(), "{}", rule.code);
        }
    }

    #[test]
    fn test_sample_quote_for_typical_household() {
        let engine = QuoteEngine::new(sample_catalog());
        let input = CustomerInput {
            customer_name: "Nguyen Van A".into(),
            customer_phone: None,
            customer_address: None,
            monthly_bill: Money::from_dong(1_500_000),
            monthly_consumption: None,
            electricity_price: Some(2500.0),
            savings_percent: 70,
            morning_usage: 40,
            evening_usage: 60,
        };

        // 600 kWh × 70% = 420 kWh → 4 kW
        let result = engine.calculate_system(&input).unwrap();
        assert_eq!(result.system.power_kw, 4);

        let system = &result.system;
        assert_eq!(system.pv.as_ref().unwrap().item.code, "PV-450-1");
        assert_eq!(system.pv.as_ref().unwrap().quantity, 9);
        // Band [4, 4.8] is empty; INV-5-1 is the first >= 4 kW
        assert_eq!(system.inverter.as_ref().unwrap().item.code, "INV-5-1");
        // 20 kWh/day × 60% × 1.2 = 14.4 kWh → BAT-15-2 is the first >= 14.4
        assert_eq!(system.battery.as_ref().unwrap().item.code, "BAT-15-2");
        assert_eq!(system.accessories.len(), 7);
    }
}

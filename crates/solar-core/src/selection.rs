//! # Component Selection
//!
//! Picks concrete catalog items for a sized system.
//!
//! ## First Match, Not Best Match
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Each slot is an ordered chain of predicates. The first predicate that  │
//! │  matches ANY item wins, and within it the first item in catalog order.  │
//! │  When nothing matches, the first catalog item is used.                  │
//! │                                                                         │
//! │  Panel     : power_w == 450                         → first panel       │
//! │  Inverter  : kW in [P, 1.2P]  →  kW >= P            → first inverter    │
//! │  Battery   : kWh >= 1.2 × evening                   → first battery     │
//! │                                                                         │
//! │  Nothing here compares price or efficiency.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::catalog::CatalogProvider;
use crate::error::{CoreError, CoreResult};
use crate::types::{
    AccessorySelection, Battery, BatterySelection, EquipmentCategory, Inverter, InverterSelection,
    PanelSelection, PvPanel, SystemConfiguration,
};
use crate::{BATTERY_BUFFER, INVERTER_HEADROOM, PREFERRED_PANEL_WATTS};

/// Resolves an ordered predicate chain over an ordered slice.
///
/// Returns `None` only when `items` is empty.
pub fn first_match<'a, T>(items: &'a [T], chain: &[&dyn Fn(&T) -> bool]) -> Option<&'a T> {
    chain
        .iter()
        .find_map(|predicate| items.iter().find(|item| predicate(item)))
        .or_else(|| items.first())
}

// =============================================================================
// Accessory Bill of Materials
// =============================================================================

/// How an accessory quantity is derived from the sized system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessoryQuantity {
    /// One per panel.
    PerPanel,
    /// `n` units per panel (cable meters).
    PerPanelTimes(i64),
    /// A fixed amount.
    Fixed(i64),
    /// One per kW of required power (labor priced per kW).
    PerKilowatt,
}

impl AccessoryQuantity {
    /// `None` when the quantity does not fit in an i64.
    pub fn resolve(&self, panel_quantity: i64, power_kw: i64) -> Option<i64> {
        match *self {
            AccessoryQuantity::PerPanel => Some(panel_quantity),
            AccessoryQuantity::PerPanelTimes(n) => panel_quantity.checked_mul(n),
            AccessoryQuantity::Fixed(n) => Some(n),
            AccessoryQuantity::PerKilowatt => Some(power_kw),
        }
    }
}

/// One row of the standard installation kit.
#[derive(Debug, Clone, Copy)]
pub struct AccessoryRule {
    pub code: &'static str,
    pub quantity: AccessoryQuantity,
    pub description: &'static str,
}

/// The standard kit, in quote order.
pub const ACCESSORY_BILL: [AccessoryRule; 7] = [
    AccessoryRule {
        code: "ACC-MOUNT-1",
        quantity: AccessoryQuantity::PerPanel,
        description: "Panel mounting rails",
    },
    AccessoryRule {
        code: "ACC-CABLE-1",
        quantity: AccessoryQuantity::PerPanelTimes(crate::DC_CABLE_METERS_PER_PANEL),
        description: "DC cable between panels",
    },
    AccessoryRule {
        code: "ACC-CABLE-2",
        quantity: AccessoryQuantity::Fixed(crate::AC_CABLE_METERS),
        description: "AC cable",
    },
    AccessoryRule {
        code: "ACC-BREAKER-1",
        quantity: AccessoryQuantity::Fixed(1),
        description: "DC breaker",
    },
    AccessoryRule {
        code: "ACC-BREAKER-2",
        quantity: AccessoryQuantity::Fixed(1),
        description: "AC breaker",
    },
    AccessoryRule {
        code: "ACC-METER-1",
        quantity: AccessoryQuantity::Fixed(1),
        description: "Bidirectional meter",
    },
    AccessoryRule {
        code: "ACC-INSTALL-1",
        quantity: AccessoryQuantity::PerKilowatt,
        description: "Installation labor",
    },
];

// =============================================================================
// Selection
// =============================================================================

/// Selects panel, inverter, battery and the accessory kit.
///
/// ## Errors
/// [`CoreError::NoEligibleEquipment`] when the panel, inverter or battery
/// category is empty. A missing accessory code is not an error: that line is
/// left out and the rest of the kit is kept.
///
/// [`CoreError::AmountOverflow`] when `power_kw` is too large for the panel
/// or cable counts to be represented.
pub fn select_components<C: CatalogProvider + ?Sized>(
    catalog: &C,
    power_kw: i64,
    evening_kwh: f64,
) -> CoreResult<SystemConfiguration> {
    let required_kw = power_kw as f64;

    // Panel
    let panel = first_match(catalog.pv_panels(), &[&|p: &PvPanel| p.power_w == PREFERRED_PANEL_WATTS])
        .ok_or(CoreError::NoEligibleEquipment {
            category: EquipmentCategory::Panel,
        })?;
    // A provider built in code skips catalog validation and may hold a 0 W panel
    let panel_watts = i64::from(panel.power_w).max(1);
    let panel_quantity = power_kw
        .checked_mul(1000)
        .and_then(|watts| watts.checked_add(panel_watts - 1))
        .map(|watts| watts.div_euclid(panel_watts))
        .ok_or(CoreError::AmountOverflow)?;

    // Inverter
    let inverter = first_match(
        catalog.inverters(),
        &[
            &|i: &Inverter| {
                i.power_kw >= required_kw && i.power_kw <= required_kw * INVERTER_HEADROOM
            },
            &|i: &Inverter| i.power_kw >= required_kw,
        ],
    )
    .ok_or(CoreError::NoEligibleEquipment {
        category: EquipmentCategory::Inverter,
    })?;

    // Battery
    let capacity_needed = evening_kwh * BATTERY_BUFFER;
    let battery = first_match(catalog.batteries(), &[&|b: &Battery| b.capacity >= capacity_needed]).ok_or(
        CoreError::NoEligibleEquipment {
            category: EquipmentCategory::Battery,
        },
    )?;
    // At least one unit, even with no evening load
    let battery_quantity = if battery.capacity > 0.0 {
        ((capacity_needed / battery.capacity).ceil() as i64).max(1)
    } else {
        1
    };

    // Accessories: codes missing from the catalog drop out silently
    let accessories = ACCESSORY_BILL
        .iter()
        .filter_map(|rule| catalog.find_accessory(rule.code).map(|item| (rule, item)))
        .map(|(rule, item)| {
            Ok(AccessorySelection {
                item: item.clone(),
                quantity: rule
                    .quantity
                    .resolve(panel_quantity, power_kw)
                    .ok_or(CoreError::AmountOverflow)?,
                description: rule.description.to_string(),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(SystemConfiguration {
        power_kw,
        pv: Some(PanelSelection {
            item: panel.clone(),
            quantity: panel_quantity,
            total_power: panel_power_kw(panel.power_w, panel_quantity),
        }),
        inverter: Some(InverterSelection {
            item: inverter.clone(),
            quantity: 1,
        }),
        battery: Some(BatterySelection {
            item: battery.clone(),
            quantity: battery_quantity,
            total_capacity: battery.capacity * battery_quantity as f64,
        }),
        accessories,
    })
}

/// Installed array power in kW.
pub fn panel_power_kw(power_w: u32, quantity: i64) -> f64 {
    (f64::from(power_w) * quantity as f64) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::money::Money;
    use crate::types::Accessory;

    fn panel(code: &str, watts: u32) -> PvPanel {
        PvPanel {
            code: code.into(),
            name: format!("Panel {}W", watts),
            power_w: watts,
            price: Money::from_dong(2_500_000),
            brand: None,
            warranty: 25,
        }
    }

    fn inverter(code: &str, kw: f64) -> Inverter {
        Inverter {
            code: code.into(),
            name: format!("Inverter {}kW", kw),
            power_kw: kw,
            price: Money::from_dong(20_000_000),
            brand: None,
            warranty: 10,
        }
    }

    fn battery(code: &str, kwh: f64) -> Battery {
        Battery {
            code: code.into(),
            name: format!("Battery {}kWh", kwh),
            capacity: kwh,
            price: Money::from_dong(50_000_000),
            brand: None,
            warranty: 10,
        }
    }

    fn accessory(code: &str) -> Accessory {
        Accessory {
            code: code.into(),
            name: code.into(),
            unit: "piece".into(),
            price: Money::from_dong(100_000),
            note: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            pv_panels: vec![panel("PV-450-1", 450), panel("PV-540-1", 540)],
            inverters: vec![
                inverter("INV-5-1", 5.0),
                inverter("INV-8-1", 8.0),
                inverter("INV-3-2", 3.0),
                inverter("INV-6-2", 6.0),
            ],
            batteries: vec![battery("BAT-5-1", 5.0), battery("BAT-10-1", 10.0)],
            accessories: ACCESSORY_BILL.iter().map(|r| accessory(r.code)).collect(),
        }
    }

    #[test]
    fn test_prefers_450w_panel() {
        let config = select_components(&catalog(), 2, 5.0).unwrap();
        let pv = config.pv.unwrap();

        assert_eq!(pv.item.code, "PV-450-1");
        assert_eq!(pv.quantity, 5); // ceil(2000 / 450)
        assert!((pv.total_power - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_panel_falls_back_to_first_in_catalog_order() {
        let mut catalog = catalog();
        catalog.pv_panels = vec![panel("PV-540-1", 540), panel("PV-400-3", 400)];

        let pv = select_components(&catalog, 3, 5.0).unwrap().pv.unwrap();
        assert_eq!(pv.item.code, "PV-540-1");
        assert_eq!(pv.quantity, 6); // ceil(3000 / 540)
    }

    #[test]
    fn test_inverter_prefers_headroom_band() {
        // Band for 5 kW is [5, 6]: INV-5-1 is first in it.
        let config = select_components(&catalog(), 5, 5.0).unwrap();
        assert_eq!(config.inverter.unwrap().item.code, "INV-5-1");

        // Band for 3 kW is [3, 3.6]: INV-3-2, although INV-5-1 comes first.
        let config = select_components(&catalog(), 3, 5.0).unwrap();
        assert_eq!(config.inverter.unwrap().item.code, "INV-3-2");
    }

    #[test]
    fn test_inverter_falls_back_to_first_large_enough() {
        // Band for 7 kW is [7, 8.4] → INV-8-1. For 4 kW, [4, 4.8] is empty,
        // so the first inverter >= 4 kW wins: INV-5-1.
        let config = select_components(&catalog(), 4, 5.0).unwrap();
        assert_eq!(config.inverter.unwrap().item.code, "INV-5-1");
    }

    #[test]
    fn test_inverter_falls_back_to_first_when_nothing_fits() {
        let config = select_components(&catalog(), 20, 5.0).unwrap();
        let inverter = config.inverter.unwrap();
        assert_eq!(inverter.item.code, "INV-5-1");
        assert_eq!(inverter.quantity, 1);
    }

    #[test]
    fn test_battery_sized_with_buffer() {
        // 5 kWh evening → 6 kWh needed → BAT-10-1 is the first >= 6
        let battery = select_components(&catalog(), 2, 5.0).unwrap().battery.unwrap();
        assert_eq!(battery.item.code, "BAT-10-1");
        assert_eq!(battery.quantity, 1);
        assert_eq!(battery.total_capacity, 10.0);
    }

    #[test]
    fn test_battery_stacks_first_unit_when_none_is_big_enough() {
        // 20 kWh evening → 24 kWh needed → fallback BAT-5-1 × ceil(24 / 5) = 5
        let battery = select_components(&catalog(), 2, 20.0).unwrap().battery.unwrap();
        assert_eq!(battery.item.code, "BAT-5-1");
        assert_eq!(battery.quantity, 5);
        assert_eq!(battery.total_capacity, 25.0);
    }

    #[test]
    fn test_no_evening_load_still_gets_one_battery() {
        let battery = select_components(&catalog(), 2, 0.0).unwrap().battery.unwrap();
        assert_eq!(battery.item.code, "BAT-5-1");
        assert_eq!(battery.quantity, 1);
    }

    #[test]
    fn test_accessory_quantities() {
        let config = select_components(&catalog(), 2, 5.0).unwrap();
        let quantities: Vec<(&str, i64)> = config
            .accessories
            .iter()
            .map(|a| (a.item.code.as_str(), a.quantity))
            .collect();

        assert_eq!(
            quantities,
            vec![
                ("ACC-MOUNT-1", 5),
                ("ACC-CABLE-1", 25),
                ("ACC-CABLE-2", 50),
                ("ACC-BREAKER-1", 1),
                ("ACC-BREAKER-2", 1),
                ("ACC-METER-1", 1),
                ("ACC-INSTALL-1", 2),
            ]
        );
    }

    #[test]
    fn test_missing_accessory_is_omitted() {
        let mut catalog = catalog();
        catalog.accessories.retain(|a| a.code != "ACC-METER-1");

        let config = select_components(&catalog, 2, 5.0).unwrap();
        assert_eq!(config.accessories.len(), 6);
        assert!(config.accessories.iter().all(|a| a.item.code != "ACC-METER-1"));
    }

    #[test]
    fn test_empty_category_is_an_error() {
        let mut catalog = catalog();
        catalog.batteries.clear();

        let err = select_components(&catalog, 2, 5.0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoEligibleEquipment {
                category: EquipmentCategory::Battery
            }
        ));

        let err = select_components(&Catalog::default(), 2, 5.0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoEligibleEquipment {
                category: EquipmentCategory::Panel
            }
        ));
    }

    #[test]
    fn test_quantities_positive_for_positive_power() {
        let catalog = catalog();
        for power_kw in 1..=25 {
            for evening in [0.5, 3.0, 7.5, 18.0, 40.0] {
                let config = select_components(&catalog, power_kw, evening).unwrap();
                assert!(config.pv.as_ref().unwrap().quantity > 0);
                assert!(config.inverter.as_ref().unwrap().quantity > 0);
                assert!(config.battery.as_ref().unwrap().quantity > 0);
            }
        }
    }

    #[test]
    fn test_unrepresentable_power_is_an_error() {
        let err = select_components(&catalog(), i64::MAX, 5.0).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));

        // With 1 W panels the panel count fits, DC cable meters (5 per panel) do not.
        let mut catalog = catalog();
        catalog.pv_panels = vec![panel("PV-1", 1)];
        let err = select_components(&catalog, i64::MAX / 1000, 5.0).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
    }

    #[test]
    fn test_zero_watt_panel_from_unvalidated_provider_does_not_panic() {
        let mut catalog = catalog();
        catalog.pv_panels = vec![panel("PV-0", 0)];

        let pv = select_components(&catalog, 2, 5.0).unwrap().pv.unwrap();
        assert_eq!(pv.item.code, "PV-0");
        assert_eq!(pv.quantity, 2000);
    }

    #[test]
    fn test_first_match_chain_order() {
        let items = [1, 7, 3, 9];
        let over_five = |x: &i32| *x > 5;
        let odd = |x: &i32| x % 2 == 1;

        assert_eq!(first_match(&items, &[&over_five, &odd]), Some(&7));
        assert_eq!(first_match(&items, &[&|x: &i32| *x > 100]), Some(&1));
        assert_eq!(first_match::<i32>(&[], &[&odd]), None);
    }
}

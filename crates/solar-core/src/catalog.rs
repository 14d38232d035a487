//! # Catalog Provider
//!
//! The read-only equipment source the quote engine is built on.
//!
//! ## Ordering Is Part of the Contract
//! Every selection rule resolves to the FIRST item, in catalog order, that
//! satisfies it. Two catalogs with the same items in a different order can
//! produce different quotes, so providers must hand out items in load order
//! and keep that order stable between loads.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  solar-catalog (files, uploads, sample data)                            │
//! │        │                                                                │
//! │        ▼  Arc<Catalog> snapshot                                         │
//! │  CatalogProvider ──► QuoteEngine::new(provider)                         │
//! │        │                                                                │
//! │        ├── pv_panels() / inverters() / batteries() / accessories()      │
//! │        └── find_*(code)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::types::{Accessory, Battery, Inverter, PvPanel};

/// Source of priced equipment, queried by category and code.
///
/// Only the four ordered slices are required; code lookups default to a
/// linear scan, which is fine for catalogs of a few dozen rows.
pub trait CatalogProvider {
    fn pv_panels(&self) -> &[PvPanel];
    fn inverters(&self) -> &[Inverter];
    fn batteries(&self) -> &[Battery];
    fn accessories(&self) -> &[Accessory];

    fn find_panel(&self, code: &str) -> Option<&PvPanel> {
        self.pv_panels().iter().find(|p| p.code == code)
    }

    fn find_inverter(&self, code: &str) -> Option<&Inverter> {
        self.inverters().iter().find(|i| i.code == code)
    }

    fn find_battery(&self, code: &str) -> Option<&Battery> {
        self.batteries().iter().find(|b| b.code == code)
    }

    fn find_accessory(&self, code: &str) -> Option<&Accessory> {
        self.accessories().iter().find(|a| a.code == code)
    }
}

/// An in-memory catalog. Field order mirrors the catalog file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub pv_panels: Vec<PvPanel>,
    #[serde(default)]
    pub batteries: Vec<Battery>,
    #[serde(default)]
    pub inverters: Vec<Inverter>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
}

impl Catalog {
    /// Total number of rows across all categories.
    pub fn len(&self) -> usize {
        self.pv_panels.len() + self.batteries.len() + self.inverters.len() + self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CatalogProvider for Catalog {
    fn pv_panels(&self) -> &[PvPanel] {
        &self.pv_panels
    }

    fn inverters(&self) -> &[Inverter] {
        &self.inverters
    }

    fn batteries(&self) -> &[Battery] {
        &self.batteries
    }

    fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for &T {
    fn pv_panels(&self) -> &[PvPanel] {
        (**self).pv_panels()
    }

    fn inverters(&self) -> &[Inverter] {
        (**self).inverters()
    }

    fn batteries(&self) -> &[Battery] {
        (**self).batteries()
    }

    fn accessories(&self) -> &[Accessory] {
        (**self).accessories()
    }
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for Arc<T> {
    fn pv_panels(&self) -> &[PvPanel] {
        (**self).pv_panels()
    }

    fn inverters(&self) -> &[Inverter] {
        (**self).inverters()
    }

    fn batteries(&self) -> &[Battery] {
        (**self).batteries()
    }

    fn accessories(&self) -> &[Accessory] {
        (**self).accessories()
    }
}

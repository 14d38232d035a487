//! # Catalog Files
//!
//! Reading and writing the JSON catalog document.
//!
//! ## File Layout
//! ```text
//! {
//!   "pvPanels":    [ { "code", "name", "powerW", "price", "brand", "warranty" } ],
//!   "batteries":   [ { "code", "name", "capacity", "price", "brand", "warranty" } ],
//!   "inverters":   [ { "code", "name", "powerKW", "price", "brand", "warranty" } ],
//!   "accessories": [ { "code", "name", "unit", "price", "note" } ]
//! }
//! ```
//! Array order is load order, and load order decides selection.

use std::path::Path;

use solar_core::validation::validate_catalog;
use solar_core::Catalog;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// Parses and validates a catalog document.
pub fn parse_catalog(bytes: &[u8]) -> CatalogResult<Catalog> {
    let catalog: Catalog = serde_json::from_slice(bytes).map_err(CatalogError::Parse)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Serializes a catalog as pretty JSON.
pub fn render_catalog(catalog: &Catalog) -> CatalogResult<Vec<u8>> {
    serde_json::to_vec_pretty(catalog).map_err(CatalogError::Serialize)
}

/// Reads, parses and validates the catalog at `path`.
pub async fn read_catalog(path: &Path) -> CatalogResult<Catalog> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    let catalog = parse_catalog(&bytes)?;

    debug!(
        path = %path.display(),
        panels = catalog.pv_panels.len(),
        inverters = catalog.inverters.len(),
        batteries = catalog.batteries.len(),
        accessories = catalog.accessories.len(),
        "Catalog read"
    );
    Ok(catalog)
}

/// Writes `bytes` to `path` through a sibling temp file and a rename, so a
/// reader never sees a half-written catalog.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> CatalogResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| CatalogError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    Ok(())
}

/// Writes `catalog` to `path`.
pub async fn write_catalog(path: &Path, catalog: &Catalog) -> CatalogResult<()> {
    let bytes = render_catalog(catalog)?;
    write_atomic(path, &bytes).await
}

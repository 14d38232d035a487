//! # Catalog Store
//!
//! Holds the live catalog and swaps it when an operator uploads a new one.
//!
//! ## Snapshot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CatalogStore                                    │
//! │                                                                         │
//! │  RwLock<Arc<Catalog>>                                                   │
//! │       │                                                                 │
//! │       ├── snapshot()  ──► Arc<Catalog>   (cheap clone, read lock only)  │
//! │       │                   QuoteEngine::new(snapshot) for one request    │
//! │       │                                                                 │
//! │       └── replace_from_bytes(upload)                                    │
//! │              1. parse + validate        (old catalog still live)        │
//! │              2. write uploaded_<ms>.json                                │
//! │              3. swap the Arc            (write lock held for the swap)  │
//! │                                                                         │
//! │  A request that took a snapshot keeps pricing against it even if an    │
//! │  upload lands mid-request.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use solar_core::Catalog;
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::sample::sample_catalog;
use crate::source::{parse_catalog, read_catalog, render_catalog, write_atomic, write_catalog};

// =============================================================================
// Configuration
// =============================================================================

/// Where catalogs live on disk.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data/catalog.json")
///     .upload_dir("./data/uploads")
///     .seed_if_missing(true);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Catalog loaded at startup.
    pub catalog_path: PathBuf,

    /// Directory receiving `uploaded_<millis>.json` files.
    /// Default: the catalog file's directory
    pub upload_dir: PathBuf,

    /// Write the sample catalog when `catalog_path` does not exist.
    /// Default: true
    pub seed_if_missing: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let catalog_path = path.into();
        let upload_dir = catalog_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        StoreConfig {
            catalog_path,
            upload_dir,
            seed_if_missing: true,
        }
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    pub fn seed_if_missing(mut self, seed: bool) -> Self {
        self.seed_if_missing = seed;
        self
    }
}

/// What an accepted upload produced.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Where the upload was persisted.
    pub path: PathBuf,
    /// Row count across all categories.
    pub items: usize,
}

// =============================================================================
// Store
// =============================================================================

/// The live, replaceable catalog.
#[derive(Debug)]
pub struct CatalogStore {
    config: StoreConfig,
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Loads the catalog at `config.catalog_path`, writing the sample catalog
    /// there first when the file is missing and seeding is enabled.
    pub async fn open(config: StoreConfig) -> CatalogResult<Self> {
        let exists = tokio::fs::try_exists(&config.catalog_path)
            .await
            .map_err(|e| CatalogError::io(&config.catalog_path, e))?;

        if !exists && config.seed_if_missing {
            warn!(
                path = %config.catalog_path.display(),
                "Catalog file missing, writing sample catalog"
            );
            write_catalog(&config.catalog_path, &sample_catalog()).await?;
        }

        let catalog = read_catalog(&config.catalog_path).await?;
        info!(
            path = %config.catalog_path.display(),
            items = catalog.len(),
            "Catalog loaded"
        );

        Ok(CatalogStore {
            config,
            current: RwLock::new(Arc::new(catalog)),
        })
    }

    /// A store over an in-memory catalog (for testing).
    pub fn in_memory(catalog: Catalog, upload_dir: impl Into<PathBuf>) -> Self {
        let upload_dir = upload_dir.into();
        CatalogStore {
            config: StoreConfig::new(upload_dir.join("catalog.json")).upload_dir(upload_dir),
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The catalog as of now.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates an uploaded catalog, persists it and makes it live.
    ///
    /// On any error the current catalog stays live and nothing is written.
    pub async fn replace_from_bytes(&self, bytes: &[u8]) -> CatalogResult<UploadReceipt> {
        let catalog = parse_catalog(bytes)?;
        let rendered = render_catalog(&catalog)?;

        let path = self
            .config
            .upload_dir
            .join(format!("uploaded_{}.json", Utc::now().timestamp_millis()));
        write_atomic(&path, &rendered).await?;

        let items = catalog.len();
        self.swap(catalog);
        info!(path = %path.display(), items, "Catalog replaced from upload");

        Ok(UploadReceipt { path, items })
    }

    fn swap(&self, catalog: Catalog) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("solar-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_open_seeds_missing_catalog() {
        let dir = temp_dir();
        let config = StoreConfig::new(dir.join("catalog.json"));

        let store = CatalogStore::open(config).await.unwrap();

        assert_eq!(*store.snapshot(), sample_catalog());
        assert!(dir.join("catalog.json").exists());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_open_without_seeding_fails_on_missing_file() {
        let dir = temp_dir();
        let config = StoreConfig::new(dir.join("catalog.json")).seed_if_missing(false);

        let err = CatalogStore::open(config).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[tokio::test]
    async fn test_upload_replaces_and_persists() {
        let dir = temp_dir();
        let store = CatalogStore::in_memory(sample_catalog(), &dir);
        let before = store.snapshot();

        let upload = br#"{"pvPanels":[{"code":"PV-1","name":"Panel","powerW":500,"price":3000000,"warranty":25}]}"#;
        let receipt = store.replace_from_bytes(upload).await.unwrap();

        assert_eq!(receipt.items, 1);
        let name = receipt.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("uploaded_") && name.ends_with(".json"));
        assert!(receipt.path.exists());

        assert_eq!(store.snapshot().pv_panels[0].code, "PV-1");
        // Earlier snapshots are unaffected.
        assert_eq!(before.pv_panels.len(), 5);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_current_catalog() {
        let dir = temp_dir();
        let store = CatalogStore::in_memory(sample_catalog(), &dir);

        assert!(store.replace_from_bytes(b"{ broken").await.is_err());
        assert_eq!(store.snapshot().len(), sample_catalog().len());
        assert!(!dir.exists());
    }
}

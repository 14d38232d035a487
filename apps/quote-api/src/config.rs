//! # Server Configuration
//!
//! Configuration for the quote API server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SOLAR_PORT=8080                                                    │
//! │     SOLAR_CATALOG_PATH=/srv/solar/catalog.json                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $SOLAR_CONFIG, or                                                  │
//! │     ~/.config/solar-quote/solar-quote.toml (Linux)                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:3000, ./data/catalog.json, sample catalog seeded           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [http]
//! bind_addr = "0.0.0.0"
//! port = 3000
//!
//! [catalog]
//! path = "data/catalog.json"
//! upload_dir = "data/uploads"
//! seed_if_missing = true
//!
//! [sessions]
//! ttl_secs = 14400
//! max_sessions = 1000
//!
//! [company]
//! name = "Solar Energy Solutions"
//! slogan = "Green energy for the future"
//! phone = "1900 1234"
//! email = "sales@example.com"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// HTTP Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl HttpSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog file loaded at startup.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// Where uploaded catalogs are kept.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Write the sample catalog when `path` does not exist.
    #[serde(default = "default_true")]
    pub seed_if_missing: bool,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/catalog.json")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_true() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            path: default_catalog_path(),
            upload_dir: default_upload_dir(),
            seed_if_missing: true,
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Limits on stored quote sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Idle time after which a quote session is dropped (seconds).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Sessions kept at most; the oldest is evicted first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_ttl() -> u64 {
    4 * 60 * 60
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            ttl_secs: default_ttl(),
            max_sessions: default_max_sessions(),
        }
    }
}

// =============================================================================
// Company Profile
// =============================================================================

/// Branding printed on quote documents.
///
/// Also accepted per request as `companyInfo`; fields given there override
/// the configured ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slogan: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// `data:` URL of the logo image.
    #[serde(default, alias = "logoBase64", alias = "logoDataUrl")]
    pub logo_data_url: Option<String>,
}

impl CompanyProfile {
    pub const DEFAULT_NAME: &'static str = "Solar Energy Solutions";
    pub const DEFAULT_SLOGAN: &'static str = "Green energy for the future";

    fn defaults() -> Self {
        CompanyProfile {
            name: Some(Self::DEFAULT_NAME.to_string()),
            slogan: Some(Self::DEFAULT_SLOGAN.to_string()),
            ..CompanyProfile::default()
        }
    }

    /// Per-request overrides on top of this profile. Blank fields are ignored.
    pub fn merged_with(&self, overrides: &CompanyProfile) -> CompanyProfile {
        fn pick(over: &Option<String>, base: &Option<String>) -> Option<String> {
            over.as_ref()
                .filter(|v| !v.trim().is_empty())
                .or(base.as_ref())
                .cloned()
        }

        CompanyProfile {
            name: pick(&overrides.name, &self.name),
            slogan: pick(&overrides.slogan, &self.slogan),
            phone: pick(&overrides.phone, &self.phone),
            email: pick(&overrides.email, &self.email),
            address: pick(&overrides.address, &self.address),
            logo_data_url: pick(&overrides.logo_data_url, &self.logo_data_url),
        }
    }

    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(Self::DEFAULT_NAME)
    }

    pub fn display_slogan(&self) -> &str {
        non_blank(&self.slogan).unwrap_or(Self::DEFAULT_SLOGAN)
    }
}

/// The value if present and not blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub sessions: SessionSettings,

    #[serde(default = "CompanyProfile::defaults")]
    pub company: CompanyProfile,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            http: HttpSettings::default(),
            catalog: CatalogSettings::default(),
            sessions: SessionSettings::default(),
            company: CompanyProfile::defaults(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$SOLAR_CONFIG`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("SOLAR_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading server config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("http.bind_addr must not be empty".into()));
        }

        if self.catalog.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("catalog.path must not be empty".into()));
        }

        if self.sessions.ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "sessions.ttl_secs must be greater than 0".into(),
            ));
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "sessions.max_sessions must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("SOLAR_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.http.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("SOLAR_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.http.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid SOLAR_PORT"),
            }
        }

        if let Ok(path) = std::env::var("SOLAR_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = PathBuf::from(path);
        }

        if let Ok(dir) = std::env::var("SOLAR_UPLOAD_DIR") {
            self.catalog.upload_dir = PathBuf::from(dir);
        }

        if let Ok(name) = std::env::var("SOLAR_COMPANY_NAME") {
            self.company.name = Some(name);
        }

        if let Ok(ttl) = std::env::var("SOLAR_SESSION_TTL_SECS") {
            if let Ok(secs) = ttl.parse::<u64>() {
                self.sessions.ttl_secs = secs;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "solar", "solar-quote")
            .map(|dirs| dirs.config_dir().join("solar-quote.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http.bind_address(), "0.0.0.0:3000");
        assert!(config.catalog.seed_if_missing);
        assert_eq!(config.company.display_name(), "Solar Energy Solutions");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig::default();
        config.sessions.ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.sessions.max_sessions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [http]
            port = 8080

            [company]
            name = "Mat Troi Xanh"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.bind_addr, "0.0.0.0");
        assert_eq!(config.catalog.path, PathBuf::from("data/catalog.json"));
        assert_eq!(config.company.display_name(), "Mat Troi Xanh");
        // Missing slogan falls back at display time.
        assert_eq!(config.company.display_slogan(), CompanyProfile::DEFAULT_SLOGAN);
    }

    #[test]
    fn test_company_overrides_skip_blank_fields() {
        let base = ServerConfig::default().company;
        let overrides: CompanyProfile = serde_json::from_str(
            r#"{"name":"  ","phone":"0901 234 567","logoBase64":"data:image/png;base64,AAAA"}"#,
        )
        .unwrap();

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.display_name(), "Solar Energy Solutions");
        assert_eq!(merged.phone.as_deref(), Some("0901 234 567"));
        assert!(merged.logo_data_url.is_some());
    }

    #[test]
    fn test_load_reads_explicit_file() {
        let path = std::env::temp_dir().join(format!("solar-quote-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[catalog]\npath = \"/srv/solar/catalog.json\"\n\n[sessions]\nmax_sessions = 50\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.catalog.path, PathBuf::from("/srv/solar/catalog.json"));
        assert_eq!(config.sessions.max_sessions, 50);

        std::fs::write(&path, "[sessions]\nmax_sessions = 0\n").unwrap();
        assert!(matches!(
            ServerConfig::load(Some(path.clone())),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, "[http\n").unwrap();
        assert!(matches!(
            ServerConfig::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("solar-quote-{}.toml", uuid::Uuid::new_v4()));
        let config = ServerConfig::load(Some(path)).unwrap();
        assert_eq!(config.sessions.max_sessions, SessionSettings::default().max_sessions);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServerConfig::default()).unwrap();
        assert!(toml_str.contains("[http]"));
        assert!(toml_str.contains("[sessions]"));
    }
}

//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MILDAR_PAYMENT_DELAY_MS=3000                                       │
//! │     MILDAR_PERSIST_CART=true                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.mildar.storefront/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     3 second payment delay, persistence off, built-in catalog          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! catalog_path = "/srv/mildar/catalog.json"   # optional
//!
//! [store]
//! name = "Mildar Dairy Farm"
//!
//! [checkout]
//! payment_delay_ms = 3000
//! cancel_on_close = false
//!
//! [persistence]
//! enabled = true
//! path = "/var/lib/mildar/cart.json"            # optional
//! ```

use directories::ProjectDirs;
use mildar_core::catalog::{Catalog, CatalogEntry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{StorefrontError, StorefrontResult};

/// Upper bound for the simulated payment delay.
pub const MAX_PAYMENT_DELAY_MS: u64 = 60_000;

/// File name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

// =============================================================================
// Store Settings
// =============================================================================

/// Shop identity shown in the shell banner.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Mildar Dairy Farm".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

/// Simulated payment behaviour.
///
/// ## Drawer Close During Payment
/// ```text
/// cancel_on_close = false (default)     cancel_on_close = true
/// ─────────────────────────────────     ─────────────────────────────
/// Buy Now → close drawer                Buy Now → close drawer
///    │                                     │
///    ▼ (delay keeps running)               ▼ timer cancelled
/// cart cleared after 3s                 cart kept, back to the form
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSettings {
    /// Delay between "Buy Now" and the cart clearing (milliseconds).
    #[serde(default = "default_payment_delay")]
    pub payment_delay_ms: u64,

    /// Closing the drawer cancels a pending payment.
    #[serde(default)]
    pub cancel_on_close: bool,
}

fn default_payment_delay() -> u64 {
    3000
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            payment_delay_ms: default_payment_delay(),
            cancel_on_close: false,
        }
    }
}

impl CheckoutSettings {
    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }
}

// =============================================================================
// Persistence Settings
// =============================================================================

/// Cart snapshot persistence. Off by default: the cart lives in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistenceSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Snapshot file; the platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PersistenceSettings {
    /// Resolves the snapshot file location.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            ProjectDirs::from("com", "mildar", "storefront")
                .map(|dirs| dirs.data_dir().join("cart.json"))
        })
    }
}

// =============================================================================
// Complete Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontConfig {
    /// JSON catalog file; the built-in dairy catalog when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl StorefrontConfig {
    /// Returns the platform-specific config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mildar", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from file (if present), then env overrides.
    pub fn load(config_path: Option<PathBuf>) -> StorefrontResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
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

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StorefrontResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(StorefrontError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        if self.checkout.payment_delay_ms > MAX_PAYMENT_DELAY_MS {
            return Err(StorefrontError::InvalidConfig(format!(
                "checkout.payment_delay_ms must be at most {}, got {}",
                MAX_PAYMENT_DELAY_MS, self.checkout.payment_delay_ms
            )));
        }

        Ok(())
    }

    /// Builds the product catalog: the JSON file if configured, else the
    /// built-in one.
    pub fn load_catalog(&self) -> StorefrontResult<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog_file(path),
            None => Ok(Catalog::dairy()),
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("MILDAR_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(delay) = std::env::var("MILDAR_PAYMENT_DELAY_MS") {
            match delay.parse() {
                Ok(ms) => self.checkout.payment_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid MILDAR_PAYMENT_DELAY_MS"),
            }
        }

        if let Ok(flag) = std::env::var("MILDAR_CANCEL_ON_CLOSE") {
            match parse_bool(&flag) {
                Some(value) => self.checkout.cancel_on_close = value,
                None => warn!(value = %flag, "Ignoring invalid MILDAR_CANCEL_ON_CLOSE"),
            }
        }

        if let Ok(flag) = std::env::var("MILDAR_PERSIST_CART") {
            match parse_bool(&flag) {
                Some(value) => self.persistence.enabled = value,
                None => warn!(value = %flag, "Ignoring invalid MILDAR_PERSIST_CART"),
            }
        }

        if let Ok(path) = std::env::var("MILDAR_SNAPSHOT_PATH") {
            self.persistence.path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("MILDAR_CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(path));
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn load_catalog_file(path: &Path) -> StorefrontResult<Catalog> {
    info!(?path, "Loading catalog from file");
    let contents = std::fs::read_to_string(path)?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&contents)?;
    Ok(Catalog::from_entries(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    // Environment variables are process-wide; every test that calls `load`
    // holds this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets `MILDAR_*` variables for one test and removes them on drop.
    struct EnvVars {
        names: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
            EnvVars {
                names: vars.iter().map(|(name, _)| *name).collect(),
                _lock: lock,
            }
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for name in &self.names {
                std::env::remove_var(name);
            }
        }
    }

    fn write_config(contents: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("mildar-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.store.name, "Mildar Dairy Farm");
        assert_eq!(config.checkout.payment_delay(), Duration::from_secs(3));
        assert!(!config.checkout.cancel_on_close);
        assert!(!config.persistence.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [checkout]
            cancel_on_close = true
            "#,
        )
        .unwrap();
        assert!(config.checkout.cancel_on_close);
        assert_eq!(config.checkout.payment_delay_ms, 3000);
        assert_eq!(config.store.name, "Mildar Dairy Farm");
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_load_reads_file() {
        let _env = EnvVars::set(&[]);
        let (dir, path) = write_config(
            r#"
            [store]
            name = "Hill Farm"

            [checkout]
            payment_delay_ms = 1500

            [persistence]
            enabled = true
            path = "/tmp/hill/cart.json"
            "#,
        );

        let config = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(config.store.name, "Hill Farm");
        assert_eq!(config.checkout.payment_delay_ms, 1500);
        assert!(config.persistence.enabled);
        assert_eq!(config.persistence.snapshot_path(), Some(PathBuf::from("/tmp/hill/cart.json")));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let _env = EnvVars::set(&[]);
        let path = std::env::temp_dir()
            .join(format!("mildar-config-{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME);

        let config = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(config.checkout.payment_delay_ms, 3000);
        assert!(!config.persistence.enabled);
    }

    #[test]
    fn test_env_overrides_file() {
        let _env = EnvVars::set(&[
            ("MILDAR_STORE_NAME", "Valley Creamery"),
            ("MILDAR_PAYMENT_DELAY_MS", "1200"),
            ("MILDAR_CANCEL_ON_CLOSE", "yes"),
            ("MILDAR_PERSIST_CART", "on"),
            ("MILDAR_SNAPSHOT_PATH", "/tmp/valley/cart.json"),
            ("MILDAR_CATALOG_PATH", "/tmp/valley/catalog.json"),
        ]);
        let (dir, path) = write_config(
            r#"
            [store]
            name = "Hill Farm"

            [checkout]
            payment_delay_ms = 5000
            cancel_on_close = false
            "#,
        );

        let config = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(config.store.name, "Valley Creamery");
        assert_eq!(config.checkout.payment_delay_ms, 1200);
        assert!(config.checkout.cancel_on_close);
        assert!(config.persistence.enabled);
        assert_eq!(config.persistence.path, Some(PathBuf::from("/tmp/valley/cart.json")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/valley/catalog.json")));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let _env = EnvVars::set(&[
            ("MILDAR_PAYMENT_DELAY_MS", "soon"),
            ("MILDAR_CANCEL_ON_CLOSE", "perhaps"),
            ("MILDAR_PERSIST_CART", "maybe"),
        ]);
        let (dir, path) = write_config(
            r#"
            [checkout]
            payment_delay_ms = 2000
            cancel_on_close = true

            [persistence]
            enabled = true
            "#,
        );

        let config = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(config.checkout.payment_delay_ms, 2000);
        assert!(config.checkout.cancel_on_close);
        assert!(config.persistence.enabled);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let _env = EnvVars::set(&[]);

        let (dir, path) = write_config("[checkout]\npayment_delay_ms = 999999\n");
        assert!(matches!(
            StorefrontConfig::load(Some(path.clone())),
            Err(StorefrontError::InvalidConfig(_))
        ));
        assert_eq!(StorefrontConfig::load_or_default(Some(path)).checkout.payment_delay_ms, 3000);
        std::fs::remove_dir_all(dir).unwrap();

        let (dir, path) = write_config("[checkout\npayment_delay_ms = ");
        assert!(matches!(
            StorefrontConfig::load(Some(path.clone())),
            Err(StorefrontError::TomlParse(_))
        ));
        let config = StorefrontConfig::load_or_default(Some(path));
        assert_eq!(config.checkout.payment_delay_ms, 3000);
        assert_eq!(config.store.name, "Mildar Dairy Farm");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_env_can_make_config_invalid() {
        let _env = EnvVars::set(&[("MILDAR_PAYMENT_DELAY_MS", "70000")]);
        let (dir, path) = write_config("");

        assert!(StorefrontConfig::load(Some(path.clone())).is_err());
        assert_eq!(StorefrontConfig::load_or_default(Some(path)).checkout.payment_delay_ms, 3000);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = StorefrontConfig::default();
        config.checkout.payment_delay_ms = MAX_PAYMENT_DELAY_MS + 1;
        assert!(matches!(
            config.validate(),
            Err(StorefrontError::InvalidConfig(_))
        ));

        let mut config = StorefrontConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = std::env::temp_dir().join(format!("mildar-catalog-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":"kefir","name":"Kefir","price":"$3.49","unit":"per bottle"}]"#,
        )
        .unwrap();

        let config = StorefrontConfig {
            catalog_path: Some(path),
            ..StorefrontConfig::default()
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("kefir").unwrap().price.cents(), 349);

        assert_eq!(StorefrontConfig::default().load_catalog().unwrap().len(), 6);
        std::fs::remove_dir_all(dir).unwrap();
    }
}

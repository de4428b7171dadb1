//! Console configuration.
//!
//! Loaded from TOML, with environment overrides for deployment:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000"
//! timeout_ms = 10000
//! fetch_limit = 1000
//!
//! [storage]
//! dir = ".lfpm"
//! namespace = "backoffice"
//!
//! [pagination]
//! page_size = 10
//! on_page_size_change = "clamp"
//!
//! [resources.field_mappings]
//! backend = "local"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::PageSizePolicy;
use crate::store::{BackendKind, StoreError};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_BASE_URL: &str = "LFPM_API_BASE_URL";
/// Environment variable overriding `storage.dir`.
pub const ENV_STORAGE_DIR: &str = "LFPM_STORAGE_DIR";

/// Resources that have no backing endpoint and live in the local store
/// unless configured otherwise.
pub const LOCAL_BY_DEFAULT: &[&str] = &[
    "field_mappings",
    "sync_logs",
    "omnichannel_orders",
    "pick_lists",
];

/// Error type for configuration loading and store selection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("resource {0} is configured as remote but no [api] section is present")]
    MissingApi(String),

    #[error("resource {0} is configured as remote but the `http` feature is disabled")]
    HttpDisabled(String),

    #[error("failed to open record store: {0}")]
    Store(#[from] StoreError),
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// REST backend. Without it every resource is local.
    pub api: Option<ApiConfig>,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
    /// Per-resource overrides, keyed by resource name.
    pub resources: BTreeMap<String, ResourceConfig>,
}

/// REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// `take` used when loading a resource's list
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_timeout_ms(),
            fetch_limit: default_fetch_limit(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_fetch_limit() -> usize {
    1_000
}

/// Local persisted store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    /// Prefix of every storage key
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".lfpm"),
            namespace: "backoffice".to_string(),
        }
    }
}

/// List page defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: usize,
    pub on_page_size_change: PageSizePolicy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            on_page_size_change: PageSizePolicy::Clamp,
        }
    }
}

/// Per-resource settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub backend: BackendKind,
}

impl ConsoleConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            match &mut self.api {
                Some(api) => api.base_url = url,
                None => self.api = Some(ApiConfig::new(url)),
            }
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.page_size == 0 {
            return Err(ConfigError::Invalid("pagination.page_size must be at least 1".into()));
        }
        if let Some(api) = &self.api {
            if api.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
            }
            if api.fetch_limit == 0 {
                return Err(ConfigError::Invalid("api.fetch_limit must be at least 1".into()));
            }
        }
        if self.storage.namespace.is_empty() {
            return Err(ConfigError::Invalid("storage.namespace must not be empty".into()));
        }
        Ok(())
    }

    /// The backend a resource should use.
    ///
    /// An explicit `[resources.<name>]` entry wins. Otherwise resources in
    /// [`LOCAL_BY_DEFAULT`] are local, and everything else is remote when an
    /// `[api]` section exists.
    pub fn backend_for(&self, resource: &str) -> BackendKind {
        if let Some(resource_config) = self.resources.get(resource) {
            return resource_config.backend;
        }
        if self.api.is_some() && !LOCAL_BY_DEFAULT.contains(&resource) {
            BackendKind::Remote
        } else {
            BackendKind::Local
        }
    }

    /// How many records a page loads from its store.
    pub fn fetch_limit(&self) -> Option<usize> {
        self.api.as_ref().map(|api| api.fetch_limit)
    }
}

//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees a [`CacheLayout`]
//! and explicit paths.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `UFO_<SECTION>__<KEY>`, e.g. `UFO_CLIENT__MANAGER`
//! 3. Config file (`--config`, else `<platform config dir>/ufo/config.toml`)
//! 4. Built-in defaults (always present)
//!
//! ```toml
//! [cache]
//! home = "/home/me/.ufo-cli"
//!
//! [client]
//! manager  = "cnpm"
//! registry = "https://registry.npmmirror.com"
//!
//! [custom]
//! node = "/usr/local/bin/node"
//!
//! [templates]
//! catalog = "/etc/ufo/templates.toml"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ufo_adapters::PackageManager;
use ufo_core::domain::CacheLayout;

use crate::error::{CliError, CliResult};

/// Directory under the user's home that holds everything ufo caches.
pub const HOME_DIR_NAME: &str = ".ufo-cli";

/// Subdirectory of the ufo home that is the template cache root.
pub const TEMPLATE_DIR_NAME: &str = "template";

const ENV_PREFIX: &str = "UFO";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub client: ClientConfig,
    pub custom: CustomConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// ufo home; defaults to `~/.ufo-cli`.
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub manager: PackageManager,
    pub registry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    /// Interpreter for custom installers.
    pub node: PathBuf,
}

impl Default for CustomConfig {
    fn default() -> Self {
        Self {
            node: PathBuf::from("node"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// TOML catalog file; the built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from file and environment on top of defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let file = match config_file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| CliError::config("failed to read configuration", e))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| CliError::config("invalid configuration", e))?;
        debug!(?app, "Configuration loaded");
        Ok(app)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.ufo.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "ufo")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".ufo.toml"))
    }

    /// The ufo home directory: `cache.home`, else `~/.ufo-cli`.
    pub fn home(&self) -> CliResult<PathBuf> {
        if let Some(home) = &self.cache.home {
            return Ok(home.clone());
        }
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(HOME_DIR_NAME))
            .ok_or_else(|| CliError::ConfigError {
                message: "could not determine the user's home directory; set cache.home".into(),
                source: None,
            })
    }

    /// Cache layout rooted at `<home>/template`.
    pub fn cache_layout(&self) -> CliResult<CacheLayout> {
        Ok(CacheLayout::new(self.home()?.join(TEMPLATE_DIR_NAME)))
    }
}

/// Load `.env` from the current directory, then from the home directory.
///
/// Variables already set are never overwritten, so the current directory
/// wins over home. Missing files are ignored.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
    if let Some(dirs) = directories::BaseDirs::new() {
        let _ = dotenvy::from_path(dirs.home_dir().join(".env"));
    }
}

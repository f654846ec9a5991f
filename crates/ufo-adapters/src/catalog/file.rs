//! Template catalog read from a TOML file.
//!
//! # Format
//!
//! ```toml
//! [[templates]]
//! name    = "Standard project template"
//! npmName = "jian-test"
//! version = "1.0.0"          # exact, range, or "latest"
//! tag     = ["project"]      # or a single string
//! type    = "normal"         # optional: normal | custom
//! ignore  = ["**/public/**"] # optional
//! ```

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, instrument};

use ufo_core::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::TemplateRecord,
    error::UfoResult,
};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    templates: Vec<TemplateRecord>,
}

/// [`TemplateCatalog`] backed by a TOML file, read on every `list`.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Parse catalog text without touching the filesystem.
    pub fn parse(raw: &str) -> Result<Vec<TemplateRecord>, toml::de::Error> {
        toml::from_str::<CatalogFile>(raw).map(|file| file.templates)
    }
}

impl TemplateCatalog for FileCatalog {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn list(&self) -> UfoResult<Vec<TemplateRecord>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            ApplicationError::CatalogUnavailable {
                reason: format!("failed to read '{}': {e}", self.path.display()),
            }
        })?;

        let records = Self::parse(&raw).map_err(|e| ApplicationError::CatalogUnavailable {
            reason: format!("failed to parse '{}': {e}", self.path.display()),
        })?;
        debug!(count = records.len(), "Loaded template catalog");
        Ok(records)
    }
}

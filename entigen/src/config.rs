//! Configuration management for entigen
//!
//! Settings are loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ENTIGEN_` prefix)
//! 2. `./entigen.toml` in the project root
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # entigen.toml
//! domains_path = "src/Domains"
//! domains_namespace = "Acme\\Domains"
//! app_namespace = "Acme"
//! primary_key = "uuid"
//! template_dir = "stubs"
//! style = "bare"
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entity::EntityStyle;
use crate::error::Result;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "entigen.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ENTIGEN_";

/// Formatting preset for emitted entity classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// Statements terminated with `;`, members separated by a blank line
    #[default]
    Semicolon,
    /// No statement terminator on generated import lines
    Bare,
}

impl StylePreset {
    /// Expand the preset into a full [`EntityStyle`]
    #[must_use]
    pub fn style(self) -> EntityStyle {
        match self {
            Self::Semicolon => EntityStyle::semicolon(),
            Self::Bare => EntityStyle::bare(),
        }
    }
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Directory that receives one sub-directory per domain
    pub domains_path: PathBuf,

    /// Root namespace of the domains directory
    pub domains_namespace: String,

    /// Application root namespace
    pub app_namespace: String,

    /// Primary key column name
    pub primary_key: String,

    /// Project-level template overrides
    pub template_dir: PathBuf,

    /// Output formatting preset
    pub style: StylePreset,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            domains_path: PathBuf::from("app/Domains"),
            domains_namespace: "App\\Domains".to_string(),
            app_namespace: "App".to_string(),
            primary_key: "id".to_string(),
            template_dir: PathBuf::from(".entigen/templates"),
            style: StylePreset::Semicolon,
        }
    }
}

impl GeneratorSettings {
    /// Load settings for the project rooted at `project_root`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the config file or an environment
    /// variable cannot be parsed.
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::extract(&Self::figment(project_root))
    }

    /// Load settings from defaults and the config file only
    ///
    /// `ENTIGEN_*` variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the config file cannot be parsed.
    pub fn load_file(project_root: &Path) -> Result<Self> {
        Self::extract(&Self::file_figment(project_root))
    }

    /// Layered configuration sources, lowest precedence first
    #[must_use]
    pub fn figment(project_root: &Path) -> Figment {
        Self::file_figment(project_root).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Defaults overlaid with the project config file
    #[must_use]
    pub fn file_figment(project_root: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(project_root.join(CONFIG_FILE)))
    }

    fn extract(figment: &Figment) -> Result<Self> {
        let settings: Self = figment.extract()?;
        tracing::debug!(?settings, "loaded generator settings");
        Ok(settings)
    }

    /// Resolve a path setting against the project root
    #[must_use]
    pub fn resolve(&self, project_root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }
}

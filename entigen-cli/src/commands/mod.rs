//! CLI command implementations

pub mod entity;
pub mod templates;

pub use entity::{EntityCommand, EntityOutcome};
pub use templates::{TemplateStatus, TemplatesCommand};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use entigen::{GeneratorSettings, LayeredTemplates};

/// Where commands read settings and template overrides from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Project root holding `entigen.toml`
    pub project_root: PathBuf,
    /// Per-user template overrides, consulted after the project's
    pub user_template_dir: Option<PathBuf>,
    /// Whether `ENTIGEN_*` environment variables override the config file
    pub env_overrides: bool,
}

impl Workspace {
    /// Project at `project_root`, with the user's template directory and
    /// environment overrides
    pub fn from_env(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            user_template_dir: entigen::provider::user_template_dir(),
            env_overrides: true,
        }
    }

    /// Project at `project_root` only: no user templates, no environment
    pub fn isolated(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            user_template_dir: None,
            env_overrides: false,
        }
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.project_root
    }

    /// Load generator settings
    ///
    /// # Errors
    ///
    /// Returns error if the config file or an environment override is invalid.
    pub fn settings(&self) -> Result<GeneratorSettings> {
        let settings = if self.env_overrides {
            GeneratorSettings::load(&self.project_root)
        } else {
            GeneratorSettings::load_file(&self.project_root)
        };
        settings.context("Failed to load configuration")
    }

    /// Project template directory for `settings`
    #[must_use]
    pub fn template_dir(&self, settings: &GeneratorSettings) -> PathBuf {
        settings.resolve(&self.project_root, &settings.template_dir)
    }

    /// Project, user and built-in template layers
    #[must_use]
    pub fn templates(&self, settings: &GeneratorSettings) -> LayeredTemplates {
        LayeredTemplates::standard(self.template_dir(settings), self.user_template_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_workspace() {
        let workspace = Workspace::isolated("/project");
        assert_eq!(workspace.root(), Path::new("/project"));
        assert!(workspace.user_template_dir.is_none());
        assert!(!workspace.env_overrides);
    }

    #[test]
    fn test_template_layers() {
        let mut workspace = Workspace::isolated("/project");
        let settings = GeneratorSettings::default();
        assert_eq!(
            workspace.templates(&settings).labels().collect::<Vec<_>>(),
            ["project", "built-in"]
        );

        workspace.user_template_dir = Some(PathBuf::from("/home/me/.config/entigen/templates"));
        assert_eq!(
            workspace.templates(&settings).labels().collect::<Vec<_>>(),
            ["project", "user", "built-in"]
        );
        assert_eq!(
            workspace.template_dir(&settings),
            PathBuf::from("/project/.entigen/templates")
        );
    }
}

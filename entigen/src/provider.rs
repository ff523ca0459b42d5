//! Template lookup
//!
//! Templates are addressed by a category and a dotted name
//! (`laravel-generator`, `domains.entity`). Generators receive a
//! [`TemplateProvider`] explicitly instead of consulting a global registry.
//!
//! The standard lookup order is:
//! 1. Project overrides in the configured template directory
//! 2. User customizations in `$XDG_CONFIG_HOME/entigen/templates/`
//! 3. Built-in defaults compiled into the binary
//!
//! On disk, `domains.entity` in category `laravel-generator` lives at
//! `<root>/laravel-generator/domains/entity.stub`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Template file extension
pub const TEMPLATE_EXTENSION: &str = "stub";

/// Category of the entity class templates
pub const ENTITY_CATEGORY: &str = "laravel-generator";

/// Category of the API documentation templates
pub const DOCS_CATEGORY: &str = "swagger-generator";

/// Source of template text
pub trait TemplateProvider {
    /// Fetch the template `name` in `category`
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if the provider has no such
    /// template, or [`Error::TemplateRead`] if it exists but cannot be read.
    fn get(&self, category: &str, name: &str) -> Result<String>;
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for &T {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        (**self).get(category, name)
    }
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for Box<T> {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        (**self).get(category, name)
    }
}

/// Relative file path of a template
///
/// ```
/// # use entigen::provider::template_path;
/// # use std::path::PathBuf;
/// assert_eq!(
///     template_path("laravel-generator", "domains.entity"),
///     PathBuf::from("laravel-generator/domains/entity.stub")
/// );
/// ```
#[must_use]
pub fn template_path(category: &str, name: &str) -> PathBuf {
    let mut path = PathBuf::from(category);
    for segment in name.split('.') {
        path.push(segment);
    }
    path.set_extension(TEMPLATE_EXTENSION);
    path
}

/// Get the per-user template directory
///
/// Returns `$XDG_CONFIG_HOME/entigen/templates/` or
/// `~/.config/entigen/templates/` if not set.
#[must_use]
pub fn user_template_dir() -> Option<PathBuf> {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else {
        dirs::home_dir()?.join(".config")
    };
    Some(base.join("entigen").join("templates"))
}

/// A template compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTemplate {
    /// Template category
    pub category: &'static str,
    /// Dotted template name
    pub name: &'static str,
    /// Template text
    pub content: &'static str,
}

/// Every built-in template
pub const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        category: ENTITY_CATEGORY,
        name: "domains.entity",
        content: include_str!("../templates/laravel-generator/domains/entity.stub"),
    },
    BuiltinTemplate {
        category: ENTITY_CATEGORY,
        name: "domains.entity_property",
        content: include_str!("../templates/laravel-generator/domains/entity_property.stub"),
    },
    BuiltinTemplate {
        category: ENTITY_CATEGORY,
        name: "domains.entity_setter",
        content: include_str!("../templates/laravel-generator/domains/entity_setter.stub"),
    },
    BuiltinTemplate {
        category: ENTITY_CATEGORY,
        name: "domains.entity_getter",
        content: include_str!("../templates/laravel-generator/domains/entity_getter.stub"),
    },
    BuiltinTemplate {
        category: DOCS_CATEGORY,
        name: "model_docs.model",
        content: include_str!("../templates/swagger-generator/model_docs/model.stub"),
    },
    BuiltinTemplate {
        category: DOCS_CATEGORY,
        name: "model_docs.property",
        content: include_str!("../templates/swagger-generator/model_docs/property.stub"),
    },
];

/// Built-in default templates
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// Find a built-in template
    #[must_use]
    pub fn lookup(category: &str, name: &str) -> Option<&'static BuiltinTemplate> {
        BUILTIN_TEMPLATES
            .iter()
            .find(|t| t.category == category && t.name == name)
    }

    /// Write every built-in template below `root` for customization
    ///
    /// Existing files are kept unless `overwrite` is set. Returns the paths
    /// that were written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WriteFailed`] if a directory or file cannot be
    /// created.
    pub fn export(root: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for template in BUILTIN_TEMPLATES {
            let path = root.join(template_path(template.category, template.name));
            if path.exists() && !overwrite {
                tracing::debug!(path = %path.display(), "keeping existing template");
                continue;
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| Error::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, template.content).map_err(|source| Error::WriteFailed {
                path: path.clone(),
                source,
            })?;

            written.push(path);
        }

        Ok(written)
    }
}

impl TemplateProvider for EmbeddedTemplates {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        Self::lookup(category, name)
            .map(|t| t.content.to_string())
            .ok_or_else(|| Error::not_found(category, name))
    }
}

/// Templates stored below a directory
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    /// Serve templates from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory templates are read from
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path a template would be read from
    #[must_use]
    pub fn path_for(&self, category: &str, name: &str) -> PathBuf {
        self.root.join(template_path(category, name))
    }

    /// Whether the directory overrides this template
    #[must_use]
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.path_for(category, name).is_file()
    }

    /// All templates present on disk, as `(category, dotted name)` pairs
    ///
    /// Files directly below the root (without a category) are ignored.
    #[must_use]
    pub fn discover(&self) -> Vec<(String, String)> {
        let mut found: Vec<(String, String)> = WalkDir::new(&self.root)
            .min_depth(2)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXTENSION)
            })
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?.with_extension("");
                let mut segments = relative.iter().map(|s| s.to_string_lossy().into_owned());
                let category = segments.next()?;
                let name = segments.collect::<Vec<_>>().join(".");
                Some((category, name))
            })
            .collect();
        found.sort();
        found
    }
}

impl TemplateProvider for DirectoryTemplates {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        let path = self.path_for(category, name);
        if !path.is_file() {
            return Err(Error::not_found(category, name));
        }

        fs::read_to_string(&path).map_err(|source| Error::TemplateRead { path, source })
    }
}

/// Templates held in memory, keyed by category and name
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplates {
    templates: HashMap<(String, String), String>,
}

impl MemoryTemplates {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template
    #[must_use]
    pub fn with(mut self, category: &str, name: &str, content: impl Into<String>) -> Self {
        self.insert(category, name, content);
        self
    }

    /// Add or replace a template
    pub fn insert(&mut self, category: &str, name: &str, content: impl Into<String>) {
        self.templates
            .insert((category.to_string(), name.to_string()), content.into());
    }
}

impl TemplateProvider for MemoryTemplates {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        self.templates
            .get(&(category.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::not_found(category, name))
    }
}

/// One named provider in a [`LayeredTemplates`] stack
struct Layer {
    label: String,
    provider: Box<dyn TemplateProvider + Send + Sync>,
}

/// Providers consulted in order; the first one that has the template wins
///
/// A "not found" from one layer falls through to the next. Any other error
/// (an unreadable override, for instance) stops the lookup.
#[derive(Default)]
pub struct LayeredTemplates {
    layers: Vec<Layer>,
}

impl LayeredTemplates {
    /// Create an empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider with lower precedence than those already added
    #[must_use]
    pub fn layer(
        mut self,
        label: impl Into<String>,
        provider: impl TemplateProvider + Send + Sync + 'static,
    ) -> Self {
        self.layers.push(Layer {
            label: label.into(),
            provider: Box::new(provider),
        });
        self
    }

    /// Project directory, then user directory, then built-ins
    #[must_use]
    pub fn standard(project_dir: impl Into<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        let mut stack = Self::new().layer("project", DirectoryTemplates::new(project_dir));
        if let Some(dir) = user_dir {
            stack = stack.layer("user", DirectoryTemplates::new(dir));
        }
        stack.layer("built-in", EmbeddedTemplates)
    }

    /// Labels of all layers, highest precedence first
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.label.as_str())
    }

    /// Fetch a template along with the label of the layer that served it
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] when no layer has the template,
    /// or the first non-"not found" error raised by a layer.
    pub fn resolve(&self, category: &str, name: &str) -> Result<(&str, String)> {
        for layer in &self.layers {
            match layer.provider.get(category, name) {
                Ok(content) => {
                    tracing::debug!(category, name, layer = %layer.label, "resolved template");
                    return Ok((layer.label.as_str(), content));
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }

        Err(Error::not_found(category, name))
    }
}

impl std::fmt::Debug for LayeredTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredTemplates")
            .field("layers", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

impl TemplateProvider for LayeredTemplates {
    fn get(&self, category: &str, name: &str) -> Result<String> {
        self.resolve(category, name).map(|(_, content)| content)
    }
}

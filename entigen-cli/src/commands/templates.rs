//! Template management commands
//!
//! - `list` - Show every template and the layer that provides it
//! - `init` - Export the built-in templates for customization

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use console::{style, Emoji};
use entigen::provider::BUILTIN_TEMPLATES;
use entigen::{DirectoryTemplates, EmbeddedTemplates, LayeredTemplates};

use super::Workspace;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CUSTOM: Emoji<'_, '_> = Emoji("✨ ", "");
static EXTRA: Emoji<'_, '_> = Emoji("➕ ", "");
static DEFAULT: Emoji<'_, '_> = Emoji("  ", "");

/// Label of the embedded layer
const BUILTIN_LABEL: &str = "built-in";

/// Template management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TemplatesCommand {
    /// List all templates and where each one is loaded from
    List,
    /// Export the built-in templates so they can be customized
    Init {
        /// Target directory (defaults to the configured template_dir)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Overwrite templates that already exist
        #[arg(long)]
        force: bool,
    },
}

/// Where a template is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStatus {
    /// Template category
    pub category: String,
    /// Dotted template name
    pub name: String,
    /// Label of the layer that wins the lookup
    pub layer: String,
    /// Not one of the built-ins
    pub extra: bool,
}

impl TemplatesCommand {
    /// Execute the templates command
    ///
    /// # Errors
    ///
    /// Returns error if configuration cannot be loaded or a template
    /// operation fails.
    pub fn execute(self, workspace: &Workspace) -> Result<()> {
        let settings = workspace.settings()?;
        let project_dir = workspace.template_dir(&settings);

        match self {
            Self::List => list_templates(&project_dir, workspace.user_template_dir.as_deref()),
            Self::Init { dir, force } => {
                let target = dir.map_or(project_dir, |d| settings.resolve(workspace.root(), &d));
                init_templates(&target, force).map(|_| ())
            }
        }
    }
}

/// Resolve every built-in and discovered template against the layer stack
///
/// # Errors
///
/// Returns error if an override exists but cannot be read.
pub fn template_statuses(
    project_dir: &Path,
    user_dir: Option<&Path>,
) -> Result<Vec<TemplateStatus>> {
    let stack = LayeredTemplates::standard(project_dir, user_dir.map(Path::to_path_buf));

    let mut known: Vec<(String, String, bool)> = BUILTIN_TEMPLATES
        .iter()
        .map(|t| (t.category.to_string(), t.name.to_string(), false))
        .collect();

    let dirs = std::iter::once(project_dir).chain(user_dir);
    for dir in dirs {
        for (category, name) in DirectoryTemplates::new(dir).discover() {
            if !known.iter().any(|(c, n, _)| *c == category && *n == name) {
                known.push((category, name, true));
            }
        }
    }

    known
        .into_iter()
        .map(|(category, name, extra)| {
            let (layer, _) = stack
                .resolve(&category, &name)
                .with_context(|| format!("Failed to resolve template {category}/{name}"))?;
            Ok(TemplateStatus {
                layer: layer.to_string(),
                category,
                name,
                extra,
            })
        })
        .collect()
}

fn list_templates(project_dir: &Path, user_dir: Option<&Path>) -> Result<()> {
    println!("{FOLDER}Templates");
    println!();
    println!("  Project: {}", style(project_dir.display()).cyan());
    if let Some(dir) = user_dir {
        println!("  User:    {}", style(dir.display()).cyan());
    }
    println!();

    let statuses = template_statuses(project_dir, user_dir)?;

    let mut by_category: BTreeMap<&str, Vec<&TemplateStatus>> = BTreeMap::new();
    for status in &statuses {
        by_category.entry(status.category.as_str()).or_default().push(status);
    }

    let mut customized = 0;
    for (category, templates) in &by_category {
        println!("  {}", style(category).bold());
        for status in templates {
            if status.extra {
                println!(
                    "    {EXTRA}{} {}",
                    style(&status.name).yellow(),
                    style(format!("({})", status.layer)).dim()
                );
                customized += 1;
            } else if status.layer == BUILTIN_LABEL {
                println!("    {DEFAULT}{}", style(&status.name).dim());
            } else {
                println!(
                    "    {CUSTOM}{} {}",
                    style(&status.name).yellow(),
                    style(format!("({})", status.layer)).dim()
                );
                customized += 1;
            }
        }
        println!();
    }

    println!(
        "  {} customized, {} built-in",
        style(customized).yellow(),
        style(statuses.len() - customized).dim()
    );

    Ok(())
}

fn init_templates(target: &Path, force: bool) -> Result<Vec<PathBuf>> {
    println!("{FOLDER}Exporting built-in templates to {}", style(target.display()).cyan());
    println!();

    let written = EmbeddedTemplates::export(target, force)
        .with_context(|| format!("Failed to export templates to {}", target.display()))?;

    for path in &written {
        let shown = path.strip_prefix(target).unwrap_or(path);
        println!("  {CHECK}{}", style(shown.display()).green());
    }

    let kept = BUILTIN_TEMPLATES.len() - written.len();
    println!();
    println!("{CHECK}Exported {} templates", written.len());
    if kept > 0 {
        println!(
            "  {} existing templates kept (use {} to replace them)",
            style(kept).yellow(),
            style("--force").cyan()
        );
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entigen::provider::{template_path, ENTITY_CATEGORY};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_statuses_default_to_builtin() {
        let project = TempDir::new().unwrap();
        let statuses = template_statuses(project.path(), None).unwrap();

        assert_eq!(statuses.len(), BUILTIN_TEMPLATES.len());
        assert!(statuses.iter().all(|s| s.layer == BUILTIN_LABEL && !s.extra));
    }

    #[test]
    fn test_statuses_report_overrides() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let project_file = project.path().join(template_path(ENTITY_CATEGORY, "domains.entity"));
        fs::create_dir_all(project_file.parent().unwrap()).unwrap();
        fs::write(&project_file, "project").unwrap();

        let user_file = user.path().join(template_path(ENTITY_CATEGORY, "domains.entity_getter"));
        fs::create_dir_all(user_file.parent().unwrap()).unwrap();
        fs::write(&user_file, "user").unwrap();

        let statuses = template_statuses(project.path(), Some(user.path())).unwrap();
        let layer_of = |name: &str| {
            statuses
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.layer.clone())
                .unwrap()
        };

        assert_eq!(layer_of("domains.entity"), "project");
        assert_eq!(layer_of("domains.entity_getter"), "user");
        assert_eq!(layer_of("domains.entity_setter"), BUILTIN_LABEL);
    }

    #[test]
    fn test_statuses_include_extra_templates() {
        let project = TempDir::new().unwrap();
        let extra = project.path().join(template_path(ENTITY_CATEGORY, "domains.value_object"));
        fs::create_dir_all(extra.parent().unwrap()).unwrap();
        fs::write(&extra, "extra").unwrap();

        let statuses = template_statuses(project.path(), None).unwrap();
        let found = statuses.iter().find(|s| s.name == "domains.value_object").unwrap();
        assert!(found.extra);
        assert_eq!(found.layer, "project");
    }

    #[test]
    fn test_init_exports_then_keeps() {
        let temp = TempDir::new().unwrap();

        let first = init_templates(temp.path(), false).unwrap();
        assert_eq!(first.len(), BUILTIN_TEMPLATES.len());

        let second = init_templates(temp.path(), false).unwrap();
        assert!(second.is_empty());

        let forced = init_templates(temp.path(), true).unwrap();
        assert_eq!(forced.len(), BUILTIN_TEMPLATES.len());
    }

    #[test]
    fn test_init_command_uses_template_dir() {
        let temp = TempDir::new().unwrap();
        TemplatesCommand::Init { dir: None, force: false }
            .execute(&Workspace::isolated(temp.path()))
            .unwrap();

        let expected = temp
            .path()
            .join(".entigen/templates")
            .join(template_path(ENTITY_CATEGORY, "domains.entity"));
        assert!(expected.is_file());
    }
}

//! Entity class generation
//!
//! ```bash
//! entigen entity Post \
//!   title:string \
//!   views:integer:int32 \
//!   published_at:string:date-time
//! ```
//!
//! The class lands in `<domains_path>/Post/PostEntity.php`. An existing file
//! that differs is shown as a diff and only replaced after confirmation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::Confirm;
use entigen::{EntityGenerator, FieldDescriptor, GeneratedFile};
use similar::TextDiff;

use super::Workspace;
use crate::StyleArg;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static SKIP: Emoji<'_, '_> = Emoji("⏭  ", "");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// `entigen entity` arguments
#[derive(Debug, Clone, Default)]
pub struct EntityCommand {
    /// Model name
    pub model: String,
    /// Inline `name:type[:format]` field definitions
    pub fields: Vec<String>,
    /// JSON file with additional field definitions
    pub fields_file: Option<PathBuf>,
    /// Table name override
    pub table: Option<String>,
    /// Style override
    pub style: Option<StyleArg>,
    /// Root the file is written below
    pub output: Option<PathBuf>,
    /// Print instead of writing
    pub dry_run: bool,
    /// Overwrite without asking
    pub force: bool,
}

/// What happened to the generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Rendered to stdout only
    Printed,
    /// Written to disk
    Written(PathBuf),
    /// Existing file already had identical content
    Unchanged(PathBuf),
    /// The user declined to overwrite
    Skipped(PathBuf),
}

impl EntityCommand {
    /// Generate the entity, asking on the terminal before replacing a file
    ///
    /// # Errors
    ///
    /// Returns error if configuration, field definitions or templates are
    /// invalid, or the file cannot be written.
    pub fn execute(&self, workspace: &Workspace) -> Result<EntityOutcome> {
        self.execute_with(workspace, confirm_overwrite)
    }

    /// Generate the entity, calling `confirm` before replacing a file that
    /// differs
    ///
    /// `confirm` is not called with `--force`, for new files, or when the
    /// content is unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if configuration, field definitions or templates are
    /// invalid, `confirm` fails, or the file cannot be written.
    pub fn execute_with<F>(&self, workspace: &Workspace, confirm: F) -> Result<EntityOutcome>
    where
        F: FnOnce(&Path) -> Result<bool>,
    {
        println!(
            "\n{} {} {}",
            style("Generating entity for").cyan().bold(),
            style(&self.model).green().bold(),
            style("...").cyan().bold()
        );

        let file = self.render(workspace)?;

        if self.dry_run {
            println!("\n{} {}\n", style("Would write").yellow().bold(), style(file.path.display()).dim());
            println!("{}", file.content);
            return Ok(EntityOutcome::Printed);
        }

        let output_root = self.output.as_deref().unwrap_or_else(|| workspace.root());
        let target = output_root.join(&file.path);

        if target.exists() {
            let existing = fs::read_to_string(&target)
                .with_context(|| format!("Failed to read existing file: {}", target.display()))?;

            if existing == file.content {
                println!("  {CHECK}{} (unchanged)", style(file.path.display()).dim());
                return Ok(EntityOutcome::Unchanged(target));
            }

            print_diff(&unified_diff(&file.path.display().to_string(), &existing, &file.content));

            if !self.force && !confirm(&target)? {
                println!("  {SKIP}{}", style(file.path.display()).dim());
                return Ok(EntityOutcome::Skipped(target));
            }
        }

        let written = file
            .write(output_root)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;

        println!(
            "  {CHECK}{} ({})",
            style(file.path.display()).dim(),
            style(&file.description).dim()
        );
        println!(
            "\n{SPARKLE}Entity for {} is ready!",
            style(&self.model).green().bold()
        );

        Ok(EntityOutcome::Written(written))
    }

    /// Render the entity without touching the filesystem
    ///
    /// # Errors
    ///
    /// Returns error if configuration, field definitions or templates are
    /// invalid.
    pub fn render(&self, workspace: &Workspace) -> Result<GeneratedFile> {
        let mut settings = workspace.settings()?;
        if let Some(style) = self.style {
            settings.style = style.into();
        }

        let fields = self.collect_fields()?;

        let templates = workspace.templates(&settings);
        tracing::debug!(?templates, "template layers");

        let mut generator = EntityGenerator::new(&self.model, fields, settings, templates)
            .context("Failed to create entity generator")?;
        if let Some(table) = &self.table {
            generator = generator.with_table(table);
        }

        generator.generate().context("Failed to generate entity")
    }

    /// Inline definitions first, then the fields file
    fn collect_fields(&self) -> Result<Vec<FieldDescriptor>> {
        let mut fields =
            FieldDescriptor::parse_all(&self.fields).context("Invalid field definition")?;

        if let Some(path) = &self.fields_file {
            let from_file = FieldDescriptor::load_json(path)
                .with_context(|| format!("Failed to load fields from {}", path.display()))?;
            fields.extend(from_file);
            FieldDescriptor::ensure_unique(&fields).context("Invalid field definition")?;
        }

        Ok(fields)
    }
}

/// Unified diff from the file on disk to the newly rendered content
#[must_use]
pub fn unified_diff(label: &str, existing: &str, generated: &str) -> String {
    TextDiff::from_lines(existing, generated)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

fn print_diff(diff: &str) {
    println!();
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", style(line).bold());
        } else if line.starts_with('+') {
            println!("{}", style(line).green());
        } else if line.starts_with('-') {
            println!("{}", style(line).red());
        } else if line.starts_with("@@") {
            println!("{}", style(line).cyan());
        } else {
            println!("{line}");
        }
    }
    println!();
}

fn confirm_overwrite(target: &Path) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Overwrite {}?", target.display()))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

//! Domain entity class generator
//!
//! Fills the `laravel-generator/domains.entity` template in successive
//! passes, one concern per pass:
//!
//! 1. Whole-document variables (`$MODEL_NAME$`, `$TABLE_NAME$`, ...)
//! 2. `$ENTITY_NAMESPACE$`
//! 3. `$IMPORT_DOMAIN_STUFF$` - factory and collection imports
//! 4. `$DOCS$` - API documentation block for the class
//! 5. `$ENTITY_NAME$`
//! 6. `$PROPERTIES$` - one documented property per field
//! 7. `$SETTERS$` and 8. `$GETTERS$` - accessors per field
//! 9. `$PROPERTY_CASTS$` - `toArray()` entries
//!
//! Per-field sections render a sub-template once per field and join the
//! fragments with the separators of the active [`EntityStyle`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorSettings;
use crate::error::{Error, Result};
use crate::field::FieldDescriptor;
use crate::filler::{fill, fill_each, TokenMap, SENTINEL};
use crate::naming::{ModelNames, NameHelpers};
use crate::provider::{TemplateProvider, DOCS_CATEGORY, ENTITY_CATEGORY};

/// Formatting choices for emitted entity classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStyle {
    /// Appended to each generated import line
    pub statement_terminator: String,
    /// Between rendered properties and accessor methods
    pub member_separator: String,
    /// Between `toArray()` entries
    pub list_separator: String,
    /// Appended to the model name to form the class name
    pub entity_suffix: String,
}

impl EntityStyle {
    /// `use ...;` imports, blank line between members
    #[must_use]
    pub fn semicolon() -> Self {
        Self {
            statement_terminator: ";".to_string(),
            member_separator: "\n\n".to_string(),
            list_separator: format!("\n{}", " ".repeat(12)),
            entity_suffix: "Entity".to_string(),
        }
    }

    /// Same layout as [`EntityStyle::semicolon`] without import terminators
    #[must_use]
    pub fn bare() -> Self {
        Self {
            statement_terminator: String::new(),
            ..Self::semicolon()
        }
    }
}

impl Default for EntityStyle {
    fn default() -> Self {
        Self::semicolon()
    }
}

/// Represents a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

impl GeneratedFile {
    /// Write the file below `root`, creating parent directories
    ///
    /// A single attempt is made; existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WriteFailed`] on any I/O failure.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let full_path = root.join(&self.path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&full_path, &self.content).map_err(|source| Error::WriteFailed {
            path: full_path.clone(),
            source,
        })?;

        tracing::info!(path = %full_path.display(), bytes = self.content.len(), "wrote file");
        Ok(full_path)
    }
}

/// Entity class generator
pub struct EntityGenerator<P> {
    names: ModelNames,
    fields: Vec<FieldDescriptor>,
    settings: GeneratorSettings,
    style: EntityStyle,
    templates: P,
}

impl<P: TemplateProvider> EntityGenerator<P> {
    /// Create a new entity generator
    ///
    /// The style defaults to the preset named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model name is not `PascalCase` or no fields
    /// are given.
    pub fn new(
        model: &str,
        fields: Vec<FieldDescriptor>,
        settings: GeneratorSettings,
        templates: P,
    ) -> Result<Self> {
        if !NameHelpers::is_pascal_case(model) {
            return Err(Error::InvalidModelName(model.to_string()));
        }

        if fields.is_empty() {
            return Err(Error::NoFields);
        }

        Ok(Self {
            names: ModelNames::new(model, None),
            fields,
            style: settings.style.style(),
            settings,
            templates,
        })
    }

    /// Override the derived table name
    #[must_use]
    pub fn with_table(mut self, table: &str) -> Self {
        self.names = ModelNames::new(&self.names.name, Some(table));
        self
    }

    /// Override the formatting style
    #[must_use]
    pub fn with_style(mut self, style: EntityStyle) -> Self {
        self.style = style;
        self
    }

    /// Names derived from the model
    #[must_use]
    pub const fn names(&self) -> &ModelNames {
        &self.names
    }

    /// Entity class name (`PostEntity`)
    #[must_use]
    pub fn entity_name(&self) -> String {
        format!("{}{}", self.names.name, self.style.entity_suffix)
    }

    /// Namespace of the domain (`App\Domains\Post`)
    #[must_use]
    pub fn entity_namespace(&self) -> String {
        NameHelpers::join_namespace(&[
            self.settings.domains_namespace.as_str(),
            self.names.name.as_str(),
        ])
    }

    /// Output path relative to the project root
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.settings
            .domains_path
            .join(&self.names.name)
            .join(format!("{}.php", self.entity_name()))
    }

    /// Render the entity class
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] or [`Error::TemplateRead`] if a
    /// template cannot be loaded, and [`Error::SentinelInValue`] if a value
    /// filled in an early pass could be picked up by a later one.
    pub fn generate(&self) -> Result<GeneratedFile> {
        self.check_literals()?;

        let variables = self.names.variables(&self.settings)?;
        let template = self.template(ENTITY_CATEGORY, "domains.entity")?;

        let content = self.pass("variables", &template, &variables);
        let content = self.pass(
            "namespace",
            &content,
            &TokenMap::new().with("$ENTITY_NAMESPACE$", self.entity_namespace())?,
        );
        let content = self.pass(
            "imports",
            &content,
            &TokenMap::new().with("$IMPORT_DOMAIN_STUFF$", self.imports())?,
        );
        let content = self.pass(
            "docs",
            &content,
            &TokenMap::new().with("$DOCS$", self.class_docs(&variables)?)?,
        );
        let content = self.pass(
            "entity name",
            &content,
            &TokenMap::new().with("$ENTITY_NAME$", self.entity_name())?,
        );
        let content = self.pass(
            "properties",
            &content,
            &TokenMap::new().with("$PROPERTIES$", self.properties()?)?,
        );
        let content = self.pass(
            "setters",
            &content,
            &TokenMap::new().with("$SETTERS$", self.setters()?)?,
        );
        let content = self.pass(
            "getters",
            &content,
            &TokenMap::new().with("$GETTERS$", self.getters()?)?,
        );
        let content = self.pass(
            "casts",
            &content,
            &TokenMap::new().with("$PROPERTY_CASTS$", self.property_casts())?,
        );

        Ok(GeneratedFile {
            path: self.output_path(),
            content,
            description: format!("Domain entity for {}", self.names.name),
        })
    }

    /// Values filled before the per-field passes must not carry tokens
    fn check_literals(&self) -> Result<()> {
        let settings = [
            ("table name", self.names.table.as_str()),
            ("domains namespace", self.settings.domains_namespace.as_str()),
            ("app namespace", self.settings.app_namespace.as_str()),
            ("primary key", self.settings.primary_key.as_str()),
        ];
        let fields = self.fields.iter().flat_map(|field| {
            std::iter::once(("field type", field.field_type.as_str()))
                .chain(field.format.as_deref().map(|f| ("field format", f)))
        });

        match settings.into_iter().chain(fields).find(|(_, v)| v.contains(SENTINEL)) {
            Some((what, value)) => Err(Error::SentinelInValue {
                what: what.to_string(),
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn pass(&self, concern: &str, content: &str, tokens: &TokenMap) -> String {
        tracing::debug!(
            entity = %self.names.name,
            concern,
            tokens = tokens.len(),
            "filling template"
        );
        fill(content, tokens)
    }

    /// Load a sub-template without its trailing line breaks
    fn fragment(&self, category: &str, name: &str) -> Result<String> {
        let template = self.template(category, name)?;
        Ok(template.trim_end_matches(['\n', '\r']).to_string())
    }

    fn template(&self, category: &str, name: &str) -> Result<String> {
        self.templates.get(category, name)
    }

    fn imports(&self) -> String {
        let namespace = self.entity_namespace();
        let terminator = &self.style.statement_terminator;
        [
            format!("use {namespace}\\{}Factory{terminator}", self.names.name),
            format!("use {namespace}\\{}Collection{terminator}", self.names.name),
        ]
        .join("\n")
    }

    /// Class-level documentation block
    ///
    /// `$PROPERTIES$` and `$REQUIRED_FIELDS$` are bound here so the later
    /// properties pass cannot inject into the block.
    fn class_docs(&self, variables: &TokenMap) -> Result<String> {
        let docs = self.fragment(DOCS_CATEGORY, "model_docs.model")?;
        let docs = fill(&docs, variables);
        let placeholders = TokenMap::try_from_pairs([
            ("$REQUIRED_FIELDS$", "\"\""),
            ("$PROPERTIES$", "*"),
        ])?;
        Ok(fill(&docs, &placeholders))
    }

    fn property_docs(template: &str, field: &FieldDescriptor) -> Result<String> {
        let format = field
            .format
            .as_ref()
            .map_or_else(String::new, |f| format!(",\n     *     format=\"{f}\""));

        let tokens = TokenMap::try_from_pairs([
            ("$FIELD_NAME$", field.name.clone()),
            ("$DESCRIPTION$", field.name.clone()),
            ("$FIELD_TYPE$", field.field_type.clone()),
            ("$FIELD_FORMAT$", format),
        ])?;
        Ok(fill(template, &tokens))
    }

    fn properties(&self) -> Result<String> {
        let template = self.fragment(ENTITY_CATEGORY, "domains.entity_property")?;
        let docs_template = self.fragment(DOCS_CATEGORY, "model_docs.property")?;

        let maps = self
            .fields
            .iter()
            .map(|field| {
                TokenMap::try_from_pairs([
                    ("$DOCS$", Self::property_docs(&docs_template, field)?),
                    ("$PROPERTY_NAME$", field.property_name()),
                ])
                .map_err(Error::from)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(fill_each(&template, &maps, &self.style.member_separator))
    }

    fn setters(&self) -> Result<String> {
        let template = self.fragment(ENTITY_CATEGORY, "domains.entity_setter")?;
        let entity_class = self.entity_name();

        let maps = self
            .fields
            .iter()
            .map(|field| {
                TokenMap::try_from_pairs([
                    ("$PROPERTY_TYPE$", field.field_type.clone()),
                    ("$PROPERTY$", field.property_name()),
                    ("$ENTITY_CLASS$", entity_class.clone()),
                    ("$FUNCTION_NAME$", field.function_name()),
                ])
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(fill_each(&template, &maps, &self.style.member_separator))
    }

    fn getters(&self) -> Result<String> {
        let template = self.fragment(ENTITY_CATEGORY, "domains.entity_getter")?;

        let maps = self
            .fields
            .iter()
            .map(|field| {
                TokenMap::try_from_pairs([
                    ("$PROPERTY_TYPE$", field.field_type.clone()),
                    ("$PROPERTY$", field.property_name()),
                    ("$FUNCTION_NAME$", field.function_name()),
                ])
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(fill_each(&template, &maps, &self.style.member_separator))
    }

    fn property_casts(&self) -> String {
        self.fields
            .iter()
            .map(|field| {
                format!(
                    "'{}' => $this->{}(),",
                    field.property_name(),
                    field.getter_name()
                )
            })
            .collect::<Vec<_>>()
            .join(&self.style.list_separator)
    }
}

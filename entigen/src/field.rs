//! Field descriptors for entity generation
//!
//! A field is a name plus a declared type, optionally with a documentation
//! format hint. Fields come from the command line or from a JSON file.
//!
//! # Command-line format
//!
//! ```text
//! title:string                  → name "title", type "string"
//! views:integer                 → name "views", type "integer"
//! published_at:string:date-time → type "string", format "date-time"
//! ```
//!
//! # JSON format
//!
//! ```json
//! [
//!   { "name": "title", "type": "string" },
//!   { "name": "published_at", "type": "string", "format": "date-time" }
//! ]
//! ```
//!
//! Declared types are taken verbatim and copied into the generated code and
//! documentation. Types and formats may not contain the `$` token sentinel.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::filler::SENTINEL;
use crate::naming::NameHelpers;

/// One entity attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Raw identifier (e.g. `published_at`)
    pub name: String,
    /// Declared type (e.g. `string`, `integer`)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Documentation format hint (e.g. `date-time`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDescriptor {
    /// Create a field without a format hint
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            format: None,
        }
    }

    /// Attach a documentation format hint
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Parse a field from `name:type[:format]`
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::field::FieldDescriptor;
    /// let field = FieldDescriptor::parse("published_at:string:date-time").unwrap();
    /// assert_eq!(field.name, "published_at");
    /// assert_eq!(field.field_type, "string");
    /// assert_eq!(field.format.as_deref(), Some("date-time"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if:
    /// - the name or type is missing or empty
    /// - the name is not a valid identifier
    /// - there are more than three parts
    /// - the type or format contains `$`
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').map(str::trim).collect();

        let (name, field_type, format) = match parts.as_slice() {
            [name, field_type] => (*name, *field_type, None),
            [name, field_type, format] => (*name, *field_type, Some(*format)),
            _ => {
                return Err(Error::invalid_field(
                    spec,
                    "expected format name:type[:format]",
                ))
            }
        };

        let field = Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            format: format.filter(|f| !f.is_empty()).map(str::to_string),
        };
        field.validate(spec)?;
        Ok(field)
    }

    /// Parse every spec and reject duplicate names
    ///
    /// # Errors
    ///
    /// Returns the first parse error, or [`Error::DuplicateField`].
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        let fields = specs
            .iter()
            .map(|spec| Self::parse(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::ensure_unique(&fields)?;
        Ok(fields)
    }

    /// Load fields from a JSON array file
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldsFile`] if the file cannot be read or parsed,
    /// [`Error::InvalidField`] for a bad name and [`Error::DuplicateField`]
    /// for a repeated one.
    pub fn load_json(path: &Path) -> Result<Vec<Self>> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FieldsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let fields: Vec<Self> = serde_json::from_str(&content).map_err(|e| Error::FieldsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for field in &fields {
            field.validate(&field.name)?;
        }
        Self::ensure_unique(&fields)?;

        tracing::debug!(count = fields.len(), path = %path.display(), "loaded fields file");
        Ok(fields)
    }

    /// Property name in generated code (`published_at` -> `publishedAt`)
    #[must_use]
    pub fn property_name(&self) -> String {
        NameHelpers::to_camel_case(&self.name)
    }

    /// Accessor suffix (`published_at` -> `PublishedAt`)
    #[must_use]
    pub fn function_name(&self) -> String {
        NameHelpers::ucfirst(&self.property_name())
    }

    /// Getter method name (`published_at` -> `getPublishedAt`)
    #[must_use]
    pub fn getter_name(&self) -> String {
        format!("get{}", self.function_name())
    }

    fn validate(&self, spec: &str) -> Result<()> {
        self.validate_name(spec)?;

        if self.field_type.trim().is_empty() {
            return Err(Error::invalid_field(spec, "field type cannot be empty"));
        }

        let mut values = std::iter::once(self.field_type.as_str()).chain(self.format.as_deref());
        if values.any(|v| v.contains(SENTINEL)) {
            return Err(Error::invalid_field(
                spec,
                format!("type and format must not contain '{SENTINEL}'"),
            ));
        }

        Ok(())
    }

    fn validate_name(&self, spec: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_field(spec, "field name cannot be empty"));
        }

        if !self.name.chars().next().unwrap_or('0').is_alphabetic()
            || !self.name.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(Error::invalid_field(
                spec,
                "name must be an identifier (alphanumeric + underscore)",
            ));
        }

        Ok(())
    }

    /// Reject a field list that names the same field twice
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] with the first repeated name.
    pub fn ensure_unique(fields: &[Self]) -> Result<()> {
        let mut seen = HashSet::new();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }
}

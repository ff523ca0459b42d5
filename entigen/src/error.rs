//! Error types and error handling

use std::path::PathBuf;

use thiserror::Error;

use crate::filler::TokenMapError;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Generator error type
#[derive(Debug, Error)]
pub enum Error {
    /// No provider layer has the requested template
    #[error("template not found: {category}/{name}")]
    TemplateNotFound {
        /// Template category (e.g. `laravel-generator`)
        category: String,
        /// Dotted template name (e.g. `domains.entity`)
        name: String,
    },

    /// Template exists but could not be read
    #[error("failed to read template '{path}': {source}")]
    TemplateRead {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generated output could not be written
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed field specification
    #[error("invalid field '{spec}': {reason}")]
    InvalidField {
        /// Raw field specification
        spec: String,
        /// What is wrong with it
        reason: String,
    },

    /// Model name is not `PascalCase`
    #[error("model name must be PascalCase (start with uppercase): '{0}'")]
    InvalidModelName(String),

    /// A value copied into the output contains the token sentinel
    #[error("{what} must not contain '$': '{value}'")]
    SentinelInValue {
        /// Which value (e.g. `table name`)
        what: String,
        /// Offending value
        value: String,
    },

    /// Entity without fields
    #[error("at least one field must be specified")]
    NoFields,

    /// Two fields share a name
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// JSON fields file could not be loaded
    #[error("failed to load fields file '{path}': {reason}")]
    FieldsFile {
        /// Fields file path
        path: PathBuf,
        /// Read or parse failure
        reason: String,
    },

    /// Token map construction failed
    #[error(transparent)]
    TokenMap(#[from] TokenMapError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl Error {
    /// Whether this error means the template is simply absent
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }

    pub(crate) fn not_found(category: &str, name: &str) -> Self {
        Self::TemplateNotFound {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_field(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

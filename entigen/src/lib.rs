//! entigen: template filling and domain entity generation
//!
//! The core is [`filler::fill`], a pure literal substitution of
//! placeholder tokens. Everything else drives it: templates come from a
//! [`provider::TemplateProvider`], field descriptors are expanded into
//! per-field token maps, and [`entity::EntityGenerator`] chains the passes
//! that assemble one entity class.
//!
//! ```
//! use entigen::{EmbeddedTemplates, EntityGenerator, FieldDescriptor, GeneratorSettings};
//!
//! # fn main() -> entigen::Result<()> {
//! let fields = FieldDescriptor::parse_all(&["title:string", "views:integer"])?;
//! let generator = EntityGenerator::new("Post", fields, GeneratorSettings::default(), EmbeddedTemplates)?;
//!
//! let file = generator.generate()?;
//! assert!(file.content.contains("class PostEntity"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod filler;
pub mod naming;
pub mod observability;
pub mod provider;

pub use config::{GeneratorSettings, StylePreset};
pub use entity::{EntityGenerator, EntityStyle, GeneratedFile};
pub use error::{Error, Result};
pub use field::FieldDescriptor;
pub use filler::{fill, fill_each, TokenMap, TokenMapError};
pub use naming::{ModelNames, NameHelpers};
pub use provider::{
    DirectoryTemplates, EmbeddedTemplates, LayeredTemplates, MemoryTemplates, TemplateProvider,
};

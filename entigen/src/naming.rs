//! Naming conventions for generated code
//!
//! Case conversion, pluralization and the whole-document variables derived
//! from a model name.

use inflector::Inflector;

use crate::config::GeneratorSettings;
use crate::error::Result;
use crate::filler::TokenMap;

/// PHP namespace separator
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Plurals that inflector's rules get wrong, keyed by lowercase singular
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("hero", "heroes"),
    ("louse", "lice"),
    ("mouse", "mice"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
];

/// Name conversion helpers
pub struct NameHelpers;

impl NameHelpers {
    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::to_snake_case("UserProfile"), "user_profile");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to `PascalCase`
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Convert string to camelCase
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::to_camel_case("published_at"), "publishedAt");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Convert string to kebab-case
    #[must_use]
    pub fn to_kebab_case(input: &str) -> String {
        input.to_kebab_case()
    }

    /// Human-readable title (`UserProfile` -> `User Profile`)
    #[must_use]
    pub fn to_title(input: &str) -> String {
        input.to_title_case()
    }

    /// Pluralize the last word of a name, keeping its leading case
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::pluralize("BlogPost"), "BlogPosts");
    /// assert_eq!(NameHelpers::pluralize("SalesPerson"), "SalesPeople");
    /// assert_eq!(NameHelpers::pluralize("order_item"), "order_items");
    /// ```
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        let (head, word) = input.split_at(Self::last_word_start(input));
        let lower = word.to_lowercase();

        let plural = IRREGULAR_PLURALS
            .iter()
            .find(|(singular, _)| *singular == lower)
            .map_or_else(|| lower.to_plural(), |(_, plural)| (*plural).to_string());

        if word.starts_with(char::is_uppercase) {
            format!("{head}{}", Self::ucfirst(&plural))
        } else {
            format!("{head}{plural}")
        }
    }

    /// Byte offset of the last word in a `PascalCase`, `snake_case` or
    /// kebab-case name
    fn last_word_start(input: &str) -> usize {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (i, c) in input.char_indices() {
            if matches!(c, '_' | '-' | ' ') {
                start = i + c.len_utf8();
            } else if c.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
            {
                start = i;
            }
            prev = Some(c);
        }
        start
    }

    /// Singularize a word
    #[must_use]
    pub fn singularize(input: &str) -> String {
        input.to_singular()
    }

    /// Table name (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::to_table_name("UserProfile"), "user_profiles");
    /// assert_eq!(NameHelpers::to_table_name("Category"), "categories");
    /// ```
    #[must_use]
    pub fn to_table_name(model: &str) -> String {
        Self::to_snake_case(&Self::pluralize(model))
    }

    /// Upper-case the first character, leaving the rest untouched
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::ucfirst("publishedAt"), "PublishedAt");
    /// assert_eq!(NameHelpers::ucfirst(""), "");
    /// ```
    #[must_use]
    pub fn ucfirst(input: &str) -> String {
        let mut chars = input.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Join namespace segments with `\`, ignoring stray separators
    ///
    /// # Examples
    ///
    /// ```
    /// # use entigen::naming::NameHelpers;
    /// assert_eq!(NameHelpers::join_namespace(&["App\\Domains\\", "Post"]), "App\\Domains\\Post");
    /// ```
    #[must_use]
    pub fn join_namespace(segments: &[&str]) -> String {
        segments
            .iter()
            .map(|s| s.trim_matches(NAMESPACE_SEPARATOR))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(&NAMESPACE_SEPARATOR.to_string())
    }

    /// Whether `model` looks like a `PascalCase` class name
    #[must_use]
    pub fn is_pascal_case(model: &str) -> bool {
        model.chars().next().is_some_and(char::is_uppercase)
            && model.chars().all(char::is_alphanumeric)
    }
}

/// Names derived from a singular model name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNames {
    /// Model name as given (`UserProfile`)
    pub name: String,
    /// Plural model name (`UserProfiles`)
    pub plural: String,
    /// Database table name (`user_profiles`)
    pub table: String,
}

impl ModelNames {
    /// Derive names from `model`, optionally overriding the table name
    #[must_use]
    pub fn new(model: &str, table: Option<&str>) -> Self {
        let plural = NameHelpers::pluralize(model);
        let table = table.map_or_else(|| NameHelpers::to_snake_case(&plural), str::to_string);
        Self {
            name: model.to_string(),
            plural,
            table,
        }
    }

    /// Whole-document variables for the first fill pass
    ///
    /// # Errors
    ///
    /// Fails only if two variables collide, which the fixed names rule out.
    pub fn variables(&self, settings: &GeneratorSettings) -> Result<TokenMap> {
        let mut vars = TokenMap::new();
        vars.set("MODEL_NAME", self.name.as_str())?;
        vars.set("MODEL_NAME_CAMEL", NameHelpers::to_camel_case(&self.name))?;
        vars.set("MODEL_NAME_PLURAL", self.plural.as_str())?;
        vars.set("MODEL_NAME_PLURAL_CAMEL", NameHelpers::to_camel_case(&self.plural))?;
        vars.set("MODEL_NAME_SNAKE", NameHelpers::to_snake_case(&self.name))?;
        vars.set("MODEL_NAME_PLURAL_SNAKE", NameHelpers::to_snake_case(&self.plural))?;
        vars.set("MODEL_NAME_DASHED", NameHelpers::to_kebab_case(&self.name))?;
        vars.set("MODEL_NAME_PLURAL_DASHED", NameHelpers::to_kebab_case(&self.plural))?;
        vars.set("MODEL_NAME_HUMAN", NameHelpers::to_title(&self.name))?;
        vars.set("MODEL_NAME_PLURAL_HUMAN", NameHelpers::to_title(&self.plural))?;
        vars.set("TABLE_NAME", self.table.as_str())?;
        vars.set("PRIMARY_KEY_NAME", settings.primary_key.as_str())?;
        vars.set("NAMESPACE_APP", settings.app_namespace.as_str())?;
        vars.set("DOMAINS_NAMESPACE", settings.domains_namespace.as_str())?;
        Ok(vars)
    }
}

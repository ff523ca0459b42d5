//! Literal token substitution
//!
//! The filler replaces placeholder tokens in a template with their bound
//! values. Tokens are plain literal strings, conventionally the token name
//! wrapped in the `$` sentinel (`$MODEL_NAME$`).
//!
//! A single call walks the template once from left to right. When a bound
//! token starts at the current position it is replaced and scanning resumes
//! after the consumed token text, so replacement values are never scanned
//! again within the same call. Tokens that are not bound pass through
//! verbatim, which lets independent token maps be applied to the same text
//! in successive calls:
//!
//! ```
//! use entigen::filler::{fill, TokenMap};
//!
//! let names = TokenMap::try_from_pairs([("$NAME$", "Ann")]).unwrap();
//! let ages = TokenMap::try_from_pairs([("$AGE$", "30")]).unwrap();
//!
//! let partial = fill("Hello $NAME$, you are $AGE$.", &names);
//! assert_eq!(partial, "Hello Ann, you are $AGE$.");
//! assert_eq!(fill(&partial, &ages), "Hello Ann, you are 30.");
//! ```
//!
//! # Determinism
//!
//! Results are only well-defined when the token set is prefix-free: no token
//! may be a prefix of another. [`TokenMap`] enforces this when tokens are
//! inserted. Two distinct sentinel-delimited tokens whose names contain no
//! sentinel can never be prefixes of each other, so maps built from such
//! names with [`TokenMap::delimited`] always satisfy it.
//! When occurrences of two different tokens overlap in the template, the one
//! that starts first wins.
//!
//! Because text inserted by one call is visible to the next, applying the
//! same map twice is not idempotent when a replacement contains a bound
//! token.

use thiserror::Error;

/// Sentinel character wrapped around token names
pub const SENTINEL: char = '$';

/// Errors raised while building a [`TokenMap`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenMapError {
    /// Empty tokens would match at every position
    #[error("token must not be empty")]
    Empty,

    /// Token bound twice in the same map
    #[error("token '{0}' is already bound")]
    Duplicate(String),

    /// One token is a prefix of another
    #[error("token '{token}' overlaps '{existing}': one is a prefix of the other")]
    Overlap {
        /// Token being inserted
        token: String,
        /// Token already present in the map
        existing: String,
    },
}

/// Ordered, prefix-free set of token bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    entries: Vec<(String, String)>,
}

impl TokenMap {
    /// Create an empty token map
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap a token name in the sentinel character
    ///
    /// ```
    /// use entigen::filler::TokenMap;
    ///
    /// assert_eq!(TokenMap::delimited("TABLE_NAME"), "$TABLE_NAME$");
    /// ```
    #[must_use]
    pub fn delimited(name: &str) -> String {
        format!("{SENTINEL}{name}{SENTINEL}")
    }

    /// Build a map from `(token, replacement)` pairs, in order
    ///
    /// # Errors
    ///
    /// Returns the first [`TokenMapError`] raised by [`TokenMap::insert`].
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, TokenMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (token, replacement) in pairs {
            map.insert(token, replacement)?;
        }
        Ok(map)
    }

    /// Bind a literal token to its replacement
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, already bound, or is a prefix
    /// of (or prefixed by) a token already in the map.
    pub fn insert(
        &mut self,
        token: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<(), TokenMapError> {
        let token = token.into();

        if token.is_empty() {
            return Err(TokenMapError::Empty);
        }

        for (existing, _) in &self.entries {
            if *existing == token {
                return Err(TokenMapError::Duplicate(token));
            }
            if existing.starts_with(token.as_str()) || token.starts_with(existing.as_str()) {
                return Err(TokenMapError::Overlap {
                    token,
                    existing: existing.clone(),
                });
            }
        }

        self.entries.push((token, replacement.into()));
        Ok(())
    }

    /// Bind a sentinel-delimited token by name
    ///
    /// `map.set("TABLE_NAME", "posts")` binds `$TABLE_NAME$`.
    ///
    /// # Errors
    ///
    /// See [`TokenMap::insert`].
    pub fn set(&mut self, name: &str, replacement: impl Into<String>) -> Result<(), TokenMapError> {
        self.insert(Self::delimited(name), replacement)
    }

    /// Builder form of [`TokenMap::insert`]
    ///
    /// # Errors
    ///
    /// See [`TokenMap::insert`].
    pub fn with(
        mut self,
        token: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, TokenMapError> {
        self.insert(token, replacement)?;
        Ok(self)
    }

    /// Look up the replacement bound to a token
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, r)| r.as_str())
    }

    /// Number of bound tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tokens are bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(token, replacement)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, r)| (t.as_str(), r.as_str()))
    }

    /// Token bound at the start of `rest`, if any
    fn match_at(&self, rest: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(token, _)| rest.starts_with(token.as_str()))
            .map(|(t, r)| (t.as_str(), r.as_str()))
    }

    /// Distinct first characters of all bound tokens
    fn leading_chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self
            .entries
            .iter()
            .filter_map(|(token, _)| token.chars().next())
            .collect();
        chars.sort_unstable();
        chars.dedup();
        chars
    }
}

/// Replace every bound token in `template`
///
/// Unbound tokens and malformed markers pass through unchanged. Never fails;
/// an empty map returns the template as-is.
#[must_use]
pub fn fill(template: &str, tokens: &TokenMap) -> String {
    if tokens.is_empty() || template.is_empty() {
        return template.to_owned();
    }

    let leading = tokens.leading_chars();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find(|c: char| leading.binary_search(&c).is_ok()) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        if let Some((token, replacement)) = tokens.match_at(rest) {
            out.push_str(replacement);
            rest = &rest[token.len()..];
        } else {
            let Some(c) = rest.chars().next() else {
                break;
            };
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out.push_str(rest);
    out
}

/// Render `template` once per map and join the results with `separator`
///
/// Each rendering is an independent [`fill`] call, so the same token names
/// can be reused for every item.
///
/// ```
/// use entigen::filler::{fill, fill_each, TokenMap};
///
/// let rows: Vec<TokenMap> = ["id", "name"]
///     .iter()
///     .map(|f| TokenMap::try_from_pairs([("$FIELD$", *f)]).unwrap())
///     .collect();
///
/// let list = fill_each("- $FIELD$\n", &rows, "");
/// let outer = TokenMap::try_from_pairs([("$LIST$", list)]).unwrap();
/// assert_eq!(fill("Fields:\n$LIST$", &outer), "Fields:\n- id\n- name\n");
/// ```
#[must_use]
pub fn fill_each<'a, I>(template: &str, maps: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a TokenMap>,
{
    maps.into_iter()
        .map(|tokens| fill(template, tokens))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(pairs: &[(&str, &str)]) -> TokenMap {
        TokenMap::try_from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_fill_basic_scenario() {
        let tokens = map(&[("$NAME$", "Ann"), ("$AGE$", "30")]);
        assert_eq!(
            fill("Hello $NAME$, you are $AGE$.", &tokens),
            "Hello Ann, you are 30."
        );
    }

    #[test]
    fn test_empty_map_is_identity() {
        assert_eq!(fill("keep $X$ as is", &TokenMap::new()), "keep $X$ as is");
    }

    #[test]
    fn test_empty_template() {
        let tokens = map(&[("$X$", "y")]);
        assert_eq!(fill("", &tokens), "");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let tokens = map(&[("$A$", "1")]);
        assert_eq!(fill("$A$ $B$ $A$", &tokens), "1 $B$ 1");
    }

    #[test]
    fn test_empty_replacement() {
        let tokens = map(&[("$GONE$", "")]);
        assert_eq!(fill("a$GONE$b$GONE$c", &tokens), "abc");
    }

    #[test]
    fn test_replacement_not_rescanned() {
        let tokens = map(&[("$A$", "$B$"), ("$B$", "b")]);
        assert_eq!(fill("$A$ $B$", &tokens), "$B$ b");
    }

    #[test]
    fn test_replacement_containing_own_token() {
        let tokens = map(&[("$X$", "[$X$]")]);
        let once = fill("$X$", &tokens);
        assert_eq!(once, "[$X$]");
        // a second pass sees the inserted token again
        assert_eq!(fill(&once, &tokens), "[[$X$]]");
    }

    #[test]
    fn test_unterminated_marker_passes_through() {
        let tokens = map(&[("$NAME$", "Ann")]);
        assert_eq!(fill("Hi $NAME and $NAME$", &tokens), "Hi $NAME and Ann");
    }

    #[test]
    fn test_php_variable_before_token() {
        let tokens = map(&[("$PROPERTY$", "title")]);
        assert_eq!(
            fill("$this->$PROPERTY$ = $$PROPERTY$;", &tokens),
            "$this->title = $title;"
        );
    }

    #[test]
    fn test_leftmost_occurrence_wins() {
        let tokens = map(&[("ab", "X"), ("bc", "Y")]);
        assert_eq!(fill("abc", &tokens), "Xc");
    }

    #[test]
    fn test_multibyte_text() {
        let tokens = map(&[("$N$", "Zoë")]);
        assert_eq!(fill("héllo $N$ ✓", &tokens), "héllo Zoë ✓");
    }

    #[test]
    fn test_insert_rejects_empty() {
        let mut tokens = TokenMap::new();
        assert_eq!(tokens.insert("", "x"), Err(TokenMapError::Empty));
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut tokens = map(&[("$A$", "1")]);
        assert_eq!(
            tokens.insert("$A$", "2"),
            Err(TokenMapError::Duplicate("$A$".to_string()))
        );
        assert_eq!(tokens.get("$A$"), Some("1"));
    }

    #[test]
    fn test_insert_rejects_prefix_overlap() {
        let mut tokens = map(&[("$MODEL", "x")]);
        let err = tokens.insert("$MODEL_NAME$", "y").unwrap_err();
        assert!(matches!(err, TokenMapError::Overlap { .. }));

        let mut tokens = map(&[("$MODEL_NAME$", "x")]);
        assert!(tokens.insert("$MODEL", "y").is_err());
    }

    #[test]
    fn test_delimited_tokens_never_overlap() {
        let mut tokens = TokenMap::new();
        tokens.set("MODEL_NAME", "Post").unwrap();
        tokens.set("MODEL_NAME_PLURAL", "Posts").unwrap();
        tokens.set("MODEL_NAME_CAMEL", "post").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            fill("$MODEL_NAME$/$MODEL_NAME_PLURAL$", &tokens),
            "Post/Posts"
        );
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let tokens = map(&[("$B$", "2"), ("$A$", "1")]);
        let keys: Vec<_> = tokens.iter().map(|(t, _)| t).collect();
        assert_eq!(keys, vec!["$B$", "$A$"]);
    }

    #[test]
    fn test_fill_each_two_level_assembly() {
        let rows: Vec<TokenMap> = ["id", "name"]
            .into_iter()
            .map(|f| map(&[("$FIELD$", f)]))
            .collect();
        let list = fill_each("- $FIELD$\n", &rows, "");
        let outer = map(&[("$LIST$", list.as_str())]);
        assert_eq!(fill("Fields:\n$LIST$", &outer), "Fields:\n- id\n- name\n");
    }

    #[test]
    fn test_fill_each_separator() {
        let rows: Vec<TokenMap> = ["a", "b", "c"]
            .into_iter()
            .map(|f| map(&[("$V$", f)]))
            .collect();
        assert_eq!(fill_each("<$V$>", &rows, ",\n    "), "<a>,\n    <b>,\n    <c>");

        let none: Vec<TokenMap> = Vec::new();
        assert_eq!(fill_each("<$V$>", &none, ", "), "");
    }

    proptest! {
        #[test]
        fn prop_empty_map_is_identity(template in any::<String>()) {
            prop_assert_eq!(fill(&template, &TokenMap::new()), template);
        }

        #[test]
        fn prop_single_token_fully_replaced(
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
            replacement in "[a-zA-Z0-9 ]{0,20}",
        ) {
            let template = format!("{prefix}$X${suffix}");
            let tokens = map(&[("$X$", replacement.as_str())]);
            let out = fill(&template, &tokens);
            prop_assert_eq!(&out, &format!("{prefix}{replacement}{suffix}"));
            prop_assert!(!out.contains("$X$"));
        }

        #[test]
        fn prop_disjoint_tokens_order_independent(
            parts in proptest::collection::vec(
                prop_oneof![Just("$A$".to_string()), Just("$B$".to_string()), "[a-z ]{0,5}"],
                0..12,
            ),
            a in "[a-z]{0,6}",
            b in "[a-z]{0,6}",
        ) {
            let template = parts.concat();
            let ab = map(&[("$A$", a.as_str()), ("$B$", b.as_str())]);
            let ba = map(&[("$B$", b.as_str()), ("$A$", a.as_str())]);
            let out = fill(&template, &ab);
            prop_assert_eq!(&out, &fill(&template, &ba));
            prop_assert!(!out.contains("$A$"));
            prop_assert!(!out.contains("$B$"));
        }
    }
}

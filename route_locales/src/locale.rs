//! Locale tags and the identifier form used in route names.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// An opaque locale tag such as `en`, `fr-CA` or `pt-BR`.
///
/// Tags are stored exactly as configured. Comparison, hashing and ordering
/// operate on the raw tag so `fr-CA` and `fr_ca` are distinct locales; use
/// [`Locale::identifier`] when a locale has to be embedded in a route or
/// helper name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Wraps a locale tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as configured.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` for the empty tag.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the tag normalized for use inside identifiers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use route_locales::Locale;
    ///
    /// assert_eq!(Locale::new("pt-BR").identifier(), "pt_br");
    /// assert_eq!(Locale::new("en").identifier(), "en");
    /// ```
    #[must_use]
    pub fn identifier(&self) -> String {
        normalize_identifier(&self.0)
    }

    /// Parses the tag as a BCP 47 language identifier.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the tag is not a valid language
    /// identifier.
    pub fn language_identifier(&self) -> Result<LanguageIdentifier, LanguageIdentifierError> {
        self.0.parse()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&LanguageIdentifier> for Locale {
    fn from(value: &LanguageIdentifier) -> Self {
        Self(value.to_string())
    }
}

impl From<LanguageIdentifier> for Locale {
    fn from(value: LanguageIdentifier) -> Self {
        Self::from(&value)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lowercases `tag` and turns word boundaries into single underscores.
///
/// Hyphens, underscores and whitespace are separators. A lowercase letter or
/// digit followed by an uppercase letter also starts a new word, as does the
/// last capital of an acronym followed by a lowercase letter (`HTMLPage` →
/// `html_page`).
#[must_use]
pub fn normalize_identifier(tag: &str) -> String {
    let chars: Vec<char> = tag.trim().chars().collect();
    let mut normalized = String::with_capacity(chars.len() + 2);
    let mut prev: Option<char> = None;

    for (idx, &ch) in chars.iter().enumerate() {
        if matches!(ch, '-' | '_') || ch.is_whitespace() {
            push_separator(&mut normalized);
            prev = Some('_');
            continue;
        }

        if ch.is_uppercase() {
            let next = chars.get(idx + 1).copied();
            let camel_boundary =
                prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let acronym_boundary = prev.is_some_and(|p| p.is_uppercase() || p.is_ascii_digit())
                && next.is_some_and(char::is_lowercase);
            if camel_boundary || acronym_boundary {
                push_separator(&mut normalized);
            }
        }

        normalized.extend(ch.to_lowercase());
        prev = Some(ch);
    }

    normalized
}

fn push_separator(buf: &mut String) {
    if !buf.is_empty() && !buf.ends_with('_') {
        buf.push('_');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use unic_langid::langid;

    #[rstest]
    #[case("en", "en")]
    #[case("pt-BR", "pt_br")]
    #[case("fr-CA", "fr_ca")]
    #[case("fr_CA", "fr_ca")]
    #[case("zh-Hant-TW", "zh_hant_tw")]
    #[case("ptBR", "pt_br")]
    #[case("HTMLPage", "html_page")]
    #[case("en--GB", "en_gb")]
    #[case(" es ", "es")]
    fn normalizes_identifiers(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(normalize_identifier(tag), expected);
    }

    #[rstest]
    fn identifier_keeps_raw_tag_untouched() {
        let locale = Locale::new("pt-BR");
        assert_eq!(locale.identifier(), "pt_br");
        assert_eq!(locale.as_str(), "pt-BR");
        assert_eq!(locale.to_string(), "pt-BR");
    }

    #[rstest]
    #[case("", true)]
    #[case("en", false)]
    fn reports_empty_tags(#[case] tag: &str, #[case] expected: bool) {
        let locale = Locale::new(tag);
        assert_eq!(locale.is_empty(), expected);
        assert_eq!(locale.as_str(), tag);
    }

    #[rstest]
    fn converts_from_language_identifier() {
        let locale = Locale::from(langid!("fr-CA"));
        assert_eq!(locale, "fr-CA");
        let parsed = locale
            .language_identifier()
            .expect("fr-CA should parse as a language identifier");
        assert_eq!(parsed, langid!("fr-CA"));
    }

    #[rstest]
    fn rejects_invalid_language_identifier() {
        assert!(Locale::new("not a locale!").language_identifier().is_err());
    }

    #[rstest]
    fn deserializes_from_plain_string() {
        let locale: Locale =
            serde_json::from_str("\"de-AT\"").expect("plain strings should deserialize");
        assert_eq!(locale, Locale::new("de-AT"));
    }
}

//! In-memory translation table.

use std::collections::{HashMap, HashSet};

use super::{PathTranslator, TranslationError};
use crate::Locale;

/// Translation backend holding explicit `(locale, path) → translated path`
/// entries.
///
/// Scoped entries take precedence over unscoped ones for the same locale
/// and path. Passthrough locales return the template unchanged when no
/// entry matches; every other miss is reported as
/// [`TranslationError::Missing`].
///
/// # Examples
///
/// ```rust
/// use route_locales::{Locale, PathTranslator, StaticTranslator};
///
/// let table = StaticTranslator::new()
///     .with_translation("fr", "/about", "/a-propos")
///     .with_passthrough("en");
/// assert_eq!(table.translate("/about", &Locale::new("fr"), None).as_deref(), Ok("/a-propos"));
/// assert_eq!(table.translate("/about", &Locale::new("en"), None).as_deref(), Ok("/about"));
/// assert!(table.translate("/about", &Locale::new("de"), None).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTranslator {
    entries: HashMap<EntryKey, String>,
    passthrough: HashSet<Locale>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    locale: Locale,
    scope: Option<String>,
    path: String,
}

impl StaticTranslator {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unscoped translation.
    #[must_use]
    pub fn with_translation(
        mut self,
        locale: impl Into<Locale>,
        path: impl Into<String>,
        translated: impl Into<String>,
    ) -> Self {
        self.insert(locale, None, path, translated);
        self
    }

    /// Adds a translation that only applies within `scope`.
    #[must_use]
    pub fn with_scoped_translation(
        mut self,
        scope: impl Into<String>,
        locale: impl Into<Locale>,
        path: impl Into<String>,
        translated: impl Into<String>,
    ) -> Self {
        self.insert(locale, Some(scope.into()), path, translated);
        self
    }

    /// Keeps templates unchanged for `locale` when no entry matches.
    #[must_use]
    pub fn with_passthrough(mut self, locale: impl Into<Locale>) -> Self {
        self.passthrough.insert(locale.into());
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(
        &mut self,
        locale: impl Into<Locale>,
        scope: Option<String>,
        path: impl Into<String>,
        translated: impl Into<String>,
    ) {
        self.entries.insert(
            EntryKey {
                locale: locale.into(),
                scope,
                path: path.into(),
            },
            translated.into(),
        );
    }

    fn entry(&self, path: &str, locale: &Locale, scope: Option<&str>) -> Option<&String> {
        let key = EntryKey {
            locale: locale.clone(),
            scope: scope.map(str::to_owned),
            path: path.to_owned(),
        };
        if let Some(found) = self.entries.get(&key) {
            return Some(found);
        }
        if key.scope.is_none() {
            return None;
        }
        self.entries.get(&EntryKey { scope: None, ..key })
    }
}

impl PathTranslator for StaticTranslator {
    fn translate(
        &self,
        path: &str,
        locale: &Locale,
        scope: Option<&str>,
    ) -> Result<String, TranslationError> {
        if let Some(translated) = self.entry(path, locale, scope) {
            return Ok(translated.clone());
        }
        if self.passthrough.contains(locale) {
            return Ok(path.to_owned());
        }
        Err(TranslationError::Missing {
            locale: locale.clone(),
            key: path.to_owned(),
        })
    }
}

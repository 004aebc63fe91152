//! Redundancy checks for generated route paths.
//!
//! Each generation run owns one index of the paths it produced so far.
//! Single-pass generation only needs to know whether a path was seen
//! ([`SeenPaths`]); two-pass generation records which locales own each path
//! ([`PathOwners`]) so the registration pass can replay the decisions.

use std::collections::{HashMap, HashSet};

use crate::{Locale, LocaleOrdering};

/// Index of paths produced during one generation run.
pub trait GeneratedPaths {
    /// Returns `true` when at least one locale already produced `path`.
    fn is_generated(&self, path: &str) -> bool;
}

/// Paths seen by single-pass generation.
#[derive(Debug, Default, Clone)]
pub struct SeenPaths(HashSet<String>);

impl SeenPaths {
    /// Records `path` as produced.
    pub fn mark(&mut self, path: impl Into<String>) {
        self.0.insert(path.into());
    }
}

impl GeneratedPaths for SeenPaths {
    fn is_generated(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// Locales owning each path, in the order they claimed it.
#[derive(Debug, Default, Clone)]
pub struct PathOwners(HashMap<String, Vec<Locale>>);

impl PathOwners {
    /// Adds `locale` to the owners of `path`.
    pub fn record(&mut self, path: impl Into<String>, locale: Locale) {
        self.0.entry(path.into()).or_default().push(locale);
    }

    /// Returns the owners of `path`.
    #[must_use]
    pub fn owners(&self, path: &str) -> &[Locale] {
        self.0.get(path).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` when `locale` owns `path`.
    #[must_use]
    pub fn owns(&self, path: &str, locale: &Locale) -> bool {
        self.owners(path).contains(locale)
    }
}

impl GeneratedPaths for PathOwners {
    fn is_generated(&self, path: &str) -> bool {
        !self.owners(path).is_empty()
    }
}

/// Decides whether a locale's variant is redundant.
///
/// Built once per generation run so the fallback set is computed once.
#[derive(Debug, Clone)]
pub struct DeduplicationPolicy {
    enabled: bool,
    default_locale: Locale,
    fallback_locales: Vec<Locale>,
}

impl DeduplicationPolicy {
    /// Captures the deduplication switch, default locale and fallback set.
    #[must_use]
    pub fn new(ordering: &LocaleOrdering<'_>) -> Self {
        Self {
            enabled: ordering.settings().deduplicate_routes,
            default_locale: ordering.default_locale().clone(),
            fallback_locales: ordering.fallback_locales(),
        }
    }

    /// Returns `true` when the variant of `locale` at `path` should be
    /// dropped.
    ///
    /// Only plain locales are ever dropped: deduplication must be enabled,
    /// the locale must be neither the default nor a fallback locale, and
    /// another locale must already have produced `path`.
    #[must_use]
    pub fn allowed_to_deduplicate<I: GeneratedPaths + ?Sized>(
        &self,
        locale: &Locale,
        path: &str,
        index: &I,
    ) -> bool {
        self.enabled
            && *locale != self.default_locale
            && index.is_generated(path)
            && !self.fallback_locales.contains(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocaleSettings;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> LocaleSettings {
        LocaleSettings::new("en")
            .with_available_locales(["en", "fr", "fr-CA", "es"])
            .with_fallbacks("fr-CA", ["fr"])
            .with_deduplication(true)
    }

    fn owners_of(path: &str, locale: &str) -> PathOwners {
        let mut owners = PathOwners::default();
        owners.record(path, Locale::new(locale));
        owners
    }

    #[rstest]
    fn plain_locale_with_taken_path_is_dropped(settings: LocaleSettings) {
        let policy = DeduplicationPolicy::new(&LocaleOrdering::new(&settings));
        let index = owners_of("/about", "en");
        assert!(policy.allowed_to_deduplicate(&Locale::new("es"), "/about", &index));
    }

    #[rstest]
    fn plain_locale_with_fresh_path_is_kept(settings: LocaleSettings) {
        let policy = DeduplicationPolicy::new(&LocaleOrdering::new(&settings));
        let index = owners_of("/about", "en");
        assert!(!policy.allowed_to_deduplicate(&Locale::new("es"), "/acerca", &index));
    }

    #[rstest]
    #[case::default_locale("en")]
    #[case::fallback_target("fr")]
    #[case::fallback_source("fr-CA")]
    fn protected_locales_are_never_dropped(settings: LocaleSettings, #[case] locale: &str) {
        let policy = DeduplicationPolicy::new(&LocaleOrdering::new(&settings));
        let index = owners_of("/about", "es");
        assert!(!policy.allowed_to_deduplicate(&Locale::new(locale), "/about", &index));
    }

    #[rstest]
    fn disabled_deduplication_keeps_everything(settings: LocaleSettings) {
        let disabled = settings.with_deduplication(false);
        let policy = DeduplicationPolicy::new(&LocaleOrdering::new(&disabled));
        let mut seen = SeenPaths::default();
        seen.mark("/about");
        assert!(!policy.allowed_to_deduplicate(&Locale::new("es"), "/about", &seen));
    }

    #[rstest]
    fn seen_paths_feed_the_same_predicate(settings: LocaleSettings) {
        let policy = DeduplicationPolicy::new(&LocaleOrdering::new(&settings));
        let mut seen = SeenPaths::default();
        assert!(!policy.allowed_to_deduplicate(&Locale::new("es"), "/about", &seen));
        seen.mark("/about");
        assert!(policy.allowed_to_deduplicate(&Locale::new("es"), "/about", &seen));
    }

    #[rstest]
    fn path_owners_keep_claim_order() {
        let mut owners = PathOwners::default();
        owners.record("/a-propos", Locale::new("fr"));
        owners.record("/a-propos", Locale::new("fr-CA"));
        assert_eq!(
            owners.owners("/a-propos"),
            &[Locale::new("fr"), Locale::new("fr-CA")]
        );
        assert!(owners.owns("/a-propos", &Locale::new("fr-CA")));
        assert!(!owners.owns("/a-propos", &Locale::new("en")));
        assert!(owners.owners("/about").is_empty());
    }
}

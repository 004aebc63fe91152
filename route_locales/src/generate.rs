//! Generation of locale variants for declared routes.
//!
//! [`RouteTranslator`] drives the locale orderings, the path translator, the
//! deduplication policy and the variant builder for one route at a time.
//! Variants are handed to a callback as soon as they are built, together
//! with the host registry, so names the callback registers are visible to
//! the collision check of every later variant of the same route.

use crate::dedup::{DeduplicationPolicy, PathOwners, SeenPaths};
use crate::translate::{PathTranslator, translate_path};
use crate::variant::build_variant;
use crate::{
    Locale, LocaleOrdering, LocaleSettings, Route, RouteRegistry, RouteResult, TranslatedVariant,
};

/// Generates locale variants of routes.
#[derive(Debug)]
pub struct RouteTranslator<'a, T: ?Sized> {
    settings: &'a LocaleSettings,
    backend: &'a T,
}

impl<T: ?Sized> Clone for RouteTranslator<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for RouteTranslator<'_, T> {}

impl<'a, T: PathTranslator + ?Sized> RouteTranslator<'a, T> {
    /// Creates a generator over `settings` using `backend` for paths.
    #[must_use]
    pub const fn new(settings: &'a LocaleSettings, backend: &'a T) -> Self {
        Self { settings, backend }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &'a LocaleSettings {
        self.settings
    }

    /// Locale orderings for the settings in use.
    #[must_use]
    pub const fn ordering(&self) -> LocaleOrdering<'a> {
        LocaleOrdering::new(self.settings)
    }

    /// Generates variants in a single pass over
    /// [`LocaleOrdering::available_locales`].
    ///
    /// A path already produced by an earlier locale is still subject to the
    /// deduplication policy, so plain locales can be dropped when
    /// deduplication is enabled. Because the default locale comes last, a
    /// plain locale sharing its path is kept; use
    /// [`RouteTranslator::generate_deduplicated`] to judge plain locales
    /// against the default and fallback locales first.
    ///
    /// # Errors
    ///
    /// Fails on the first unsuppressed missing translation or backend
    /// error. Variants already handed to `on_variant` are not retracted.
    pub fn generate<R, F>(
        &self,
        route: &Route,
        registry: &mut R,
        mut on_variant: F,
    ) -> RouteResult<()>
    where
        R: RouteRegistry + ?Sized,
        F: FnMut(&mut R, TranslatedVariant),
    {
        register_localized_helper(route, registry);

        let ordering = self.ordering();
        let policy = DeduplicationPolicy::new(&ordering);
        let mut seen = SeenPaths::default();

        for locale in ordering.available_locales() {
            let Some(path) = translate_path(self.backend, self.settings, route, &locale)? else {
                continue;
            };
            if policy.allowed_to_deduplicate(&locale, &path, &seen) {
                log_deduplicated(route, &locale, &path);
                continue;
            }

            seen.mark(path.clone());
            let variant = self.build(route, &locale, path, registry);
            on_variant(registry, variant);
        }
        Ok(())
    }

    /// Generates variants in two passes so registration order preserves
    /// matching precedence.
    ///
    /// The collection pass walks [`LocaleOrdering::collection_order`]
    /// (default locale, fallback locales, plain locales) and records which
    /// locales own each translated path. The registration pass walks
    /// [`LocaleOrdering::registration_order`] (plain locales, fallback
    /// locales, default locale) and emits a variant for every recorded
    /// owner, so the default-locale variant is always emitted last.
    ///
    /// # Errors
    ///
    /// Fails on the first unsuppressed missing translation or backend
    /// error. Such failures surface during the collection pass, before any
    /// variant of the route is emitted.
    pub fn generate_deduplicated<R, F>(
        &self,
        route: &Route,
        registry: &mut R,
        mut on_variant: F,
    ) -> RouteResult<()>
    where
        R: RouteRegistry + ?Sized,
        F: FnMut(&mut R, TranslatedVariant),
    {
        register_localized_helper(route, registry);

        let ordering = self.ordering();
        let policy = DeduplicationPolicy::new(&ordering);
        let mut owners = PathOwners::default();

        for locale in ordering.collection_order() {
            let Some(path) = translate_path(self.backend, self.settings, route, &locale)? else {
                continue;
            };
            if policy.allowed_to_deduplicate(&locale, &path, &owners) {
                log_deduplicated(route, &locale, &path);
                continue;
            }
            owners.record(path, locale);
        }

        for locale in ordering.registration_order() {
            let Some(path) = translate_path(self.backend, self.settings, route, &locale)? else {
                continue;
            };
            if !owners.owns(&path, &locale) {
                continue;
            }

            let variant = self.build(route, &locale, path, registry);
            on_variant(registry, variant);
        }
        Ok(())
    }

    /// Generates variants with the strategy selected by
    /// [`LocaleSettings::deduplicate_routes`].
    ///
    /// # Errors
    ///
    /// Propagates the errors of the selected strategy.
    pub fn generate_configured<R, F>(
        &self,
        route: &Route,
        registry: &mut R,
        on_variant: F,
    ) -> RouteResult<()>
    where
        R: RouteRegistry + ?Sized,
        F: FnMut(&mut R, TranslatedVariant),
    {
        if self.settings.deduplicate_routes {
            self.generate_deduplicated(route, registry, on_variant)
        } else {
            self.generate(route, registry, on_variant)
        }
    }

    /// Collects the variants of [`RouteTranslator::generate`] without
    /// registering them anywhere.
    ///
    /// # Errors
    ///
    /// Propagates generation errors; nothing is returned on failure.
    pub fn collect<R: RouteRegistry + ?Sized>(
        &self,
        route: &Route,
        registry: &mut R,
    ) -> RouteResult<Vec<TranslatedVariant>> {
        let mut variants = Vec::new();
        self.generate(route, registry, |_, variant| variants.push(variant))?;
        Ok(variants)
    }

    /// Collects the variants of [`RouteTranslator::generate_deduplicated`]
    /// without registering them anywhere.
    ///
    /// # Errors
    ///
    /// Propagates generation errors; nothing is returned on failure.
    pub fn collect_deduplicated<R: RouteRegistry + ?Sized>(
        &self,
        route: &Route,
        registry: &mut R,
    ) -> RouteResult<Vec<TranslatedVariant>> {
        let mut variants = Vec::new();
        self.generate_deduplicated(route, registry, |_, variant| variants.push(variant))?;
        Ok(variants)
    }

    fn build<R: RouteRegistry + ?Sized>(
        &self,
        route: &Route,
        locale: &Locale,
        path: String,
        registry: &R,
    ) -> TranslatedVariant {
        let variant = build_variant(route, locale, path, registry, &self.settings.locale_param_key);
        tracing::trace!(
            locale = %variant.locale,
            name = variant.name.as_deref(),
            path = %variant.path,
            "generated route variant"
        );
        variant
    }
}

fn register_localized_helper<R: RouteRegistry + ?Sized>(route: &Route, registry: &mut R) {
    if let Some(name) = route.name() {
        registry.add_localized_helper(name);
    }
}

fn log_deduplicated(route: &Route, locale: &Locale, path: &str) {
    tracing::debug!(
        route = route.path(),
        locale = %locale,
        path,
        "dropping duplicate route variant"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteError, StaticTranslator};
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;

    #[derive(Debug, Default)]
    struct Recorder {
        names: BTreeSet<String>,
        helpers: Vec<String>,
        variants: Vec<TranslatedVariant>,
    }

    impl RouteRegistry for Recorder {
        fn has_route_name(&self, name: &str) -> bool {
            self.names.contains(name)
        }

        fn add_localized_helper(&mut self, base_name: &str) {
            self.helpers.push(base_name.to_owned());
        }
    }

    fn record(registry: &mut Recorder, variant: TranslatedVariant) {
        if let Some(name) = &variant.name {
            registry.names.insert(name.clone());
        }
        registry.variants.push(variant);
    }

    fn emitted(registry: &Recorder) -> Vec<(String, String)> {
        registry
            .variants
            .iter()
            .map(|variant| (variant.locale.to_string(), variant.path.clone()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(locale, path)| ((*locale).to_owned(), (*path).to_owned()))
            .collect()
    }

    #[fixture]
    fn backend() -> StaticTranslator {
        StaticTranslator::new()
            .with_passthrough("en")
            .with_translation("es", "/about", "/about")
            .with_translation("fr", "/about", "/a-propos")
            .with_translation("fr-CA", "/about", "/a-propos")
    }

    #[fixture]
    fn about() -> Route {
        Route::new("/about").named("about")
    }

    #[rstest]
    fn single_pass_emits_every_locale_with_default_last(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en").with_available_locales(["en", "es", "fr"]);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate(&about, &mut registry, record)
            .expect("every locale translates");

        assert_eq!(
            emitted(&registry),
            pairs(&[("es", "/about"), ("fr", "/a-propos"), ("en", "/about")])
        );
        assert_eq!(registry.helpers, vec![String::from("about")]);
        assert!(registry.names.contains("about_es"));
        assert!(registry.names.contains("about_en"));
    }

    #[rstest]
    fn two_pass_drops_plain_locale_sharing_default_path(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["en", "es", "fr"])
            .with_deduplication(true);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate_deduplicated(&about, &mut registry, record)
            .expect("every locale translates");

        assert_eq!(
            emitted(&registry),
            pairs(&[("fr", "/a-propos"), ("en", "/about")])
        );
    }

    #[rstest]
    fn single_pass_keeps_plain_locale_seen_before_default(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["en", "es"])
            .with_deduplication(true);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate(&about, &mut registry, record)
            .expect("every locale translates");

        assert_eq!(emitted(&registry), pairs(&[("es", "/about"), ("en", "/about")]));
    }

    #[rstest]
    fn single_pass_drops_repeated_plain_path(about: Route) {
        let backend = StaticTranslator::new()
            .with_passthrough("en")
            .with_translation("es", "/about", "/acerca")
            .with_translation("gl", "/about", "/acerca");
        let settings = LocaleSettings::new("en")
            .with_available_locales(["es", "gl", "en"])
            .with_deduplication(true);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate(&about, &mut registry, record)
            .expect("every locale translates");

        assert_eq!(emitted(&registry), pairs(&[("es", "/acerca"), ("en", "/about")]));
    }

    #[rstest]
    fn fallback_locales_keep_shared_paths(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["en", "es", "fr", "fr-CA"])
            .with_fallbacks("fr-CA", ["fr"])
            .with_deduplication(true);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate_deduplicated(&about, &mut registry, record)
            .expect("every locale translates");

        assert_eq!(
            emitted(&registry),
            pairs(&[("fr", "/a-propos"), ("fr-CA", "/a-propos"), ("en", "/about")])
        );
    }

    #[rstest]
    #[case::single_pass(false)]
    #[case::two_pass(true)]
    fn suppressed_misses_skip_the_locale(
        backend: StaticTranslator,
        about: Route,
        #[case] deduplicate: bool,
    ) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["en", "de", "fr"])
            .with_deduplication(deduplicate)
            .with_disabled_fallback(true);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate_configured(&about, &mut registry, record)
            .expect("suppressed misses are not errors");

        assert_eq!(emitted(&registry), pairs(&[("fr", "/a-propos"), ("en", "/about")]));
    }

    #[rstest]
    fn single_pass_failure_keeps_earlier_variants(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en").with_available_locales(["fr", "de", "en"]);
        let mut registry = Recorder::default();
        let err = RouteTranslator::new(&settings, &backend)
            .generate(&about, &mut registry, record)
            .expect_err("de has no translation");

        assert!(matches!(err, RouteError::MissingTranslation { ref locale, .. } if locale == "de"));
        assert_eq!(emitted(&registry), pairs(&[("fr", "/a-propos")]));
    }

    #[rstest]
    fn two_pass_failure_emits_nothing(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["fr", "de", "en"])
            .with_deduplication(true);
        let mut registry = Recorder::default();
        let err = RouteTranslator::new(&settings, &backend)
            .generate_deduplicated(&about, &mut registry, record)
            .expect_err("de has no translation");

        assert!(err.is_missing_translation());
        assert!(registry.variants.is_empty());
    }

    #[rstest]
    fn names_registered_by_the_callback_are_seen_by_later_variants(about: Route) {
        let backend = StaticTranslator::new()
            .with_passthrough("en")
            .with_passthrough("pt-BR")
            .with_passthrough("pt_BR");
        let settings = LocaleSettings::new("en").with_available_locales(["pt-BR", "pt_BR", "en"]);
        let mut registry = Recorder::default();
        RouteTranslator::new(&settings, &backend)
            .generate(&about, &mut registry, record)
            .expect("every locale passes through");

        let names: Vec<Option<&str>> = registry
            .variants
            .iter()
            .map(|variant| variant.name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("about_pt_br"), None, Some("about_en")]);
    }

    #[rstest]
    fn unnamed_routes_register_no_helper(backend: StaticTranslator) {
        let settings = LocaleSettings::new("en").with_available_locales(["en", "fr"]);
        let mut registry = Recorder::default();
        let variants = RouteTranslator::new(&settings, &backend)
            .collect(&Route::new("/about"), &mut registry)
            .expect("every locale translates");

        assert!(registry.helpers.is_empty());
        assert!(variants.iter().all(|variant| variant.name.is_none()));
    }

    #[rstest]
    fn collecting_twice_yields_identical_variants(backend: StaticTranslator, about: Route) {
        let settings = LocaleSettings::new("en")
            .with_available_locales(["en", "es", "fr", "fr-CA"])
            .with_fallbacks("fr-CA", ["fr"])
            .with_deduplication(true);
        let translator = RouteTranslator::new(&settings, &backend);
        let first = translator
            .collect_deduplicated(&about, &mut Recorder::default())
            .expect("every locale translates");
        let second = translator
            .collect_deduplicated(&about, &mut Recorder::default())
            .expect("every locale translates");
        assert_eq!(first, second);
    }
}

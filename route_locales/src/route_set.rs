//! In-memory route registry.
//!
//! [`RouteSet`] collects generated variants in registration order, tracks
//! which names are taken and which base names dispatch to locale variants.
//! It is the registry hosts without a router of their own can plug into
//! [`RouteTranslator`].

use std::collections::BTreeSet;

use crate::{
    CapabilityProbe, Locale, Params, PathTranslator, Route, RouteNameResolver, RouteRegistry,
    RouteResult, RouteTranslator, TranslatedVariant,
};

/// Helper suffixes a registered route name answers to.
pub const HELPER_SUFFIXES: [&str; 2] = ["path", "url"];

/// Ordered collection of registered route variants.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<TranslatedVariant>,
    names: BTreeSet<String>,
    localized_helpers: BTreeSet<String>,
}

impl RouteSet {
    /// Creates an empty route set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `variant`, reserving its name when it has one.
    pub fn register(&mut self, variant: TranslatedVariant) {
        if let Some(name) = &variant.name {
            self.names.insert(name.clone());
        }
        self.routes.push(variant);
    }

    /// Marks `name` as taken without registering a route, as a host does for
    /// routes declared outside localisation.
    pub fn reserve_name(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Registered variants in registration order.
    #[must_use]
    pub fn routes(&self) -> &[TranslatedVariant] {
        &self.routes
    }

    /// Returns the variant registered under `name`.
    #[must_use]
    pub fn route(&self, name: &str) -> Option<&TranslatedVariant> {
        self.routes
            .iter()
            .find(|variant| variant.name.as_deref() == Some(name))
    }

    /// Returns `true` when `base_name` dispatches to locale variants.
    #[must_use]
    pub fn is_localized_helper(&self, base_name: &str) -> bool {
        self.localized_helpers.contains(base_name)
    }

    /// Generates and registers every locale variant of `route`.
    ///
    /// Uses two-pass generation when the translator's settings enable
    /// deduplication and single-pass generation otherwise. Returns the number
    /// of variants registered.
    ///
    /// # Errors
    ///
    /// Propagates generation errors. Variants registered by single-pass
    /// generation before the failure stay registered.
    pub fn add_localized<T: PathTranslator + ?Sized>(
        &mut self,
        translator: &RouteTranslator<'_, T>,
        route: &Route,
    ) -> RouteResult<usize> {
        let before = self.routes.len();
        translator.generate_configured(route, self, Self::register)?;
        let added = self.routes.len() - before;
        tracing::debug!(route = route.path(), variants = added, "registered localized route");
        Ok(added)
    }

    /// Returns the path of the locale variant answering the `{base_name}_path`
    /// helper for `current_locale`.
    ///
    /// `None` when `base_name` is not a localized helper or the resolved
    /// variant was never registered.
    #[must_use]
    pub fn localized_path(
        &self,
        resolver: &RouteNameResolver<'_>,
        base_name: &str,
        args: &Params,
        current_locale: &Locale,
    ) -> Option<&str> {
        if !self.is_localized_helper(base_name) {
            return None;
        }
        let helper = resolver.resolve_name(args, base_name, "path", current_locale, self);
        let name = helper.strip_suffix("_path")?;
        self.route(name).map(|variant| variant.path.as_str())
    }
}

impl RouteRegistry for RouteSet {
    fn has_route_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn add_localized_helper(&mut self, base_name: &str) {
        self.localized_helpers.insert(base_name.to_owned());
    }
}

impl CapabilityProbe for RouteSet {
    fn exists(&self, candidate: &str) -> bool {
        HELPER_SUFFIXES.iter().any(|suffix| {
            candidate
                .strip_suffix(suffix)
                .and_then(|rest| rest.strip_suffix('_'))
                .is_some_and(|name| self.names.contains(name))
        })
    }
}

//! Locale configuration consumed by route generation and name resolution.
//!
//! [`LocaleSettings`] is the single configuration source for the crate: the
//! default locale, the locales to generate routes for, the fallback map and
//! the switches controlling deduplication and missing-translation handling.
//! Settings can be built programmatically with the `with_*` methods or loaded
//! from layered sources with [`LocaleSettings::load`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Locale, RouteError, RouteResult};

mod csv_env;
mod load;

pub use csv_env::CsvEnv;
pub use load::ENV_PREFIX;

/// Parameter key used for the locale when none is configured.
pub const DEFAULT_LOCALE_PARAM_KEY: &str = "locale";

/// Locale configuration for route generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Locale whose routes are registered last.
    pub default_locale: Locale,
    /// Locales to generate routes for. When empty, the default locale and
    /// every locale named by [`LocaleSettings::fallbacks`] are used.
    pub available_locales: Vec<Locale>,
    /// Ordered fallback chain per locale.
    pub fallbacks: BTreeMap<Locale, Vec<Locale>>,
    /// Drops variants of plain locales whose path another locale already
    /// produced.
    pub deduplicate_routes: bool,
    /// Skips locales lacking a translation instead of failing the route.
    pub disable_fallback: bool,
    /// Host pattern to locale mapping. Explicit locale arguments are only
    /// honoured by the name resolver when this is non-empty.
    pub host_locales: BTreeMap<String, Locale>,
    /// Key under which the locale is stored in route options and
    /// constraints.
    pub locale_param_key: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self::new("en")
    }
}

impl LocaleSettings {
    /// Creates settings with `default_locale` and every switch off.
    #[must_use]
    pub fn new(default_locale: impl Into<Locale>) -> Self {
        Self {
            default_locale: default_locale.into(),
            available_locales: Vec::new(),
            fallbacks: BTreeMap::new(),
            deduplicate_routes: false,
            disable_fallback: false,
            host_locales: BTreeMap::new(),
            locale_param_key: DEFAULT_LOCALE_PARAM_KEY.to_owned(),
        }
    }

    /// Replaces the available locales.
    #[must_use]
    pub fn with_available_locales<I, L>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        self.available_locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fallback chain for `locale`.
    #[must_use]
    pub fn with_fallbacks<I, L>(mut self, locale: impl Into<Locale>, chain: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        self.fallbacks
            .insert(locale.into(), chain.into_iter().map(Into::into).collect());
        self
    }

    /// Toggles route deduplication.
    #[must_use]
    pub const fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate_routes = enabled;
        self
    }

    /// Toggles suppression of missing translations.
    #[must_use]
    pub const fn with_disabled_fallback(mut self, disabled: bool) -> Self {
        self.disable_fallback = disabled;
        self
    }

    /// Maps a host pattern to a locale.
    #[must_use]
    pub fn with_host_locale(mut self, host: impl Into<String>, locale: impl Into<Locale>) -> Self {
        self.host_locales.insert(host.into(), locale.into());
        self
    }

    /// Replaces the locale parameter key.
    #[must_use]
    pub fn with_locale_param_key(mut self, key: impl Into<String>) -> Self {
        self.locale_param_key = key.into();
        self
    }

    /// Returns `true` when `locale` is the default locale.
    #[must_use]
    pub fn is_default(&self, locale: &Locale) -> bool {
        &self.default_locale == locale
    }

    /// Returns the configured fallback chain for `locale`.
    #[must_use]
    pub fn fallback_chain(&self, locale: &Locale) -> &[Locale] {
        self.fallbacks.get(locale).map_or(&[], Vec::as_slice)
    }

    /// Returns the locales routes are generated for, in configured order and
    /// without duplicates.
    ///
    /// Falls back to the default locale followed by every locale named in the
    /// fallback map when [`LocaleSettings::available_locales`] is empty.
    #[must_use]
    pub fn configured_locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = Vec::new();
        let mut push = |locale: &Locale| {
            if !locales.contains(locale) {
                locales.push(locale.clone());
            }
        };

        if self.available_locales.is_empty() {
            push(&self.default_locale);
            for (locale, chain) in &self.fallbacks {
                push(locale);
                chain.iter().for_each(&mut push);
            }
        } else {
            self.available_locales.iter().for_each(&mut push);
        }
        locales
    }

    /// Returns `true` when `locale` takes part in a fallback relationship,
    /// either by declaring a non-empty chain or by being a chain target.
    #[must_use]
    pub fn participates_in_fallback(&self, locale: &Locale) -> bool {
        self.fallbacks.iter().any(|(source, chain)| {
            (source == locale && !chain.is_empty()) || chain.contains(locale)
        })
    }

    /// Checks the settings for values generation cannot work with.
    ///
    /// Fallback targets outside the configured locales are allowed but
    /// logged, since they can never own a generated route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Validation`] naming the first offending key.
    pub fn validate(&self) -> RouteResult<()> {
        if self.default_locale.is_empty() {
            return Err(RouteError::validation(
                "default_locale",
                "default locale must not be empty",
            ));
        }
        if self.locale_param_key.trim().is_empty() {
            return Err(RouteError::validation(
                "locale_param_key",
                "locale parameter key must not be empty",
            ));
        }
        if self.available_locales.iter().any(Locale::is_empty) {
            return Err(RouteError::validation(
                "available_locales",
                "locale tags must not be empty",
            ));
        }
        if let Some((host, _)) = self.host_locales.iter().find(|(_, locale)| locale.is_empty()) {
            return Err(RouteError::validation(
                format!("host_locales.{host}"),
                "locale tags must not be empty",
            ));
        }

        let configured = self.configured_locales();
        for (locale, chain) in &self.fallbacks {
            if locale.is_empty() || chain.iter().any(Locale::is_empty) {
                return Err(RouteError::validation(
                    "fallbacks",
                    "locale tags must not be empty",
                ));
            }
            if chain.contains(locale) {
                return Err(RouteError::validation(
                    format!("fallbacks.{locale}"),
                    format!("locale {locale} must not fall back to itself"),
                ));
            }
            for target in chain.iter().filter(|target| !configured.contains(target)) {
                tracing::warn!(
                    locale = %locale,
                    fallback = %target,
                    "fallback locale is not among the available locales"
                );
            }
        }
        Ok(())
    }
}

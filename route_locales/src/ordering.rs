//! Locale traversal orders used by route generation.
//!
//! Routes for the default locale are usually registered without a locale
//! prefix and behave like a wildcard, so every order that decides
//! registration places the default locale last.

use crate::{Locale, LocaleSettings};

/// Computes locale traversal orders from one [`LocaleSettings`].
#[derive(Debug, Clone, Copy)]
pub struct LocaleOrdering<'a> {
    settings: &'a LocaleSettings,
}

impl<'a> LocaleOrdering<'a> {
    /// Creates an ordering over `settings`.
    #[must_use]
    pub const fn new(settings: &'a LocaleSettings) -> Self {
        Self { settings }
    }

    /// Settings the orders are computed from.
    #[must_use]
    pub const fn settings(&self) -> &'a LocaleSettings {
        self.settings
    }

    /// The default locale.
    #[must_use]
    pub const fn default_locale(&self) -> &'a Locale {
        &self.settings.default_locale
    }

    /// Configured locales with the default locale moved to the end.
    ///
    /// The default locale is appended even when the configuration does not
    /// list it, and appears exactly once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use route_locales::{Locale, LocaleOrdering, LocaleSettings};
    ///
    /// let settings = LocaleSettings::new("en").with_available_locales(["en", "fr", "de"]);
    /// let order = LocaleOrdering::new(&settings).available_locales();
    /// assert_eq!(order, vec![Locale::new("fr"), Locale::new("de"), Locale::new("en")]);
    /// ```
    #[must_use]
    pub fn available_locales(&self) -> Vec<Locale> {
        let default = self.default_locale();
        let mut locales: Vec<Locale> = self
            .settings
            .configured_locales()
            .into_iter()
            .filter(|locale| locale != default)
            .collect();
        locales.push(default.clone());
        locales
    }

    /// Available locales taking part in a fallback relationship, in
    /// available-locale order. May include the default locale.
    #[must_use]
    pub fn fallback_locales(&self) -> Vec<Locale> {
        self.available_locales()
            .into_iter()
            .filter(|locale| self.settings.participates_in_fallback(locale))
            .collect()
    }

    /// Configured fallback chain for `locale`, empty when none is set.
    #[must_use]
    pub fn fallback_chain(&self, locale: &Locale) -> &'a [Locale] {
        self.settings.fallback_chain(locale)
    }

    /// Order used to decide which locale owns a generated path:
    /// default locale, then fallback locales, then the remaining locales.
    #[must_use]
    pub fn collection_order(&self) -> Vec<Locale> {
        let (fallback, plain) = self.partition();
        let mut order = Vec::with_capacity(fallback.len() + plain.len() + 1);
        order.push(self.default_locale().clone());
        order.extend(fallback);
        order.extend(plain);
        order
    }

    /// Order used to register variants: plain locales, then fallback
    /// locales, then the default locale.
    #[must_use]
    pub fn registration_order(&self) -> Vec<Locale> {
        let (fallback, plain) = self.partition();
        let mut order = Vec::with_capacity(fallback.len() + plain.len() + 1);
        order.extend(plain);
        order.extend(fallback);
        order.push(self.default_locale().clone());
        order
    }

    /// Splits the non-default available locales into fallback and plain
    /// locales, preserving available-locale order in both halves.
    fn partition(&self) -> (Vec<Locale>, Vec<Locale>) {
        let default = self.default_locale();
        self.available_locales()
            .into_iter()
            .filter(|locale| locale != default)
            .partition(|locale| self.settings.participates_in_fallback(locale))
    }
}

//! Resolution of locale-suffixed helper names.
//!
//! Given a base helper name such as `users` and a suffix such as `path`, the
//! resolver picks which locale's helper (`users_fr_path`, `users_en_path`, ...)
//! should answer a call. Existence of a candidate is checked through a
//! [`CapabilityProbe`] supplied by the host.

use serde_json::Value;

use crate::{CapabilityProbe, Locale, LocaleSettings, Params, normalize_identifier};

/// Builds the helper name `"{base}_{locale}_{suffix}"`.
///
/// `locale` is normalized with [`normalize_identifier`], so both `pt-BR` and
/// an already normalized `pt_br` produce the same name.
#[must_use]
pub fn candidate_name(base: &str, locale: &str, suffix: &str) -> String {
    format!("{base}_{}_{suffix}", normalize_identifier(locale))
}

/// Picks the locale whose helper answers a call.
#[derive(Debug, Clone, Copy)]
pub struct RouteNameResolver<'a> {
    settings: &'a LocaleSettings,
}

impl<'a> RouteNameResolver<'a> {
    /// Creates a resolver over `settings`.
    #[must_use]
    pub const fn new(settings: &'a LocaleSettings) -> Self {
        Self { settings }
    }

    /// Returns the locale-suffixed helper name for `base_name`.
    ///
    /// Candidates are tried in this order:
    ///
    /// 1. the locale passed in `args` under the locale parameter key, but
    ///    only when host locales are configured;
    /// 2. `current_locale`, when its helper exists;
    /// 3. with deduplication enabled, the first locale of the current
    ///    locale's fallback chain whose helper exists;
    /// 4. the default locale, whether or not its helper exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use route_locales::{Locale, LocaleSettings, Params, RouteNameResolver};
    ///
    /// let settings = LocaleSettings::new("en")
    ///     .with_fallbacks("fr", ["es"])
    ///     .with_deduplication(true);
    /// let exists = |name: &str| name == "users_es_show";
    /// let name = RouteNameResolver::new(&settings).resolve_name(
    ///     &Params::new(),
    ///     "users",
    ///     "show",
    ///     &Locale::new("fr"),
    ///     &exists,
    /// );
    /// assert_eq!(name, "users_es_show");
    /// ```
    #[must_use]
    pub fn resolve_name<P: CapabilityProbe + ?Sized>(
        &self,
        args: &Params,
        base_name: &str,
        suffix: &str,
        current_locale: &Locale,
        probe: &P,
    ) -> String {
        if let Some(explicit) = self.explicit_locale(args) {
            return candidate_name(base_name, explicit, suffix);
        }

        let current = candidate_name(base_name, current_locale.as_str(), suffix);
        if probe.exists(&current) {
            return current;
        }

        if self.settings.deduplicate_routes {
            let fallback = self
                .settings
                .fallback_chain(current_locale)
                .iter()
                .map(|locale| candidate_name(base_name, locale.as_str(), suffix))
                .find(|candidate| probe.exists(candidate));
            if let Some(name) = fallback {
                return name;
            }
        }

        tracing::trace!(
            base = base_name,
            locale = %current_locale,
            "resolving helper to default locale"
        );
        candidate_name(base_name, self.settings.default_locale.as_str(), suffix)
    }

    fn explicit_locale<'p>(&self, args: &'p Params) -> Option<&'p str> {
        if self.settings.host_locales.is_empty() {
            return None;
        }
        args.get(&self.settings.locale_param_key)
            .and_then(Value::as_str)
            .filter(|locale| !locale.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;

    #[fixture]
    fn settings() -> LocaleSettings {
        LocaleSettings::new("en")
            .with_available_locales(["en", "es", "fr", "pt-BR"])
            .with_fallbacks("fr", ["es"])
            .with_deduplication(true)
    }

    fn helpers(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    fn args(locale: &str) -> Params {
        Params::from([(String::from("locale"), Value::from(locale))])
    }

    #[rstest]
    #[case::current_exists(&["users_fr_show", "users_es_show"], "users_fr_show")]
    #[case::fallback_exists(&["users_es_show"], "users_es_show")]
    #[case::nothing_exists(&[], "users_en_show")]
    fn resolves_in_priority_order(
        settings: LocaleSettings,
        #[case] existing: &[&str],
        #[case] expected: &str,
    ) {
        let known = helpers(existing);
        let probe = |name: &str| known.contains(name);
        let name = RouteNameResolver::new(&settings).resolve_name(
            &Params::new(),
            "users",
            "show",
            &Locale::new("fr"),
            &probe,
        );
        assert_eq!(name, expected);
    }

    #[rstest]
    fn fallbacks_are_ignored_without_deduplication(settings: LocaleSettings) {
        let plain = settings.with_deduplication(false);
        let probe = |name: &str| name == "users_es_show";
        let name = RouteNameResolver::new(&plain).resolve_name(
            &Params::new(),
            "users",
            "show",
            &Locale::new("fr"),
            &probe,
        );
        assert_eq!(name, "users_en_show");
    }

    #[rstest]
    fn explicit_locale_needs_host_locales(settings: LocaleSettings) {
        let probe = |_: &str| false;
        let without_hosts = RouteNameResolver::new(&settings).resolve_name(
            &args("es"),
            "users",
            "path",
            &Locale::new("fr"),
            &probe,
        );
        assert_eq!(without_hosts, "users_en_path");

        let hosted = settings.with_host_locale("*.es", "es");
        let with_hosts = RouteNameResolver::new(&hosted).resolve_name(
            &args("pt-BR"),
            "users",
            "path",
            &Locale::new("fr"),
            &probe,
        );
        assert_eq!(with_hosts, "users_pt_br_path");
    }

    #[rstest]
    fn non_string_locale_argument_is_ignored(settings: LocaleSettings) {
        let hosted = settings.with_host_locale("*.es", "es");
        let mut params = Params::new();
        params.insert(String::from("locale"), Value::from(3));
        let probe = |name: &str| name == "users_fr_path";
        let name = RouteNameResolver::new(&hosted).resolve_name(
            &params,
            "users",
            "path",
            &Locale::new("fr"),
            &probe,
        );
        assert_eq!(name, "users_fr_path");
    }

    #[rstest]
    #[case("users", "pt-BR", "url", "users_pt_br_url")]
    #[case("users", "pt_br", "url", "users_pt_br_url")]
    #[case("about", "fr-CA", "path", "about_fr_ca_path")]
    fn candidate_names_use_normalized_locales(
        #[case] base: &str,
        #[case] locale: &str,
        #[case] suffix: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(candidate_name(base, locale, suffix), expected);
    }
}

//! Environment provider that reads locale lists from comma-separated values.
//!
//! Wraps `figment::providers::Env` and converts values containing commas
//! into arrays unless they look like structured data (starting with `[` or
//! `{` or a quote). This allows `ROUTE_LOCALES_AVAILABLE_LOCALES=en,fr,fr-CA`
//! to be deserialized as `Vec<Locale>`. Keys registered with
//! [`CsvEnv::with_list_keys`] always produce arrays, so a single locale such
//! as `ROUTE_LOCALES_AVAILABLE_LOCALES=en` still deserializes into a list.
//! Keys nested under a prefix registered with [`CsvEnv::with_list_prefixes`]
//! behave the same way, so `ROUTE_LOCALES_FALLBACKS__ES=pt` is a one-entry
//! chain.
//!
//! Keys are lowercased and environment variable names cannot contain `-`.
//! A nested key such as `FALLBACKS__PT_BR` therefore arrives as `pt_br`.

use figment::providers::Env;
use figment::{
    Profile, Provider,
    error::Error,
    util::nest,
    value::{Dict, Map, Value},
};
use std::ops::Deref;
use uncased::Uncased;

/// Environment provider with CSV list support.
#[derive(Clone)]
pub struct CsvEnv {
    inner: Env,
    list_keys: Vec<String>,
    list_prefixes: Vec<String>,
}

impl CsvEnv {
    /// Create a provider reading variables that start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use route_locales::CsvEnv;
    /// let env = CsvEnv::prefixed("ROUTE_LOCALES_");
    /// let _ = env;
    /// ```
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Env::prefixed(prefix).into()
    }

    /// Split keys at `pattern` to address nested values, for example
    /// `ROUTE_LOCALES_FALLBACKS__ES=pt` with a `"__"` pattern.
    #[must_use]
    pub fn split(self, pattern: &str) -> Self {
        let Self {
            inner,
            list_keys,
            list_prefixes,
        } = self;
        Self {
            inner: inner.split(pattern),
            list_keys,
            list_prefixes,
        }
    }

    /// Declares keys whose values are always lists.
    #[must_use]
    pub fn with_list_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.list_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declares tables whose nested values are always lists.
    ///
    /// With the prefix `fallbacks`, every `fallbacks.<locale>` key produced by
    /// [`CsvEnv::split`] is read as a list.
    #[must_use]
    pub fn with_list_prefixes<I, K>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.list_prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    fn iter(&self) -> impl Iterator<Item = (Uncased<'static>, String)> + '_ {
        self.inner.iter()
    }

    fn is_list_key(&self, key: &str) -> bool {
        self.list_keys
            .iter()
            .any(|list_key| list_key.eq_ignore_ascii_case(key))
            || key.split_once('.').is_some_and(|(head, rest)| {
                !rest.is_empty()
                    && self
                        .list_prefixes
                        .iter()
                        .any(|prefix| prefix.eq_ignore_ascii_case(head))
            })
    }

    /// The value is treated as CSV when it contains a comma and does not start
    /// with `[`, `{`, `"` or `'`.
    fn should_parse_as_csv(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.contains(',') && !matches!(trimmed.chars().next(), Some('[' | '{' | '"' | '\''))
    }

    fn parse_list(trimmed: &str) -> Value {
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::from(item.to_owned()))
            .collect::<Vec<_>>()
            .into()
    }

    fn parse_value(&self, key: &str, raw: &str) -> Value {
        let trimmed = raw.trim();
        let structured = matches!(trimmed.chars().next(), Some('[' | '{'));
        if Self::should_parse_as_csv(trimmed) || (self.is_list_key(key) && !structured) {
            Self::parse_list(trimmed)
        } else {
            trimmed
                .parse()
                .unwrap_or_else(|_| Value::from(trimmed.to_owned()))
        }
    }
}

impl Provider for CsvEnv {
    fn metadata(&self) -> figment::Metadata {
        self.inner.metadata()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.inner.profile.clone())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        for (k, v) in self.iter() {
            let value = self.parse_value(k.as_str(), &v);
            let Some(nested) = nest(k.as_str(), value).into_dict() else {
                return Err(Error::from(format!(
                    "environment key `{k}` produced a non-object value"
                )));
            };
            merge_dicts(&mut dict, nested);
        }
        Ok(self.inner.profile.collect(dict))
    }
}

/// Deep-merges `incoming` into `target` so sibling nested keys such as
/// `fallbacks.es` and `fallbacks.pt` both survive.
fn merge_dicts(target: &mut Dict, incoming: Dict) {
    for (key, value) in incoming {
        match (target.get_mut(&key), value) {
            (Some(Value::Dict(_, existing)), Value::Dict(_, nested)) => {
                merge_dicts(existing, nested);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

impl From<Env> for CsvEnv {
    fn from(inner: Env) -> Self {
        Self {
            inner,
            list_keys: Vec::new(),
            list_prefixes: Vec::new(),
        }
    }
}

impl Deref for CsvEnv {
    type Target = Env;

    fn deref(&self) -> &Env {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn provider() -> CsvEnv {
        CsvEnv::prefixed("ROUTE_LOCALES_")
            .with_list_keys(["available_locales"])
            .with_list_prefixes(["fallbacks"])
    }

    fn strings(value: &Value) -> Vec<String> {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    #[case("en,fr,fr-CA", vec!["en", "fr", "fr-CA"])]
    #[case("en, fr , fr-CA", vec!["en", "fr", "fr-CA"])]
    #[case("en,,fr", vec!["en", "fr"])]
    fn splits_comma_separated_values(#[case] raw: &str, #[case] expected: Vec<&str>) {
        let value = provider().parse_value("other", raw);
        assert_eq!(strings(&value), expected);
    }

    #[rstest]
    fn list_keys_wrap_single_values() {
        let value = provider().parse_value("available_locales", "en");
        assert_eq!(strings(&value), vec!["en"]);
    }

    #[rstest]
    fn scalar_keys_keep_single_values() {
        let value = provider().parse_value("default_locale", "en");
        assert_eq!(value.as_str(), Some("en"));
    }

    #[rstest]
    fn booleans_are_parsed() {
        let value = provider().parse_value("deduplicate_routes", "true");
        assert_eq!(value.to_bool(), Some(true));
    }

    #[rstest]
    fn bracketed_values_are_not_split() {
        let value = provider().parse_value("available_locales", "[\"en\",\"fr\"]");
        assert_eq!(strings(&value), vec!["en", "fr"]);
    }

    #[rstest]
    #[case("fallbacks.es")]
    #[case("FALLBACKS.ES")]
    #[case("fallbacks.pt_br")]
    fn keys_under_list_prefixes_wrap_single_values(#[case] key: &str) {
        let value = provider().parse_value(key, "pt");
        assert_eq!(strings(&value), vec!["pt"]);
    }

    #[rstest]
    #[case("fallbacks")]
    #[case("fallbacks_es")]
    #[case("host_locales.example")]
    fn list_prefixes_match_nested_keys_only(#[case] key: &str) {
        let value = provider().parse_value(key, "pt");
        assert_eq!(value.as_str(), Some("pt"));
    }
}

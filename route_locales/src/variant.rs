//! Declared routes and their per-locale variants.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Locale, RouteRegistry};

/// Route options, constraints and helper arguments keyed by parameter name.
pub type Params = BTreeMap<String, Value>;

/// Opaque request matcher used as a route constraint, such as a compiled
/// pattern or a host-provided predicate.
pub trait RequestMatcher: fmt::Debug + Send + Sync {
    /// Returns `true` when the request parameters satisfy the constraint.
    fn matches(&self, params: &Params) -> bool;
}

/// Route constraints.
///
/// Keyed constraints receive the locale parameter for every variant; opaque
/// matchers cannot be extended and are passed through untouched.
#[derive(Debug, Clone)]
pub enum Constraints {
    /// Keyed constraints.
    Map(Params),
    /// Opaque matcher.
    Matcher(Arc<dyn RequestMatcher>),
}

impl Default for Constraints {
    fn default() -> Self {
        Self::Map(Params::new())
    }
}

impl PartialEq for Constraints {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Map(left), Self::Map(right)) => left == right,
            (Self::Matcher(left), Self::Matcher(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Constraints {
    /// Returns the keyed constraints, if any.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Params> {
        match self {
            Self::Map(params) => Some(params),
            Self::Matcher(_) => None,
        }
    }
}

impl From<Params> for Constraints {
    fn from(params: Params) -> Self {
        Self::Map(params)
    }
}

/// A declared route, before localisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    name: Option<String>,
    path: String,
    scope: Option<String>,
    options: Params,
    options_constraints: Constraints,
}

impl Route {
    /// Declares an unnamed route for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Names the route.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the translation scope passed to the backend.
    #[must_use]
    pub fn scoped(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Adds a route option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Replaces the route constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: impl Into<Constraints>) -> Self {
        self.options_constraints = constraints.into();
        self
    }

    /// Route name, when declared and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Translation scope.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Route options.
    #[must_use]
    pub const fn options(&self) -> &Params {
        &self.options
    }

    /// Route constraints.
    #[must_use]
    pub const fn options_constraints(&self) -> &Constraints {
        &self.options_constraints
    }
}

/// A locale-specific instantiation of a [`Route`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedVariant {
    /// Locale the variant was generated for.
    pub locale: Locale,
    /// Locale-suffixed route name; `None` for unnamed routes and when the
    /// derived name is already taken.
    pub name: Option<String>,
    /// Translated path.
    pub path: String,
    /// Constraints carrying the locale parameter when keyed.
    pub options_constraints: Constraints,
    /// Options carrying the locale parameter unless already present.
    pub options: Params,
}

/// Derives the locale-suffixed name for `name`.
///
/// Returns `None` when there is no name or when the derived name already
/// exists in `registry`; the host is expected to synthesize a name of its
/// own in that case.
#[must_use]
pub fn translate_name<R: RouteRegistry + ?Sized>(
    name: Option<&str>,
    locale: &Locale,
    registry: &R,
) -> Option<String> {
    let base = name.filter(|name| !name.is_empty())?;
    let translated = format!("{base}_{}", locale.identifier());
    if registry.has_route_name(&translated) {
        tracing::debug!(name = %translated, locale = %locale, "localized route name already taken");
        return None;
    }
    Some(translated)
}

/// Copies `options`, adding the locale under `key` unless already set.
#[must_use]
pub fn translate_options(options: &Params, locale: &Locale, key: &str) -> Params {
    let mut translated = options.clone();
    translated
        .entry(key.to_owned())
        .or_insert_with(|| Value::from(locale.as_str()));
    translated
}

/// Copies `constraints`, setting the locale under `key` when keyed.
#[must_use]
pub fn translate_options_constraints(
    constraints: &Constraints,
    locale: &Locale,
    key: &str,
) -> Constraints {
    match constraints {
        Constraints::Map(params) => {
            let mut translated = params.clone();
            translated.insert(key.to_owned(), Value::from(locale.as_str()));
            Constraints::Map(translated)
        }
        Constraints::Matcher(matcher) => Constraints::Matcher(Arc::clone(matcher)),
    }
}

/// Builds the variant of `route` for `locale` at `path`.
#[must_use]
pub fn build_variant<R: RouteRegistry + ?Sized>(
    route: &Route,
    locale: &Locale,
    path: String,
    registry: &R,
    locale_param_key: &str,
) -> TranslatedVariant {
    TranslatedVariant {
        locale: locale.clone(),
        name: translate_name(route.name(), locale, registry),
        path,
        options_constraints: translate_options_constraints(
            route.options_constraints(),
            locale,
            locale_param_key,
        ),
        options: translate_options(route.options(), locale, locale_param_key),
    }
}

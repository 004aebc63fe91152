//! Path translation backends and the adapter used during generation.
//!
//! [`PathTranslator`] abstracts the backend that rewrites a path template for
//! a locale so route generation stays independent of any concrete catalogue
//! format. The crate ships an in-memory table ([`StaticTranslator`]) and a
//! Fluent-backed catalogue ([`FluentPathTranslator`]). Generation never calls
//! a backend directly; it goes through [`translate_path`], which decides
//! whether a missing translation skips the locale or fails the route.

use thiserror::Error;

use crate::{Locale, LocaleSettings, Route, RouteError, RouteResult};

mod fluent;
mod table;

pub use fluent::{
    CatalogueError, FluentPathTranslator, FluentPathTranslatorBuilder, FormattingIssue,
    FormattingIssueReporter,
};
pub use table::StaticTranslator;

/// Failure reported by a translation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The backend holds no translation for `key` in `locale`.
    #[error("no translation for '{key}' in locale {locale}")]
    Missing {
        /// Locale lacking the translation.
        locale: Locale,
        /// Lookup key that could not be resolved.
        key: String,
    },

    /// Any other backend failure. Never suppressed.
    #[error("translation backend failure for locale {locale}: {message}")]
    Backend {
        /// Locale being translated.
        locale: Locale,
        /// Backend diagnostic.
        message: String,
    },
}

/// Translates route path templates into locale-specific paths.
///
/// Implementations must be deterministic: generation translates the same
/// path for the same locale more than once and relies on identical results.
/// The trait is object-safe so hosts can keep a backend behind
/// `Arc<dyn PathTranslator>`.
pub trait PathTranslator: Send + Sync {
    /// Translates `path` for `locale` within the optional translation
    /// `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Missing`] when no translation exists and
    /// [`TranslationError::Backend`] for any other failure.
    fn translate(
        &self,
        path: &str,
        locale: &Locale,
        scope: Option<&str>,
    ) -> Result<String, TranslationError>;
}

impl<T: PathTranslator + ?Sized> PathTranslator for std::sync::Arc<T> {
    fn translate(
        &self,
        path: &str,
        locale: &Locale,
        scope: Option<&str>,
    ) -> Result<String, TranslationError> {
        (**self).translate(path, locale, scope)
    }
}

/// Translates the path of `route` for `locale`.
///
/// Returns `Ok(None)` when the backend has no translation and
/// [`LocaleSettings::disable_fallback`] is set, so the caller skips the
/// locale. Without that switch the missing translation becomes
/// [`RouteError::MissingTranslation`]. Backend failures are always errors.
///
/// # Errors
///
/// Returns [`RouteError::MissingTranslation`] or [`RouteError::Backend`] as
/// described above.
pub fn translate_path<T: PathTranslator + ?Sized>(
    backend: &T,
    settings: &LocaleSettings,
    route: &Route,
    locale: &Locale,
) -> RouteResult<Option<String>> {
    match backend.translate(route.path(), locale, route.scope()) {
        Ok(translated) => Ok(Some(translated)),
        Err(TranslationError::Missing { key, .. }) if settings.disable_fallback => {
            tracing::debug!(
                locale = %locale,
                path = route.path(),
                key = %key,
                "skipping locale without translation"
            );
            Ok(None)
        }
        Err(TranslationError::Missing {
            locale: missing,
            key,
        }) => Err(RouteError::MissingTranslation {
            locale: missing,
            path: route.path().to_owned(),
            key,
        }),
        Err(TranslationError::Backend {
            locale: failed,
            message,
        }) => Err(RouteError::Backend {
            locale: failed,
            path: route.path().to_owned(),
            message,
        }),
    }
}

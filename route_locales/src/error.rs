//! Error types produced while loading locale settings and generating routes.

use std::path::PathBuf;

use figment::Error as FigmentError;
use thiserror::Error;

use crate::Locale;

/// Errors that abort settings loading or the generation of a route.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouteError {
    /// A locale has no translation for the route path and missing
    /// translations are not being suppressed.
    #[error("missing translation for '{key}' in locale {locale} while translating '{path}'")]
    MissingTranslation {
        /// Locale that lacks the translation.
        locale: Locale,
        /// Route path template being translated.
        path: String,
        /// Lookup key the backend failed to resolve.
        key: String,
    },

    /// The translation backend failed for a reason other than a missing
    /// translation.
    #[error("translation backend failed for locale {locale} while translating '{path}': {message}")]
    Backend {
        /// Locale being translated.
        locale: Locale,
        /// Route path template being translated.
        path: String,
        /// Backend diagnostic.
        message: String,
    },

    /// Error originating from a settings file.
    #[error("Locale settings file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying read or parse error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while extracting settings from the layered providers.
    #[error("Failed to gather locale settings: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Settings were extracted but hold invalid values.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Settings key that failed validation.
        key: String,
        /// Human-readable explanation of the failure.
        message: String,
    },
}

/// Result alias used throughout the crate.
pub type RouteResult<T> = Result<T, RouteError>;

impl RouteError {
    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use route_locales::RouteError;
    /// let fe = figment::Error::from("boom");
    /// let e = RouteError::gathering(fe);
    /// assert!(matches!(e, RouteError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Construct a validation error for `key`.
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for [`RouteError::MissingTranslation`].
    #[must_use]
    pub const fn is_missing_translation(&self) -> bool {
        matches!(self, Self::MissingTranslation { .. })
    }
}

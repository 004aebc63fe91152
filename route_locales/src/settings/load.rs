//! Layered loading of [`LocaleSettings`] with Figment.
//!
//! Sources are merged in increasing precedence: built-in defaults, an
//! optional settings file, then `ROUTE_LOCALES_*` environment variables.
//!
//! Environment keys are lowercased and cannot contain `-`, so a fallback
//! source set through `ROUTE_LOCALES_FALLBACKS__PT_BR` arrives as `pt_br`.
//! After extraction such sources are re-keyed onto the configured locale
//! with the same identifier (`pt-BR`). A source that matches no configured
//! locale keeps the key it was given.

use std::error::Error;
use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml},
};

use super::{CsvEnv, LocaleSettings};
use crate::{Locale, RouteError, RouteResult};

/// Prefix of the environment variables read by [`LocaleSettings::load`].
pub const ENV_PREFIX: &str = "ROUTE_LOCALES_";

/// Construct a [`RouteError::File`] for a settings path.
fn file_error(path: &Path, err: impl Into<Box<dyn Error + Send + Sync>>) -> RouteError {
    RouteError::File {
        path: path.to_path_buf(),
        source: err.into(),
    }
}

/// Parse settings data according to the file extension.
///
/// `.json` files are parsed as JSON; everything else is treated as TOML.
/// The data is parsed eagerly so syntax errors are reported against the
/// file path instead of surfacing later during extraction.
fn parse_settings_by_format(path: &Path, data: &str) -> RouteResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => {
            serde_json::from_str::<serde_json::Value>(data).map_err(|e| file_error(path, e))?;
            Figment::from(Json::string(data))
        }
        _ => {
            toml::from_str::<toml::Value>(data).map_err(|e| file_error(path, e))?;
            Figment::from(Toml::string(data))
        }
    };
    Ok(figment)
}

/// Reads and parses a settings file.
///
/// # Errors
///
/// Returns [`RouteError::File`] when the file cannot be read or parsed.
pub(super) fn load_settings_file(path: &Path) -> RouteResult<Figment> {
    let data = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
    parse_settings_by_format(path, &data)
}

fn env_provider() -> CsvEnv {
    CsvEnv::prefixed(ENV_PREFIX)
        .split("__")
        .with_list_keys(["available_locales"])
        .with_list_prefixes(["fallbacks"])
}

impl LocaleSettings {
    /// Builds the layered Figment for these settings without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::File`] when `path` is given but cannot be read
    /// or parsed.
    pub fn figment(path: Option<&Path>) -> RouteResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(load_settings_file(file)?);
        }
        Ok(figment.merge(env_provider()))
    }

    /// Extracts and validates settings from `figment`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Gathering`] when extraction fails and
    /// [`RouteError::Validation`] when the extracted values are invalid.
    pub fn from_figment(figment: &Figment) -> RouteResult<Self> {
        let mut settings: Self = figment.extract().map_err(RouteError::gathering)?;
        settings.reconcile_fallback_sources();
        settings.validate()?;
        tracing::debug!(
            default_locale = %settings.default_locale,
            locales = settings.configured_locales().len(),
            deduplicate_routes = settings.deduplicate_routes,
            disable_fallback = settings.disable_fallback,
            "loaded locale settings"
        );
        Ok(settings)
    }

    /// Re-keys fallback sources written in identifier form, such as `pt_br`,
    /// onto the default or available locale with the same identifier.
    ///
    /// A later entry replaces one already stored under the configured tag,
    /// matching the precedence of the environment over the settings file.
    fn reconcile_fallback_sources(&mut self) {
        let configured: Vec<&Locale> = std::iter::once(&self.default_locale)
            .chain(&self.available_locales)
            .collect();
        let renames: Vec<(Locale, Locale)> = self
            .fallbacks
            .keys()
            .filter(|source| !configured.contains(source))
            .filter_map(|source| {
                let identifier = source.identifier();
                configured
                    .iter()
                    .find(|locale| locale.identifier() == identifier)
                    .map(|locale| (source.clone(), (*locale).clone()))
            })
            .collect();
        for (source, locale) in renames {
            if let Some(chain) = self.fallbacks.remove(&source) {
                tracing::debug!(from = %source, to = %locale, "re-keyed fallback source");
                self.fallbacks.insert(locale, chain);
            }
        }
    }

    /// Loads settings from defaults, the optional file at `path` and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Propagates file, extraction and validation failures.
    pub fn load(path: Option<&Path>) -> RouteResult<Self> {
        Self::from_figment(&Self::figment(path)?)
    }
}

//! Locale-aware route generation.
//!
//! A declared [`Route`] is expanded into one [`TranslatedVariant`] per
//! configured locale: the path is rewritten by a [`PathTranslator`], the name
//! gains a locale suffix and the options and constraints carry the locale
//! parameter. Variants are emitted in an order that keeps the default
//! locale's route, usually registered without a locale prefix, from
//! shadowing the others, and redundant variants of plain locales can be
//! dropped when their path is already served.
//!
//! ```rust
//! use route_locales::{LocaleSettings, Route, RouteSet, RouteTranslator, StaticTranslator};
//!
//! # fn main() -> Result<(), route_locales::RouteError> {
//! let settings = LocaleSettings::new("en")
//!     .with_available_locales(["en", "fr", "fr-CA"])
//!     .with_fallbacks("fr-CA", ["fr"])
//!     .with_deduplication(true);
//! let backend = StaticTranslator::new()
//!     .with_passthrough("en")
//!     .with_translation("fr", "/about", "/a-propos")
//!     .with_translation("fr-CA", "/about", "/a-propos");
//!
//! let mut routes = RouteSet::new();
//! let translator = RouteTranslator::new(&settings, &backend);
//! routes.add_localized(&translator, &Route::new("/about").named("about"))?;
//!
//! let names: Vec<_> = routes.routes().iter().filter_map(|v| v.name.as_deref()).collect();
//! assert_eq!(names, ["about_fr", "about_fr_ca", "about_en"]);
//! # Ok(())
//! # }
//! ```

mod dedup;
mod error;
mod generate;
mod locale;
mod ordering;
mod registry;
mod resolver;
mod route_set;
mod settings;
mod translate;
mod variant;

pub use dedup::{DeduplicationPolicy, GeneratedPaths, PathOwners, SeenPaths};
pub use error::{RouteError, RouteResult};
pub use generate::RouteTranslator;
pub use locale::{Locale, normalize_identifier};
pub use ordering::LocaleOrdering;
pub use registry::{CapabilityProbe, RouteRegistry};
pub use resolver::{RouteNameResolver, candidate_name};
pub use route_set::{HELPER_SUFFIXES, RouteSet};
pub use settings::{CsvEnv, DEFAULT_LOCALE_PARAM_KEY, ENV_PREFIX, LocaleSettings};
pub use translate::{
    CatalogueError, FluentPathTranslator, FluentPathTranslatorBuilder, FormattingIssue,
    FormattingIssueReporter, PathTranslator, StaticTranslator, TranslationError, translate_path,
};
pub use unic_langid::LanguageIdentifier;
pub use variant::{
    Constraints, Params, RequestMatcher, Route, TranslatedVariant, build_variant, translate_name,
    translate_options, translate_options_constraints,
};

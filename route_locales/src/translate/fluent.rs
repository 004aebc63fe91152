//! Fluent-backed path translation.
//!
//! Each locale owns one Fluent bundle. A path is translated segment by
//! segment: static segments are looked up as messages, while dynamic
//! segments (`:id`, `*glob`), optional groups (`(.:format)`) and segments
//! that cannot name a Fluent message (`2024`) are kept verbatim. Lookups try `"{scope}.{segment}"` before `"{segment}"`; dotted
//! identifiers are normalized to Fluent's `-` form in both the lookup ids
//! and the loaded resources.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentError, FluentResource};
use fluent_syntax::parser::ParserError;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

use super::{PathTranslator, TranslationError};
use crate::Locale;

/// Captures formatting failures encountered when resolving a segment.
#[derive(Debug, Clone)]
pub struct FormattingIssue {
    /// Message identifier that failed to format.
    pub id: String,
    /// Locale whose catalogue produced the failure.
    pub locale: Locale,
    /// Formatting or resolver errors emitted by Fluent.
    pub errors: Vec<FluentError>,
}

/// Reporter invoked when Fluent raises formatting errors.
pub type FormattingIssueReporter = Arc<dyn Fn(&FormattingIssue) + Send + Sync>;

/// Errors surfaced when constructing a [`FluentPathTranslator`].
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The locale tag is not a valid language identifier.
    #[error("locale {locale} is not a valid language identifier")]
    InvalidLocale {
        /// Offending locale.
        locale: Locale,
    },

    /// Failed to parse Fluent text into resources.
    #[error("failed to parse route catalogue for {locale}")]
    Parser {
        /// Locale associated with the catalogue.
        locale: Locale,
        /// Parser errors emitted by Fluent.
        errors: Vec<ParserError>,
    },

    /// Fluent rejected a resource while registering it in the bundle.
    #[error("failed to register route catalogue for {locale}")]
    Registration {
        /// Locale associated with the catalogue.
        locale: Locale,
        /// Errors returned by Fluent during registration.
        errors: Vec<FluentError>,
    },
}

struct Catalogue {
    language: LanguageIdentifier,
    bundle: FluentBundle<Arc<FluentResource>>,
}

impl fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalogue")
            .field("language", &self.language)
            .field("bundle", &"<fluent bundle>")
            .finish()
    }
}

/// Path translator backed by per-locale Fluent catalogues.
pub struct FluentPathTranslator {
    catalogues: HashMap<Locale, Catalogue>,
    passthrough: HashSet<Locale>,
    report_issue: FormattingIssueReporter,
}

/// Builds a [`FluentPathTranslator`].
pub struct FluentPathTranslatorBuilder {
    resources: Vec<(Locale, Vec<String>)>,
    passthrough: HashSet<Locale>,
    report_issue: FormattingIssueReporter,
}

impl FluentPathTranslator {
    /// Starts building a translator.
    ///
    /// # Examples
    /// ```rust
    /// use route_locales::{FluentPathTranslator, Locale, PathTranslator};
    ///
    /// let translator = FluentPathTranslator::builder()
    ///     .with_catalogue("fr", ["about = a-propos"])
    ///     .with_passthrough("en")
    ///     .try_build()
    ///     .expect("catalogue should parse");
    /// let fr = translator.translate("/about", &Locale::new("fr"), None);
    /// assert_eq!(fr.as_deref(), Ok("/a-propos"));
    /// ```
    #[must_use]
    pub fn builder() -> FluentPathTranslatorBuilder {
        FluentPathTranslatorBuilder::new()
    }

    fn translate_segment(
        &self,
        catalogue: &Catalogue,
        locale: &Locale,
        segment: &str,
        scope: Option<&str>,
    ) -> Result<String, TranslationError> {
        let (head, tail) = segment
            .find('(')
            .map_or((segment, ""), |idx| segment.split_at(idx));
        if is_verbatim(head) {
            return Ok(segment.to_owned());
        }

        let ids = lookup_ids(head, scope);
        for id in &ids {
            let Some(pattern) = catalogue
                .bundle
                .get_message(id)
                .and_then(|message| message.value())
            else {
                continue;
            };

            let mut errors = Vec::new();
            let rendered = catalogue.bundle.format_pattern(pattern, None, &mut errors);
            if errors.is_empty() {
                let mut translated = rendered.into_owned();
                translated.push_str(tail);
                return Ok(translated);
            }

            (self.report_issue)(&FormattingIssue {
                id: id.clone(),
                locale: locale.clone(),
                errors,
            });
        }

        Err(TranslationError::Missing {
            locale: locale.clone(),
            key: ids.into_iter().next().unwrap_or_else(|| head.to_owned()),
        })
    }
}

impl PathTranslator for FluentPathTranslator {
    fn translate(
        &self,
        path: &str,
        locale: &Locale,
        scope: Option<&str>,
    ) -> Result<String, TranslationError> {
        if self.passthrough.contains(locale) {
            return Ok(path.to_owned());
        }
        let Some(catalogue) = self.catalogues.get(locale) else {
            return Err(TranslationError::Missing {
                locale: locale.clone(),
                key: path.to_owned(),
            });
        };

        let segments = path
            .split('/')
            .map(|segment| self.translate_segment(catalogue, locale, segment, scope))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(segments.join("/"))
    }
}

impl fmt::Debug for FluentPathTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locales: Vec<&Locale> = self.catalogues.keys().collect();
        locales.sort();
        f.debug_struct("FluentPathTranslator")
            .field("catalogues", &locales)
            .field("passthrough", &self.passthrough)
            .field("report_issue", &"<formatter>")
            .finish()
    }
}

impl FluentPathTranslatorBuilder {
    /// Creates a builder without catalogues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            passthrough: HashSet::new(),
            report_issue: default_reporter(),
        }
    }

    /// Adds Fluent resources for `locale`. Repeated calls for the same
    /// locale layer further resources into the same bundle.
    #[must_use]
    pub fn with_catalogue<I, S>(mut self, locale: impl Into<Locale>, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tag = locale.into();
        let sources = resources.into_iter().map(Into::into);
        if let Some((_, existing)) = self.resources.iter_mut().find(|(known, _)| *known == tag) {
            existing.extend(sources);
        } else {
            self.resources.push((tag, sources.collect()));
        }
        self
    }

    /// Keeps path templates unchanged for `locale`, typically the default
    /// locale whose routes are declared in its language.
    #[must_use]
    pub fn with_passthrough(mut self, locale: impl Into<Locale>) -> Self {
        self.passthrough.insert(locale.into());
        self
    }

    /// Installs a hook to report formatting issues surfaced by Fluent.
    #[must_use]
    pub fn with_error_reporter(mut self, reporter: FormattingIssueReporter) -> Self {
        self.report_issue = reporter;
        self
    }

    /// Builds the translator, parsing every catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] when a locale tag is invalid or a resource
    /// fails to parse or register.
    pub fn try_build(self) -> Result<FluentPathTranslator, CatalogueError> {
        let mut catalogues = HashMap::with_capacity(self.resources.len());
        for (locale, resources) in self.resources {
            let catalogue = catalogue_from_resources(&locale, &resources)?;
            catalogues.insert(locale, catalogue);
        }
        Ok(FluentPathTranslator {
            catalogues,
            passthrough: self.passthrough,
            report_issue: self.report_issue,
        })
    }
}

impl Default for FluentPathTranslatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FluentPathTranslatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentPathTranslatorBuilder")
            .field("catalogues_len", &self.resources.len())
            .field("passthrough", &self.passthrough)
            .field("report_issue", &"<formatter>")
            .finish()
    }
}

#[must_use]
fn default_reporter() -> FormattingIssueReporter {
    Arc::new(|issue: &FormattingIssue| {
        tracing::warn!(
            id = %issue.id,
            locale = %issue.locale,
            errors = ?issue.errors,
            "failed to format route segment"
        );
    })
}

fn catalogue_from_resources(
    locale: &Locale,
    resources: &[String],
) -> Result<Catalogue, CatalogueError> {
    let language = locale
        .language_identifier()
        .map_err(|_| CatalogueError::InvalidLocale {
            locale: locale.clone(),
        })?;
    let mut bundle = FluentBundle::new_concurrent(vec![language.clone()]);
    bundle.set_use_isolating(false);
    for resource in resources {
        let parsed = Arc::new(
            FluentResource::try_new(normalize_resource_ids(resource)).map_err(
                |(_resource, errors)| CatalogueError::Parser {
                    locale: locale.clone(),
                    errors,
                },
            )?,
        );

        bundle
            .add_resource(parsed)
            .map_err(|errors| CatalogueError::Registration {
                locale: locale.clone(),
                errors,
            })?;
    }

    Ok(Catalogue { language, bundle })
}

/// Dynamic segments, empty segments and segments that are not Fluent
/// identifiers, such as `2024`, are never translated.
fn is_verbatim(segment: &str) -> bool {
    segment.is_empty()
        || segment.starts_with([':', '*'])
        || !is_valid_fluent_identifier(&normalize_identifier(segment))
}

fn lookup_ids(segment: &str, scope: Option<&str>) -> Vec<String> {
    let mut ids = Vec::with_capacity(2);
    if let Some(scoped) = scope.filter(|scope| !scope.is_empty()) {
        let id = normalize_identifier(&format!("{scoped}.{segment}")).into_owned();
        if is_valid_fluent_identifier(&id) {
            ids.push(id);
        }
    }
    let id = normalize_identifier(segment).into_owned();
    if is_valid_fluent_identifier(&id) {
        ids.push(id);
    }
    ids
}

fn normalize_identifier(id: &str) -> Cow<'_, str> {
    if id.contains('.') {
        Cow::Owned(id.replace('.', "-"))
    } else {
        Cow::Borrowed(id)
    }
}

fn normalize_resource_ids(resource: &str) -> String {
    resource
        .lines()
        .map(normalize_id_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_valid_fluent_id_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.')
}

/// Fluent identifiers start with a letter followed by letters, digits, `-`,
/// `_` or `.`.
fn is_valid_fluent_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_alphabetic() && chars.all(is_valid_fluent_id_char)
}

fn normalize_id_line(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return line.to_owned();
    }

    let Some((left, right)) = line.split_once('=') else {
        return line.to_owned();
    };

    // Indented lines belong to message bodies, attributes or variants.
    if left.chars().next().is_some_and(char::is_whitespace) {
        return line.to_owned();
    }

    let id_segment = left.trim_end();
    if !is_valid_fluent_identifier(id_segment) {
        return line.to_owned();
    }

    let normalised_id = normalize_identifier(id_segment).into_owned();
    let trailing_ws = left.strip_prefix(id_segment).unwrap_or_default();

    let mut rebuilt = String::with_capacity(line.len());
    rebuilt.push_str(&normalised_id);
    rebuilt.push_str(trailing_ws);
    rebuilt.push('=');
    rebuilt.push_str(right);
    rebuilt
}

//! Validation of placeholder-templated hrefs.
//!
//! An href may carry at most one `{name}` placeholder, and only as its final
//! segment (trailing slashes are not counted). Once the placeholder and any
//! trailing slashes are removed, what remains must be a well-formed absolute
//! or relative URI reference (RFC 3986, with the RFC 3987 extension to
//! non-ASCII characters).

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::ErrorKind;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("this must never fail"));

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("this must never fail"));

/// Characters permitted in a URI reference: unreserved, reserved, percent
/// escapes and (for IRIs) any non-ASCII character.
static URI_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9\-._~!$&'()*+,;=:@/?#\[\]]|%[0-9A-Fa-f]{2}|[^\x00-\x7F])*$")
        .expect("this must never fail")
});

/// How an href is templated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Templating {
    /// The href has no placeholder.
    Plain,
    /// The href ends in a single placeholder.
    Trailing,
}

impl Templating {
    /// Whether the href carries a placeholder.
    #[must_use]
    pub const fn is_templated(self) -> bool {
        matches!(self, Self::Trailing)
    }
}

/// Errors raised while validating an href.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The href is empty.
    #[error("href must not be empty")]
    Empty,

    /// More than one placeholder span was found.
    #[error("href '{href}' contains {count} template placeholders, only 1 is allowed")]
    TooManyPlaceholders {
        /// The offending href.
        href: String,
        /// Number of placeholder spans found.
        count: usize,
    },

    /// The href, stripped of its placeholder, is not a URI reference.
    #[error("href '{0}' does not meet RFC 3986 and RFC 3987 standards")]
    Malformed(String),

    /// The placeholder is not the final token of the href.
    #[error("the template placeholder must be at the end of href '{0}'")]
    PlaceholderNotTrailing(String),

    /// A placeholder was required but none was found.
    #[error("href '{0}' must end in a single template placeholder")]
    NotTemplated(String),
}

impl TemplateError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty
            | Self::TooManyPlaceholders { .. }
            | Self::Malformed(_)
            | Self::PlaceholderNotTrailing(_)
            | Self::NotTemplated(_) => ErrorKind::Invalid,
        }
    }
}

/// Validates an href which may optionally end in a single placeholder.
///
/// # Errors
///
/// Returns an error if the href is empty, has more than one placeholder, is
/// not a well-formed URI reference once the placeholder is removed, or has a
/// placeholder anywhere other than at its end.
pub fn validate(href: &str) -> Result<Templating, TemplateError> {
    if href.is_empty() {
        return Err(TemplateError::Empty);
    }

    let count = PLACEHOLDER.find_iter(href).count();
    if count > 1 {
        return Err(TemplateError::TooManyPlaceholders {
            href: href.to_string(),
            count,
        });
    }

    let residual = PLACEHOLDER.replace_all(href, "");
    if !is_uri_reference(residual.trim_end_matches('/')) {
        return Err(TemplateError::Malformed(href.to_string()));
    }

    if count == 0 {
        return Ok(Templating::Plain);
    }

    if placeholder_is_trailing(href) {
        Ok(Templating::Trailing)
    } else {
        Err(TemplateError::PlaceholderNotTrailing(href.to_string()))
    }
}

/// Validates an href which must end in exactly one placeholder.
///
/// # Errors
///
/// Returns [`TemplateError::NotTemplated`] for an otherwise valid href with
/// no placeholder, and any error [`validate`] returns.
pub fn validate_templated(href: &str) -> Result<(), TemplateError> {
    match validate(href)? {
        Templating::Trailing => Ok(()),
        Templating::Plain => Err(TemplateError::NotTemplated(href.to_string())),
    }
}

/// Whether `href` contains exactly one placeholder and it is the final token.
///
/// This does not check that the rest of the href is a URI reference.
#[must_use]
pub fn has_single_trailing_placeholder(href: &str) -> bool {
    PLACEHOLDER.find_iter(href).count() == 1 && placeholder_is_trailing(href)
}

fn placeholder_is_trailing(href: &str) -> bool {
    let trimmed = href.trim_end_matches('/');
    PLACEHOLDER
        .find(trimmed)
        .is_some_and(|m| m.end() == trimmed.len())
}

fn is_uri_reference(candidate: &str) -> bool {
    if !URI_CHARS.is_match(candidate) || candidate.matches('#').count() > 1 {
        return false;
    }

    if SCHEME.is_match(candidate) {
        Url::parse(candidate).is_ok()
    } else {
        // brackets are only meaningful in the authority of an absolute URI
        !candidate.contains(['[', ']'])
    }
}

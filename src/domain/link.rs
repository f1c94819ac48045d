use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::template::{self, TemplateError};

/// A hyperlink from a document to a related resource.
///
/// The href is validated on construction: it must be a well-formed URI
/// reference carrying at most one `{placeholder}`, and only as its final
/// segment. Trailing slashes are removed. A link whose href ends in a
/// placeholder is `templated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
    templated: bool,

    /// Human-readable title of the link.
    pub title: Option<String>,
}

impl Link {
    /// Creates a link without a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the href is empty, malformed, or carries a
    /// placeholder anywhere other than at its end.
    pub fn new(href: &str) -> Result<Self, TemplateError> {
        let templating = template::validate(href)?;

        Ok(Self {
            href: strip_trailing_slashes(href).to_string(),
            templated: templating.is_templated(),
            title: None,
        })
    }

    /// Creates a link with a title.
    ///
    /// # Errors
    ///
    /// See [`Link::new`].
    pub fn with_title(href: &str, title: impl Into<String>) -> Result<Self, TemplateError> {
        let mut link = Self::new(href)?;
        link.title = Some(title.into());
        Ok(link)
    }

    /// The target of the link, without trailing slashes.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Whether the href ends in a template placeholder.
    #[must_use]
    pub const fn templated(&self) -> bool {
        self.templated
    }

    /// The title of the link, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether `href`, if parsed again, is a single-trailing-placeholder
    /// template.
    pub(crate) fn contains_valid_placeholder(href: &str) -> bool {
        template::has_single_trailing_placeholder(href)
    }

    /// Writes the link's members into an open serde map.
    pub(crate) fn serialize_members<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("href", &self.href)?;
        if self.templated {
            map.serialize_entry("templated", &true)?;
        }
        if let Some(title) = &self.title {
            map.serialize_entry("title", title)?;
        }
        Ok(())
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_members(&mut map)?;
        map.end()
    }
}

impl TryFrom<&str> for Link {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Removes trailing slashes, keeping a lone root `/`.
fn strip_trailing_slashes(href: &str) -> &str {
    let trimmed = href.trim_end_matches('/');
    if trimmed.is_empty() { &href[..1] } else { trimmed }
}

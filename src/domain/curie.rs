use std::fmt;

use non_empty_string::NonEmptyString;

use crate::domain::{
    ErrorKind,
    template::{self, TemplateError},
};

/// A compact URI prefix declaration.
///
/// A curie pairs a short key with an href template which must end in exactly
/// one placeholder, e.g. `acme` → `/rels/{rel}`. Relation names such as
/// `acme:orders` can then be expanded by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curie {
    key: NonEmptyString,
    href: String,
}

impl Curie {
    /// Creates a curie.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, or if the href is not a
    /// well-formed URI reference ending in a single template placeholder.
    pub fn new(key: impl Into<String>, href: &str) -> Result<Self, CurieError> {
        let key = NonEmptyString::new(key.into()).map_err(|_| CurieError::EmptyKey)?;
        template::validate_templated(href)?;

        Ok(Self {
            key,
            href: href.to_string(),
        })
    }

    /// The short name of the curie.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The href template, as given.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} → {}", self.key, self.href)
    }
}

/// Errors raised while constructing a [`Curie`] or a
/// [`CurieLink`](crate::domain::CurieLink).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CurieError {
    /// The curie key is empty.
    #[error("curie key must not be empty")]
    EmptyKey,

    /// The curie link name is empty.
    #[error("curie link name must not be empty")]
    EmptyName,

    /// The href is not a valid curie template.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl CurieError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyKey | Self::EmptyName => ErrorKind::Invalid,
            Self::Template(error) => error.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn empty_key_fails() {
        let error = Curie::new("", "/api/orders/{order-id}").unwrap_err();
        assert_eq!(error, CurieError::EmptyKey);
        assert_eq!(error.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn empty_href_fails() {
        assert_eq!(
            Curie::new("XX", ""),
            Err(CurieError::Template(TemplateError::Empty))
        );
    }

    #[test]
    fn nonsense_href_fails() {
        let error = Curie::new("XX", "I'm just some text").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Invalid);
    }

    #[test_case("/api/orders/{order-id}"; "relative")]
    #[test_case("http://www.myapi.com/api/orders/{order-id}"; "absolute")]
    fn valid_curie_is_created(href: &str) {
        let curie = Curie::new("XX", href).unwrap();
        assert_eq!(curie.key(), "XX");
        assert_eq!(curie.href(), href);
    }

    #[test]
    fn untemplated_href_fails_where_a_link_would_not() {
        let href = "http://www.myapi.com/api/orders/123";
        assert!(crate::domain::Link::new(href).is_ok());
        assert!(matches!(
            Curie::new("XX", href),
            Err(CurieError::Template(TemplateError::NotTemplated(_)))
        ));
    }

    #[test]
    fn more_than_one_placeholder_fails() {
        assert!(matches!(
            Curie::new("XX", "http://www.myapi.com/api/{category}/{category-id}"),
            Err(CurieError::Template(
                TemplateError::TooManyPlaceholders { .. }
            ))
        ));
    }

    #[test]
    fn placeholder_in_middle_fails() {
        assert!(matches!(
            Curie::new("XX", "http://www.myapi.com/api/{category}/123"),
            Err(CurieError::Template(TemplateError::PlaceholderNotTrailing(
                _
            )))
        ));
    }
}

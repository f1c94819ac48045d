use std::ops::Deref;

use non_empty_string::NonEmptyString;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::{
    Curie, Link,
    curie::CurieError,
    template::TemplateError,
};

/// The link a [`Curie`] is stored as within a document's `curies` relation.
///
/// A curie link is a [`Link`] with a name, and it is always templated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurieLink {
    name: NonEmptyString,
    link: Link,
}

impl CurieLink {
    /// Creates a curie link.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, if the href is not a valid
    /// [`Link`] href, or if it does not end in a single placeholder.
    pub fn new(name: impl Into<String>, href: &str) -> Result<Self, CurieError> {
        let name = NonEmptyString::new(name.into()).map_err(|_| CurieError::EmptyName)?;
        let link = Link::new(href)?;

        if !Link::contains_valid_placeholder(href) {
            return Err(TemplateError::NotTemplated(href.to_string()).into());
        }

        Ok(Self { name, link })
    }

    /// The short name of the curie.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The underlying link.
    #[must_use]
    pub const fn link(&self) -> &Link {
        &self.link
    }
}

impl Deref for CurieLink {
    type Target = Link;

    fn deref(&self) -> &Self::Target {
        &self.link
    }
}

impl TryFrom<&Curie> for CurieLink {
    type Error = CurieError;

    fn try_from(curie: &Curie) -> Result<Self, Self::Error> {
        Self::new(curie.key(), curie.href())
    }
}

impl Serialize for CurieLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.link.serialize_members(&mut map)?;
        map.serialize_entry("name", self.name.as_str())?;
        map.end()
    }
}

//! The HAL document.
//!
//! A [`HalGraph`] is an ordered map seeded with the projected properties of
//! one model. Links are kept in a `_links` section which, once created, is
//! always the first key; embedded documents are kept in an `_embedded`
//! section which, once created, is always the last key.
//!
//! Every mutating call validates its arguments before touching the document,
//! so a failed call leaves it exactly as it was.

use std::borrow::Borrow;

use crate::domain::{
    Curie, CurieLink, ErrorKind, Link, OrderedMap, PropertyMap, Value,
    curie::CurieError,
    projection::{ExclusionPolicy, Model, ModelProjector, ModelType, ProjectionError},
};

/// Key of the links section.
pub const LINKS_KEY: &str = "_links";

/// Key of the embedded section.
pub const EMBEDDED_KEY: &str = "_embedded";

/// Relation under which curies are stored.
pub const CURIES_REL: &str = "curies";

/// A single value, or an ordered sequence of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// An ordered sequence of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Appends `item`, promoting a single value to a sequence.
    pub fn push(&mut self, item: T) {
        let items = match std::mem::replace(self, Self::Many(Vec::new())) {
            Self::One(first) => vec![first, item],
            Self::Many(mut items) => {
                items.push(item);
                items
            }
        };
        *self = Self::Many(items);
    }

    /// The values, in order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    /// The number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no values.
    ///
    /// Only an empty [`OneOrMany::Many`] can be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// The links stored under one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Ordinary links.
    Links(OneOrMany<Link>),
    /// The reserved `curies` relation, which is always a sequence.
    Curies(Vec<CurieLink>),
}

/// An entry in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A projected model property.
    Property(Value),
    /// The `_links` section, keyed by relation.
    Links(OrderedMap<Relation>),
    /// The `_embedded` section, keyed by item key.
    Embedded(OrderedMap<OneOrMany<HalGraph>>),
}

/// Errors raised while building a document.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    /// The model could not be projected.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// A model property uses a key reserved for a document section.
    #[error("model property '{0}' collides with a reserved document key")]
    ReservedProperty(String),

    /// The relation name is empty.
    #[error("link relation must not be empty")]
    EmptyRelation,

    /// Ordinary links cannot be added under the curies relation.
    #[error("relation 'curies' is reserved for curies")]
    ReservedRelation,

    /// No links were supplied.
    #[error("at least one link is required for relation '{0}'")]
    NoLinks(String),

    /// No curies were supplied.
    #[error("at least one curie is required")]
    NoCuries,

    /// A curie could not be converted to a curie link.
    #[error(transparent)]
    Curie(#[from] CurieError),

    /// The embedded item key is empty or blank.
    #[error("embedded item key must not be blank")]
    BlankEmbeddedKey,

    /// An embedded item already exists under the key.
    #[error("an embedded item with key '{0}' already exists")]
    DuplicateEmbeddedKey(String),

    /// No embedded documents were supplied.
    #[error("embedded collection '{0}' must contain at least one item")]
    EmptyCollection(String),

    /// The embedded documents were projected from different model types.
    #[error(
        "embedded collection '{key}' must represent a single model type, found {expected} and {found}"
    )]
    MixedCollection {
        /// The embedded item key.
        key: String,
        /// The model type of the first document.
        expected: ModelType,
        /// The first differing model type.
        found: ModelType,
    },
}

impl GraphError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Projection(error) => error.kind(),
            Self::Curie(error) => error.kind(),
            _ => ErrorKind::Invalid,
        }
    }
}

/// A HAL document built from a domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct HalGraph {
    model_type: ModelType,
    entries: OrderedMap<Node>,
}

impl HalGraph {
    /// Projects `model` into a new document.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is a collection, describes a field twice,
    /// or has a property named `_links` or `_embedded`.
    pub fn new<M: Model + ?Sized>(model: &M) -> Result<Self, GraphError> {
        Self::with_projector(model, &ModelProjector::new())
    }

    /// Projects `model` into a new document using `projector`.
    ///
    /// # Errors
    ///
    /// See [`HalGraph::new`].
    pub fn with_projector<M, E>(model: &M, projector: &ModelProjector<E>) -> Result<Self, GraphError>
    where
        M: Model + ?Sized,
        E: ExclusionPolicy,
    {
        let properties = projector.project(model)?;
        Self::from_properties(model.model_type(), properties)
    }

    /// Creates a document from already projected properties.
    ///
    /// # Errors
    ///
    /// Returns an error if a property is named `_links` or `_embedded`.
    pub fn from_properties(
        model_type: ModelType,
        properties: PropertyMap,
    ) -> Result<Self, GraphError> {
        if let Some(key) = [LINKS_KEY, EMBEDDED_KEY]
            .into_iter()
            .find(|key| properties.contains_key(key))
        {
            return Err(GraphError::ReservedProperty(key.to_string()));
        }

        let entries = properties
            .into_iter()
            .map(|(key, value)| (key, Node::Property(value)))
            .collect();

        Ok(Self {
            model_type,
            entries,
        })
    }

    /// The type of the model this document was projected from.
    #[must_use]
    pub const fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// Adds a link under `rel`.
    ///
    /// The first link under a relation is stored on its own; adding a second
    /// promotes the relation to an ordered sequence, and later links are
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns an error if `rel` is empty or is the reserved `curies`
    /// relation.
    pub fn add_link(&mut self, rel: &str, link: Link) -> Result<&mut Self, GraphError> {
        check_relation(rel)?;
        self.push_link(rel, link);
        Ok(self)
    }

    /// Adds each of `links` under `rel`, in order, as [`HalGraph::add_link`]
    /// would.
    ///
    /// # Errors
    ///
    /// Returns an error if `rel` is invalid or `links` is empty.
    pub fn add_links<I>(&mut self, rel: &str, links: I) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = Link>,
    {
        check_relation(rel)?;
        let links: Vec<Link> = links.into_iter().collect();
        if links.is_empty() {
            return Err(GraphError::NoLinks(rel.to_string()));
        }

        for link in links {
            self.push_link(rel, link);
        }
        Ok(self)
    }

    /// Declares a curie, stored as a [`CurieLink`] under the `curies`
    /// relation.
    ///
    /// # Errors
    ///
    /// Returns an error if the curie cannot be represented as a curie link.
    pub fn add_curie(&mut self, curie: &Curie) -> Result<&mut Self, GraphError> {
        self.add_curies([curie])
    }

    /// Declares each of `curies`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if `curies` is empty or any curie cannot be
    /// represented as a curie link. In either case no curie is added.
    pub fn add_curies<I, C>(&mut self, curies: I) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = C>,
        C: Borrow<Curie>,
    {
        let curie_links = curies
            .into_iter()
            .map(|curie| CurieLink::try_from(curie.borrow()))
            .collect::<Result<Vec<_>, _>>()?;
        if curie_links.is_empty() {
            return Err(GraphError::NoCuries);
        }

        let links = self.links_section();
        match links.get_mut(CURIES_REL) {
            Some(Relation::Curies(existing)) => existing.extend(curie_links),
            Some(Relation::Links(_)) => unreachable!("ordinary links are never stored as curies"),
            None => {
                links.insert(CURIES_REL, Relation::Curies(curie_links));
            }
        }
        Ok(self)
    }

    /// Embeds `child` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is blank or already embedded.
    pub fn add_embedded_item(&mut self, key: &str, child: Self) -> Result<&mut Self, GraphError> {
        self.check_embedded_key(key)?;
        self.embedded_section()
            .insert(key, OneOrMany::One(child));
        Ok(self)
    }

    /// Embeds `children` as a collection under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is blank or already embedded, if `children`
    /// is empty, or if the children were projected from different model
    /// types.
    pub fn add_embedded_item_collection<I>(
        &mut self,
        key: &str,
        children: I,
    ) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = Self>,
    {
        self.check_embedded_key(key)?;

        let children: Vec<Self> = children.into_iter().collect();
        let Some(first) = children.first() else {
            return Err(GraphError::EmptyCollection(key.to_string()));
        };
        if let Some(other) = children
            .iter()
            .find(|child| child.model_type != first.model_type)
        {
            return Err(GraphError::MixedCollection {
                key: key.to_string(),
                expected: first.model_type.clone(),
                found: other.model_type.clone(),
            });
        }

        self.embedded_section()
            .insert(key, OneOrMany::Many(children));
        Ok(self)
    }

    /// The entry stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// The projected property stored under `key`.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key)? {
            Node::Property(value) => Some(value),
            _ => None,
        }
    }

    /// The `_links` section, if any link or curie has been added.
    #[must_use]
    pub fn links(&self) -> Option<&OrderedMap<Relation>> {
        match self.entries.get(LINKS_KEY)? {
            Node::Links(links) => Some(links),
            _ => None,
        }
    }

    /// The ordinary links under `rel`.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&OneOrMany<Link>> {
        match self.links()?.get(rel)? {
            Relation::Links(links) => Some(links),
            Relation::Curies(_) => None,
        }
    }

    /// The declared curies, in order.
    #[must_use]
    pub fn curies(&self) -> &[CurieLink] {
        match self.links().and_then(|links| links.get(CURIES_REL)) {
            Some(Relation::Curies(curies)) => curies,
            _ => &[],
        }
    }

    /// The `_embedded` section, if anything has been embedded.
    #[must_use]
    pub fn embedded(&self) -> Option<&OrderedMap<OneOrMany<Self>>> {
        match self.entries.get(EMBEDDED_KEY)? {
            Node::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    /// The document or documents embedded under `key`.
    #[must_use]
    pub fn embedded_item(&self, key: &str) -> Option<&OneOrMany<Self>> {
        self.embedded()?.get(key)
    }

    /// Iterates over the top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Iterates over the top-level entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter()
    }

    fn push_link(&mut self, rel: &str, link: Link) {
        let links = self.links_section();
        match links.get_mut(rel) {
            Some(Relation::Links(existing)) => existing.push(link),
            Some(Relation::Curies(_)) => unreachable!("relation was checked against curies"),
            None => {
                links.insert(rel, Relation::Links(OneOrMany::One(link)));
            }
        }
    }

    fn links_section(&mut self) -> &mut OrderedMap<Relation> {
        if !self.entries.contains_key(LINKS_KEY) {
            self.entries
                .insert_at(0, LINKS_KEY, Node::Links(OrderedMap::new()));
        }
        match self.entries.get_mut(LINKS_KEY) {
            Some(Node::Links(links)) => links,
            _ => unreachable!("the links section was inserted above"),
        }
    }

    fn embedded_section(&mut self) -> &mut OrderedMap<OneOrMany<Self>> {
        if !self.entries.contains_key(EMBEDDED_KEY) {
            self.entries
                .insert(EMBEDDED_KEY, Node::Embedded(OrderedMap::new()));
        }
        match self.entries.get_mut(EMBEDDED_KEY) {
            Some(Node::Embedded(embedded)) => embedded,
            _ => unreachable!("the embedded section was inserted above"),
        }
    }

    fn check_embedded_key(&self, key: &str) -> Result<(), GraphError> {
        if key.trim().is_empty() {
            return Err(GraphError::BlankEmbeddedKey);
        }
        if self
            .embedded()
            .is_some_and(|embedded| embedded.contains_key(key))
        {
            return Err(GraphError::DuplicateEmbeddedKey(key.to_string()));
        }
        Ok(())
    }
}

fn check_relation(rel: &str) -> Result<(), GraphError> {
    if rel.is_empty() {
        Err(GraphError::EmptyRelation)
    } else if rel == CURIES_REL {
        Err(GraphError::ReservedRelation)
    } else {
        Ok(())
    }
}

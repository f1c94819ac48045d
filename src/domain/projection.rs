//! Projection of domain models into ordered property maps.
//!
//! Rust has no runtime reflection, so a model describes its own fields by
//! implementing [`Model`]. The [`ModelProjector`] walks that description and
//! produces a [`PropertyMap`], applying these rules to every field in order:
//!
//! 1. fields the [`ExclusionPolicy`] rejects are skipped;
//! 2. absent values become [`Value::Null`];
//! 3. primitives (booleans, integers, floats) are stored verbatim;
//! 4. atomic values (text, decimals, UUIDs, timestamps, durations, URIs) are
//!    stored verbatim;
//! 5. value-like structs are expanded field by field, private fields
//!    included;
//! 6. any other nested model is projected recursively.
//!
//! A model which is itself a collection cannot be projected; collections
//! belong in a document's embedded section.

use std::{any::type_name, borrow::Cow, fmt};

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use crate::domain::{ErrorKind, PropertyMap, Value};

/// Identifies the type a document was projected from.
///
/// Statically typed models use their Rust type name. Dynamic models (such as
/// JSON documents) supply their own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelType(Cow<'static, str>);

impl ModelType {
    /// The tag for the Rust type `M`.
    #[must_use]
    pub fn of<M: ?Sized>() -> Self {
        Self(Cow::Borrowed(type_name::<M>()))
    }

    /// A tag with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The tag as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A type whose fields can be projected into a document.
///
/// # Examples
///
/// ```
/// use halgraph::domain::{Fields, Model, ModelProjector, Value};
///
/// struct Order {
///     id: u32,
///     reference: String,
///     internal_notes: String,
/// }
///
/// impl Model for Order {
///     fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
///         fields
///             .field("Id", self.id)
///             .field("Reference", self.reference.as_str())
///             .excluded("InternalNotes", self.internal_notes.as_str());
///     }
/// }
///
/// let order = Order {
///     id: 7,
///     reference: "A-7".to_string(),
///     internal_notes: "call first".to_string(),
/// };
///
/// let properties = ModelProjector::new().project(&order).unwrap();
/// assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["Id", "Reference"]);
/// assert_eq!(properties.get("Id"), Some(&Value::Int(7)));
/// ```
pub trait Model {
    /// Enumerates the model's fields, in declaration order.
    fn describe<'a>(&'a self, fields: &mut Fields<'a>);

    /// The type tag recorded on documents projected from this model.
    fn model_type(&self) -> ModelType {
        ModelType::of::<Self>()
    }

    /// Whether the model is a collection of other models.
    fn is_collection(&self) -> bool {
        false
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
        (**self).describe(fields);
    }

    fn model_type(&self) -> ModelType {
        (**self).model_type()
    }

    fn is_collection(&self) -> bool {
        (**self).is_collection()
    }
}

/// Describes a field without its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    no_output: bool,
    public: bool,
}

impl FieldDescriptor {
    /// The name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field carries the no-output marker.
    #[must_use]
    pub const fn is_marked_no_output(&self) -> bool {
        self.no_output
    }

    /// Whether the field is publicly readable.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }
}

/// Collects the fields of a model as it describes itself.
#[derive(Default)]
pub struct Fields<'a> {
    fields: Vec<(FieldDescriptor, Property<'a>)>,
}

impl<'a> Fields<'a> {
    /// Adds a public field.
    pub fn field(&mut self, name: impl Into<String>, value: impl Into<Property<'a>>) -> &mut Self {
        self.push(name.into(), value.into(), false, true)
    }

    /// Adds a public field carrying the no-output marker.
    pub fn excluded(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Property<'a>>,
    ) -> &mut Self {
        self.push(name.into(), value.into(), true, true)
    }

    /// Adds a non-public field.
    ///
    /// Non-public fields are only seen when the model is expanded as a
    /// [`Property::Struct`].
    pub fn private(&mut self, name: impl Into<String>, value: impl Into<Property<'a>>) -> &mut Self {
        self.push(name.into(), value.into(), false, false)
    }

    fn push(&mut self, name: String, value: Property<'a>, no_output: bool, public: bool) -> &mut Self {
        self.fields.push((
            FieldDescriptor {
                name,
                no_output,
                public,
            },
            value,
        ));
        self
    }
}

/// A primitive scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
}

/// A value which is stored whole, never expanded into its parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom<'a> {
    /// Text.
    Text(Cow<'a, str>),
    /// A high-precision decimal.
    Decimal(Decimal),
    /// A unique identifier.
    Uuid(Uuid),
    /// An absolute point in time.
    Timestamp(DateTime<Utc>),
    /// A span of time.
    Duration(TimeDelta),
    /// An absolute URI.
    Uri(Cow<'a, Url>),
}

/// The value of a field, as a model describes it.
pub enum Property<'a> {
    /// No value.
    Null,
    /// A primitive scalar.
    Primitive(Primitive),
    /// An atomic value.
    Atom(Atom<'a>),
    /// A value-like struct, expanded field by field including private fields.
    Struct(Box<dyn Model + 'a>),
    /// A nested model, projected recursively.
    Object(Box<dyn Model + 'a>),
    /// A sequence of values.
    Sequence(Vec<Property<'a>>),
}

impl<'a> Property<'a> {
    /// A value-like struct, expanded field by field.
    pub fn value<M: Model + 'a>(model: M) -> Self {
        Self::Struct(Box::new(model))
    }

    /// A nested model, projected recursively.
    pub fn object<M: Model + 'a>(model: M) -> Self {
        Self::Object(Box::new(model))
    }

    /// A sequence of values.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Primitive(primitive) => f.debug_tuple("Primitive").field(primitive).finish(),
            Self::Atom(atom) => f.debug_tuple("Atom").field(atom).finish(),
            Self::Struct(model) => f.debug_tuple("Struct").field(&model.model_type()).finish(),
            Self::Object(model) => f.debug_tuple("Object").field(&model.model_type()).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

macro_rules! primitive_from {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl From<$source> for Property<'_> {
                fn from(value: $source) -> Self {
                    Self::Primitive(Primitive::$variant(<$target>::from(value)))
                }
            }
        )+
    };
}

primitive_from!(Bool(bool): bool);
primitive_from!(Int(i64): i8, i16, i32, i64);
primitive_from!(Int(i64): u8, u16, u32);
primitive_from!(UInt(u64): u64);
primitive_from!(Float(f64): f32, f64);

impl From<usize> for Property<'_> {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl From<isize> for Property<'_> {
    fn from(value: isize) -> Self {
        Self::from(value as i64)
    }
}

impl<'a> From<&'a str> for Property<'a> {
    fn from(value: &'a str) -> Self {
        Self::Atom(Atom::Text(Cow::Borrowed(value)))
    }
}

impl<'a> From<&'a String> for Property<'a> {
    fn from(value: &'a String) -> Self {
        Self::Atom(Atom::Text(Cow::Borrowed(value)))
    }
}

impl From<String> for Property<'_> {
    fn from(value: String) -> Self {
        Self::Atom(Atom::Text(Cow::Owned(value)))
    }
}

impl From<Decimal> for Property<'_> {
    fn from(value: Decimal) -> Self {
        Self::Atom(Atom::Decimal(value))
    }
}

impl From<Uuid> for Property<'_> {
    fn from(value: Uuid) -> Self {
        Self::Atom(Atom::Uuid(value))
    }
}

impl From<DateTime<Utc>> for Property<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Atom(Atom::Timestamp(value))
    }
}

impl From<TimeDelta> for Property<'_> {
    fn from(value: TimeDelta) -> Self {
        Self::Atom(Atom::Duration(value))
    }
}

impl<'a> From<&'a Url> for Property<'a> {
    fn from(value: &'a Url) -> Self {
        Self::Atom(Atom::Uri(Cow::Borrowed(value)))
    }
}

impl From<Url> for Property<'_> {
    fn from(value: Url) -> Self {
        Self::Atom(Atom::Uri(Cow::Owned(value)))
    }
}

impl<'a, T: Into<Self>> From<Option<T>> for Property<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Decides whether a field is left out of the projection.
pub trait ExclusionPolicy {
    /// Whether `field` should be skipped.
    fn is_excluded(&self, field: &FieldDescriptor) -> bool;
}

/// The default policy: skips fields carrying the no-output marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOutput;

impl ExclusionPolicy for NoOutput {
    fn is_excluded(&self, field: &FieldDescriptor) -> bool {
        field.is_marked_no_output()
    }
}

impl<F: Fn(&FieldDescriptor) -> bool> ExclusionPolicy for F {
    fn is_excluded(&self, field: &FieldDescriptor) -> bool {
        self(field)
    }
}

/// Errors raised while projecting a model.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// No model was supplied.
    #[error("a model of type {0} is required")]
    MissingModel(ModelType),

    /// The model is a collection.
    #[error(
        "the model ({0}) should not be a collection, use an embedded collection instead"
    )]
    Collection(ModelType),

    /// A model described the same field twice.
    #[error("field '{field}' is described more than once by {model}")]
    DuplicateField {
        /// The model type.
        model: ModelType,
        /// The repeated field name.
        field: String,
    },
}

impl ProjectionError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingModel(_) => ErrorKind::Missing,
            _ => ErrorKind::Invalid,
        }
    }
}

/// Projects models into property maps.
#[derive(Debug, Default, Clone)]
pub struct ModelProjector<E = NoOutput> {
    exclusion: E,
}

impl ModelProjector {
    /// A projector using the [`NoOutput`] marker policy.
    #[must_use]
    pub const fn new() -> Self {
        Self { exclusion: NoOutput }
    }
}

impl<E: ExclusionPolicy> ModelProjector<E> {
    /// A projector using a custom exclusion policy.
    pub const fn with_exclusion(exclusion: E) -> Self {
        Self { exclusion }
    }

    /// Projects `model` into an ordered property map.
    ///
    /// # Errors
    ///
    /// Returns an error if the model (or any nested object) is a collection,
    /// or if a model describes the same field twice.
    pub fn project<M: Model + ?Sized>(&self, model: &M) -> Result<PropertyMap, ProjectionError> {
        if model.is_collection() {
            return Err(ProjectionError::Collection(model.model_type()));
        }

        let mut fields = Fields::default();
        model.describe(&mut fields);

        let mut map = PropertyMap::with_capacity(fields.fields.len());
        for (descriptor, property) in fields.fields {
            if !descriptor.public || self.exclusion.is_excluded(&descriptor) {
                continue;
            }
            self.store(&mut map, model, descriptor.name, property)?;
        }
        Ok(map)
    }

    /// Expands a value-like struct into a map of all of its fields.
    ///
    /// Exclusion does not apply here: every field, public or not, is kept.
    fn expand_struct(&self, model: &dyn Model) -> Result<PropertyMap, ProjectionError> {
        let mut fields = Fields::default();
        model.describe(&mut fields);

        let mut map = PropertyMap::with_capacity(fields.fields.len());
        for (descriptor, property) in fields.fields {
            self.store(&mut map, model, descriptor.name, property)?;
        }
        Ok(map)
    }

    fn store<M: Model + ?Sized>(
        &self,
        map: &mut PropertyMap,
        model: &M,
        name: String,
        property: Property<'_>,
    ) -> Result<(), ProjectionError> {
        if map.contains_key(&name) {
            return Err(ProjectionError::DuplicateField {
                model: model.model_type(),
                field: name,
            });
        }
        let value = self.convert(property)?;
        map.insert(name, value);
        Ok(())
    }

    fn convert(&self, property: Property<'_>) -> Result<Value, ProjectionError> {
        let value = match property {
            Property::Null => Value::Null,
            Property::Primitive(primitive) => match primitive {
                Primitive::Bool(b) => Value::Bool(b),
                Primitive::Int(i) => Value::Int(i),
                Primitive::UInt(u) => i64::try_from(u).map_or(Value::UInt(u), Value::Int),
                Primitive::Float(f) => Value::Float(f),
            },
            Property::Atom(atom) => match atom {
                Atom::Text(text) => Value::Text(text.into_owned()),
                Atom::Decimal(decimal) => Value::Decimal(decimal),
                Atom::Uuid(uuid) => Value::Uuid(uuid),
                Atom::Timestamp(timestamp) => Value::Timestamp(timestamp),
                Atom::Duration(duration) => Value::Duration(duration),
                Atom::Uri(uri) => Value::Uri(uri.into_owned()),
            },
            Property::Struct(model) => Value::Map(self.expand_struct(model.as_ref())?),
            Property::Object(model) => Value::Map(self.project(model.as_ref())?),
            Property::Sequence(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.convert(item))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(value)
    }
}

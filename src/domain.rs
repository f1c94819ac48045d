//! The document model.
//!
//! This module contains the HAL document graph, the links and curies it
//! carries, the projection of domain models into property maps, and
//! configuration. Nothing here performs I/O or logging.

/// Validation of link href templates.
pub mod template;
pub use template::{TemplateError, Templating};

mod link;
pub use link::Link;

/// Compact URI prefix declarations.
pub mod curie;
pub use curie::{Curie, CurieError};

mod curie_link;
pub use curie_link::CurieLink;

mod ordered_map;
pub use ordered_map::OrderedMap;

mod value;
pub use value::{PropertyMap, Value, format_duration};

/// Projection of models into property maps.
pub mod projection;
pub use projection::{
    ExclusionPolicy, FieldDescriptor, Fields, Model, ModelProjector, ModelType, NoOutput,
    ProjectionError, Property,
};

/// The HAL document graph.
pub mod graph;
pub use graph::{GraphError, HalGraph, Node, OneOrMany, Relation};

mod config;
pub use config::{Config, Naming};

/// The two broad classes of error raised while building a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was absent.
    Missing,
    /// An argument was present but invalid, including empty strings.
    Invalid,
}

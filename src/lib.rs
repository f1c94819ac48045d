//! HAL document graphs
//!
//! Domain models are projected into ordered HAL documents carrying links,
//! curies and embedded resources, and encoded as HAL+JSON.

pub mod domain;
pub use domain::{Config, Curie, CurieLink, HalGraph, Link, Model, ModelProjector};

pub mod encoding;
pub use encoding::Encoder;

/// Resource manifests and JSON-backed models.
pub mod storage;
pub use storage::{JsonModel, Resource};

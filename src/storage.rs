mod json_model;
/// Resource manifests.
pub mod manifest;

pub use json_model::JsonModel;
pub use manifest::{ManifestError, Resource};

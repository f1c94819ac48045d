//! Encoding of documents as HAL+JSON.

mod json;
pub use json::Encoder;

mod naming;
pub use naming::{CamelDash, NameConvention, Verbatim};

use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    domain::{
        Curie, CurieError, ErrorKind, GraphError, HalGraph, Link, ModelType, TemplateError,
    },
    storage::JsonModel,
};

/// A resource described in a manifest file.
///
/// Manifests are written in YAML (JSON is accepted too):
///
/// ```yaml
/// type: order
/// model:
///   OrderNumber: "1"
///   Total: 10.5
/// exclude: [Total]
/// links:
///   - rel: self
///     href: /orders/1
/// curies:
///   - name: acme
///     href: /rels/{rel}
/// embedded:
///   - key: customer
///     item:
///       type: customer
///       model: { Name: Ann }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    /// The model type tag. Embedded collections must share a tag.
    #[serde(rename = "type")]
    pub model_type: String,

    /// The model to project.
    pub model: serde_json::Value,

    /// Names of top-level model properties to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Links, in order.
    #[serde(default)]
    pub links: Vec<LinkEntry>,

    /// Curie declarations, in order.
    #[serde(default)]
    pub curies: Vec<CurieEntry>,

    /// Embedded resources, in order.
    #[serde(default)]
    pub embedded: Vec<EmbeddedEntry>,
}

/// A link in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    /// The link relation.
    pub rel: String,
    /// The link target.
    pub href: String,
    /// An optional title.
    #[serde(default)]
    pub title: Option<String>,
}

/// A curie declaration in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurieEntry {
    /// The short name.
    pub name: String,
    /// The href template.
    pub href: String,
}

/// An embedded resource or collection in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedEntry {
    /// The embedded item key.
    pub key: String,

    /// The embedded content.
    #[serde(flatten)]
    pub content: Embedded,
}

/// The content of an [`EmbeddedEntry`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Embedded {
    /// A single resource.
    Item(Box<Resource>),
    /// A collection of resources of the same type.
    Items(Vec<Resource>),
}

/// Errors raised while loading or building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The manifest is not valid YAML or does not describe a resource.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The model is neither an object nor an array.
    #[error("the model of a '{0}' resource must be an object")]
    ScalarModel(String),

    /// A link href is invalid.
    #[error("invalid link '{rel}': {source}")]
    Link {
        /// The link relation.
        rel: String,
        /// The underlying error.
        source: TemplateError,
    },

    /// A curie is invalid.
    #[error(transparent)]
    Curie(#[from] CurieError),

    /// The document could not be built.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ManifestError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorKind::Missing
            }
            Self::Parse(error) if error.to_string().contains("missing field") => {
                ErrorKind::Missing
            }
            Self::Link { source, .. } => source.kind(),
            Self::Curie(error) => error.kind(),
            Self::Graph(error) => error.kind(),
            _ => ErrorKind::Invalid,
        }
    }
}

impl Resource {
    /// Loads a manifest from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded manifest from {}", path.display());
        content.parse()
    }

    /// Builds the document this resource describes, including every embedded
    /// resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the model, a link, a curie, or an embedded
    /// resource is invalid.
    pub fn build(&self) -> Result<HalGraph, ManifestError> {
        tracing::debug!(model_type = %self.model_type, "Building resource");

        if !(self.model.is_object() || self.model.is_array() || self.model.is_null()) {
            return Err(ManifestError::ScalarModel(self.model_type.clone()));
        }
        let model = JsonModel::new(ModelType::named(self.model_type.as_str()), &self.model)
            .map_err(GraphError::from)?
            .excluding(&self.exclude);
        let mut graph = HalGraph::new(&model)?;

        for entry in &self.links {
            let link = match &entry.title {
                Some(title) => Link::with_title(&entry.href, title.as_str()),
                None => Link::new(&entry.href),
            }
            .map_err(|source| ManifestError::Link {
                rel: entry.rel.clone(),
                source,
            })?;
            graph.add_link(&entry.rel, link)?;
        }

        if !self.curies.is_empty() {
            let curies = self
                .curies
                .iter()
                .map(|entry| Curie::new(entry.name.as_str(), &entry.href))
                .collect::<Result<Vec<_>, _>>()?;
            graph.add_curies(curies)?;
        }

        for entry in &self.embedded {
            match &entry.content {
                Embedded::Item(resource) => {
                    let child = resource.build()?;
                    graph.add_embedded_item(&entry.key, child)?;
                }
                Embedded::Items(resources) => {
                    let children = resources
                        .iter()
                        .map(Self::build)
                        .collect::<Result<Vec<_>, _>>()?;
                    tracing::debug!(
                        key = %entry.key,
                        count = children.len(),
                        "Embedding collection"
                    );
                    graph.add_embedded_item_collection(&entry.key, children)?;
                }
            }
        }

        Ok(graph)
    }
}

impl FromStr for Resource {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{
        domain::{OneOrMany, Value},
        encoding::{CamelDash, Encoder},
    };

    const ORDER: &str = r"
type: order
model:
  OrderNumber: '1'
  Total: 10.5
  InternalNotes: secret
exclude: [InternalNotes]
links:
  - rel: self
    href: /orders/1/
  - rel: items
    href: /orders/1/items/{item-id}
    title: Line items
curies:
  - name: acme
    href: /rels/{rel}
embedded:
  - key: customer
    item:
      type: customer
      model: { FullName: Ann }
  - key: lines
    items:
      - type: line
        model: { Sku: A }
      - type: line
        model: { Sku: B }
";

    #[test]
    fn builds_full_document() {
        let graph = ORDER.parse::<Resource>().unwrap().build().unwrap();

        assert_eq!(graph.model_type().as_str(), "order");
        assert!(graph.property("InternalNotes").is_none());
        assert_eq!(graph.property("Total"), Some(&Value::Float(10.5)));
        assert_eq!(graph.curies().len(), 1);
        assert_eq!(
            graph.link("self").map(|links| links.as_slice()[0].href()),
            Some("/orders/1")
        );
        assert!(matches!(
            graph.embedded_item("lines"),
            Some(OneOrMany::Many(lines)) if lines.len() == 2
        ));
    }

    #[test]
    fn exclusion_keeps_nested_members_of_the_same_name() {
        let manifest = r"
type: customer
model:
  Name: Ann
  Address:
    Name: home
    Street: High St
exclude: [Name]
";
        let graph = manifest.parse::<Resource>().unwrap().build().unwrap();

        assert!(graph.property("Name").is_none());
        let address = graph.property("Address").and_then(Value::as_map).unwrap();
        assert_eq!(address.get("Name"), Some(&Value::Text("home".to_string())));
        assert_eq!(
            address.get("Street"),
            Some(&Value::Text("High St".to_string()))
        );
    }

    #[test]
    fn encodes_in_document_order() {
        let graph = ORDER.parse::<Resource>().unwrap().build().unwrap();
        let json = Encoder::with_convention(CamelDash).to_string(&graph).unwrap();

        let expected = concat!(
            r#"{"_links":{"self":{"href":"/orders/1"},"#,
            r#""items":{"href":"/orders/1/items/{item-id}","templated":true,"title":"Line items"},"#,
            r#""curies":[{"href":"/rels/{rel}","templated":true,"name":"acme"}]},"#,
            r#""order-Number":"1","total":10.5,"#,
            r#""_embedded":{"customer":{"full-Name":"Ann"},"lines":[{"sku":"A"},{"sku":"B"}]}}"#,
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ORDER.as_bytes()).unwrap();

        let resource = Resource::load(file.path()).unwrap();
        assert_eq!(resource.links.len(), 2);
        assert_eq!(resource.embedded.len(), 2);
    }

    #[test]
    fn json_manifest_is_accepted() {
        let resource: Resource =
            r#"{"type": "order", "model": {"Id": 1}, "links": [{"rel": "self", "href": "/orders/1"}]}"#
                .parse()
                .unwrap();
        let graph = resource.build().unwrap();
        assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["_links", "Id"]);
    }

    #[test]
    fn missing_file_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let error = Resource::load(&tmp.path().join("absent.yaml")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Missing);
    }

    #[test]
    fn missing_href_is_missing() {
        let error = "type: order\nmodel: {}\nlinks:\n  - rel: self\n"
            .parse::<Resource>()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Missing);
    }

    #[test]
    fn null_model_is_missing() {
        let error = "type: order\nmodel: null\n"
            .parse::<Resource>()
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(error, ManifestError::Graph(GraphError::Projection(_))));
        assert_eq!(error.kind(), ErrorKind::Missing);
    }

    #[test]
    fn scalar_model_is_rejected() {
        let error = "type: order\nmodel: 3\n"
            .parse::<Resource>()
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(error, ManifestError::ScalarModel(_)));
    }

    #[test]
    fn invalid_link_names_relation() {
        let error = "type: order\nmodel: {}\nlinks:\n  - rel: next\n    href: /a/{b}/c\n"
            .parse::<Resource>()
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(
            error,
            ManifestError::Link { ref rel, source: TemplateError::PlaceholderNotTrailing(_) } if rel == "next"
        ));
    }

    #[test]
    fn mixed_collection_is_rejected() {
        let manifest = r"
type: order
model: {}
embedded:
  - key: things
    items:
      - { type: a, model: {} }
      - { type: b, model: {} }
";
        let error = manifest.parse::<Resource>().unwrap().build().unwrap_err();
        assert!(matches!(
            error,
            ManifestError::Graph(GraphError::MixedCollection { .. })
        ));
    }
}

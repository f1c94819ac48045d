use std::io;

use chrono::SecondsFormat;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{
    domain::{HalGraph, Node, OneOrMany, OrderedMap, Relation, Value, format_duration},
    encoding::{NameConvention, Verbatim},
};

/// Encodes documents as HAL+JSON.
///
/// The encoder walks the document in order, so `_links` is written first
/// and `_embedded` last. The naming convention is applied to projected
/// property names only.
#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder<C = Verbatim> {
    convention: C,
    pretty: bool,
}

impl Encoder {
    /// An encoder which writes property names as they are.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            convention: Verbatim,
            pretty: false,
        }
    }
}

impl<C: NameConvention> Encoder<C> {
    /// An encoder which rewrites property names with `convention`.
    pub const fn with_convention(convention: C) -> Self {
        Self {
            convention,
            pretty: false,
        }
    }

    /// Sets whether output is indented.
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Encodes `graph` as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string(&self, graph: &HalGraph) -> Result<String, serde_json::Error> {
        let view = self.view(graph);
        if self.pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        }
    }

    /// Encodes `graph` as JSON into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the writer fails.
    pub fn to_writer<W: io::Write>(
        &self,
        writer: W,
        graph: &HalGraph,
    ) -> Result<(), serde_json::Error> {
        let view = self.view(graph);
        if self.pretty {
            serde_json::to_writer_pretty(writer, &view)
        } else {
            serde_json::to_writer(writer, &view)
        }
    }

    /// Encodes `graph` as an in-memory JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self, graph: &HalGraph) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.view(graph))
    }

    const fn view<'a>(&'a self, graph: &'a HalGraph) -> GraphView<'a, C> {
        GraphView {
            graph,
            convention: &self.convention,
        }
    }
}

impl Serialize for HalGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphView {
            graph: self,
            convention: &Verbatim,
        }
        .serialize(serializer)
    }
}

struct GraphView<'a, C> {
    graph: &'a HalGraph,
    convention: &'a C,
}

impl<C: NameConvention> Serialize for GraphView<'_, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, node) in self.graph.iter() {
            match node {
                Node::Property(value) => map.serialize_entry(
                    &self.convention.apply(key),
                    &ValueView {
                        value,
                        convention: self.convention,
                    },
                )?,
                Node::Links(links) => map.serialize_entry(key, &LinksView(links))?,
                Node::Embedded(embedded) => map.serialize_entry(
                    key,
                    &EmbeddedView {
                        embedded,
                        convention: self.convention,
                    },
                )?,
            }
        }
        map.end()
    }
}

struct LinksView<'a>(&'a OrderedMap<Relation>);

impl Serialize for LinksView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, relation) in self.0.iter() {
            match relation {
                Relation::Links(OneOrMany::One(link)) => map.serialize_entry(rel, link)?,
                Relation::Links(OneOrMany::Many(links)) => map.serialize_entry(rel, links)?,
                Relation::Curies(curies) => map.serialize_entry(rel, curies)?,
            }
        }
        map.end()
    }
}

struct EmbeddedView<'a, C> {
    embedded: &'a OrderedMap<OneOrMany<HalGraph>>,
    convention: &'a C,
}

impl<C: NameConvention> Serialize for EmbeddedView<'_, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.embedded.len()))?;
        for (key, item) in self.embedded.iter() {
            match item {
                OneOrMany::One(graph) => map.serialize_entry(
                    key,
                    &GraphView {
                        graph,
                        convention: self.convention,
                    },
                )?,
                OneOrMany::Many(graphs) => map.serialize_entry(
                    key,
                    &GraphsView {
                        graphs,
                        convention: self.convention,
                    },
                )?,
            }
        }
        map.end()
    }
}

struct GraphsView<'a, C> {
    graphs: &'a [HalGraph],
    convention: &'a C,
}

impl<C: NameConvention> Serialize for GraphsView<'_, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.graphs.len()))?;
        for graph in self.graphs {
            seq.serialize_element(&GraphView {
                graph,
                convention: self.convention,
            })?;
        }
        seq.end()
    }
}

struct ValueView<'a, C> {
    value: &'a Value,
    convention: &'a C,
}

impl<C: NameConvention> Serialize for ValueView<'_, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Decimal(decimal) => serializer.collect_str(decimal),
            Value::Uuid(uuid) => serializer.collect_str(&uuid.hyphenated()),
            Value::Timestamp(timestamp) => {
                serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Duration(duration) => serializer.serialize_str(&format_duration(*duration)),
            Value::Uri(uri) => serializer.serialize_str(uri.as_str()),
            Value::Map(properties) => {
                let mut map = serializer.serialize_map(Some(properties.len()))?;
                for (key, value) in properties.iter() {
                    map.serialize_entry(
                        &self.convention.apply(key),
                        &ValueView {
                            value,
                            convention: self.convention,
                        },
                    )?;
                }
                map.end()
            }
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(&ValueView {
                        value,
                        convention: self.convention,
                    })?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use rust_decimal::Decimal;
    use url::Url;
    use uuid::Uuid;

    use super::*;
    use crate::{
        domain::{Curie, Fields, Link, Model, ModelType, Property, PropertyMap},
        encoding::CamelDash,
    };

    struct Order {
        order_number: String,
        total: Decimal,
        sku: &'static str,
    }

    impl Model for Order {
        fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
            fields
                .field("OrderNumber", &self.order_number)
                .field("Total", self.total)
                .field("SKU", self.sku);
        }
    }

    struct Customer {
        full_name: &'static str,
    }

    impl Model for Customer {
        fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
            fields.field("FullName", self.full_name);
        }
    }

    fn order(number: &str) -> HalGraph {
        HalGraph::new(&Order {
            order_number: number.to_string(),
            total: Decimal::new(1050, 2),
            sku: "A1",
        })
        .unwrap()
    }

    #[test]
    fn properties_only() {
        assert_eq!(
            serde_json::to_string(&order("1")).unwrap(),
            r#"{"OrderNumber":"1","Total":"10.50","SKU":"A1"}"#
        );
    }

    #[test]
    fn links_first_and_embedded_last() {
        let mut graph = order("1");
        graph
            .add_embedded_item(
                "customer",
                HalGraph::new(&Customer { full_name: "Ann" }).unwrap(),
            )
            .unwrap()
            .add_link("self", Link::new("/orders/1").unwrap())
            .unwrap()
            .add_link("items", Link::new("/orders/1/items/1").unwrap())
            .unwrap()
            .add_link("items", Link::with_title("/orders/1/items/2/", "second").unwrap())
            .unwrap()
            .add_curie(&Curie::new("acme", "/rels/{rel}").unwrap())
            .unwrap();

        let expected = concat!(
            r#"{"_links":{"self":{"href":"/orders/1"},"#,
            r#""items":[{"href":"/orders/1/items/1"},{"href":"/orders/1/items/2","title":"second"}],"#,
            r#""curies":[{"href":"/rels/{rel}","templated":true,"name":"acme"}]},"#,
            r#""OrderNumber":"1","Total":"10.50","SKU":"A1","#,
            r#""_embedded":{"customer":{"FullName":"Ann"}}}"#,
        );
        assert_eq!(Encoder::new().to_string(&graph).unwrap(), expected);
    }

    #[test]
    fn naming_convention_skips_reserved_keys() {
        let mut graph = order("1");
        graph
            .add_link("NextPage", Link::new("/orders/2").unwrap())
            .unwrap()
            .add_embedded_item_collection(
                "LineItems",
                [HalGraph::new(&Customer { full_name: "Ann" }).unwrap()],
            )
            .unwrap();

        let expected = concat!(
            r#"{"_links":{"NextPage":{"href":"/orders/2"}},"#,
            r#""order-Number":"1","total":"10.50","sku":"A1","#,
            r#""_embedded":{"LineItems":[{"full-Name":"Ann"}]}}"#,
        );
        assert_eq!(
            Encoder::with_convention(CamelDash).to_string(&graph).unwrap(),
            expected
        );
    }

    #[test]
    fn nested_maps_are_renamed() {
        let mut inner = PropertyMap::new();
        inner.insert("PostCode", Value::Text("AB1".to_string()));
        let mut properties = PropertyMap::new();
        properties.insert("HomeAddress", Value::Map(inner));
        let graph = HalGraph::from_properties(ModelType::named("Person"), properties).unwrap();

        let value = Encoder::with_convention(CamelDash).to_value(&graph).unwrap();
        assert_eq!(value, serde_json::json!({"home-Address": {"post-Code": "AB1"}}));
    }

    #[test]
    fn atomic_values() {
        struct Atoms;
        impl Model for Atoms {
            fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
                fields
                    .field("Id", Uuid::nil())
                    .field(
                        "At",
                        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
                    )
                    .field("Wait", TimeDelta::seconds(90))
                    .field("Home", Url::parse("http://example.com/").unwrap())
                    .field("Missing", None::<i32>)
                    .field("Values", Property::sequence([1_i32, 2]));
            }
        }

        let graph = HalGraph::new(&Atoms).unwrap();
        assert_eq!(
            serde_json::to_value(&graph).unwrap(),
            serde_json::json!({
                "Id": "00000000-0000-0000-0000-000000000000",
                "At": "2024-05-06T07:08:09Z",
                "Wait": "00:01:30",
                "Home": "http://example.com/",
                "Missing": null,
                "Values": [1, 2],
            })
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let pretty = Encoder::new().pretty(true).to_string(&order("1")).unwrap();
        assert!(pretty.contains("\n  \"OrderNumber\": \"1\""));
    }

    #[test]
    fn writer_matches_string() {
        let graph = order("7");
        let mut buffer = Vec::new();
        Encoder::new().to_writer(&mut buffer, &graph).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            Encoder::new().to_string(&graph).unwrap()
        );
    }
}

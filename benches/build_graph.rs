//! This bench builds an order document with many links and a large embedded
//! collection, then encodes it as HAL+JSON.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use halgraph::{
    Encoder, HalGraph, Link,
    domain::{Fields, Model},
    encoding::CamelDash,
};

struct LineItem {
    line_number: usize,
    product_code: String,
    quantity: u32,
}

impl Model for LineItem {
    fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
        fields
            .field("LineNumber", self.line_number)
            .field("ProductCode", &self.product_code)
            .field("Quantity", self.quantity);
    }
}

struct Order {
    order_number: String,
}

impl Model for Order {
    fn describe<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.field("OrderNumber", &self.order_number);
    }
}

fn line_items() -> Vec<LineItem> {
    (1..=500)
        .map(|i| LineItem {
            line_number: i,
            product_code: format!("SKU-{i:04}"),
            quantity: 1,
        })
        .collect()
}

fn build(items: &[LineItem]) -> HalGraph {
    let mut graph = HalGraph::new(&Order {
        order_number: "A-1".to_string(),
    })
    .unwrap();
    graph
        .add_links(
            "items",
            items
                .iter()
                .map(|item| Link::new(&format!("/orders/A-1/items/{}", item.line_number)).unwrap()),
        )
        .unwrap();
    graph
        .add_embedded_item_collection(
            "lineItems",
            items.iter().map(|item| HalGraph::new(item).unwrap()),
        )
        .unwrap();
    graph
}

fn build_graph(c: &mut Criterion) {
    let items = line_items();

    c.bench_function("build graph", |b| b.iter(|| build(&items)));

    c.bench_function("encode graph", |b| {
        b.iter_batched(
            || build(&items),
            |graph| Encoder::with_convention(CamelDash).to_string(&graph).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, build_graph);
criterion_main!(benches);

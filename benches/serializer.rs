//! Benchmarks for property-reference persistence.
//!
//! Covers the two compact forms and the general JSON form, in both directions.

extern crate dsgen;

use criterion::{criterion_group, criterion_main, Criterion};
use dsgen::prelude::*;
use std::hint::black_box;

fn application_settings() -> CodeExpression {
    CodeExpression::type_ref(CodeTypeReference::global("Northwind.Properties.Settings"))
        .property("Default")
        .property("NorthwindConnectionString")
}

fn app_config() -> CodeExpression {
    CodeExpression::type_ref(CodeTypeReference::new(
        "System.Configuration.ConfigurationManager",
    ))
    .property("ConnectionStrings")
    .index(vec![CodeExpression::string("Northwind")])
    .property("ConnectionString")
}

fn general() -> CodeExpression {
    CodeExpression::this()
        .property("Settings")
        .invoke("Lookup", vec![CodeExpression::string("Northwind")])
}

fn bench_references(c: &mut Criterion) {
    for (name, expression) in [
        ("application_settings", application_settings()),
        ("app_config", app_config()),
        ("general", general()),
    ] {
        let text = PropertyReferenceSerializer::serialize(&expression).unwrap();

        let mut group = c.benchmark_group(name);
        group.bench_function("serialize", |b| {
            b.iter(|| {
                let text = PropertyReferenceSerializer::serialize(black_box(&expression)).unwrap();
                black_box(text)
            });
        });
        group.bench_function("deserialize", |b| {
            b.iter(|| {
                let expression = PropertyReferenceSerializer::deserialize(black_box(&text)).unwrap();
                black_box(expression)
            });
        });
        group.finish();
    }
}

criterion_group!(benches, bench_references);
criterion_main!(benches);

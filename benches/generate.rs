//! Benchmarks for dataset generation.
//!
//! Measures the stages of generating from the Northwind sample schema:
//! - Loading the schema into the design model
//! - Building the code document with adapters and the update manager
//! - Rendering the document as C#

extern crate dsgen;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use dsgen::prelude::*;
use std::{fs, hint::black_box, path::PathBuf};

fn northwind() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/northwind.xsd");
    fs::read_to_string(&path).expect("Failed to read sample schema")
}

/// Benchmark loading the schema into a `DesignDataSource`.
fn bench_load_design(c: &mut Criterion) {
    let schema = northwind();

    let mut group = c.benchmark_group("design");
    group.throughput(Throughput::Bytes(schema.len() as u64));
    group.bench_function("from_schema", |b| {
        b.iter(|| {
            let ds = DesignDataSource::from_schema(black_box(&schema)).unwrap();
            black_box(ds)
        });
    });
    group.finish();
}

/// Benchmark the generator front end, with and without the optional features.
fn bench_generate(c: &mut Criterion) {
    let schema = northwind();
    let emitter = CSharpEmitter::new();

    let mut group = c.benchmark_group("generate");
    group.throughput(Throughput::Bytes(schema.len() as u64));
    for (name, options) in [
        ("plain", GenerateOption::empty()),
        ("hierarchical_linq", GenerateOption::all()),
    ] {
        let generator = TypedDataSetGenerator::new().options(options);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut unit = CodeCompileUnit::default();
                let mut namespace = CodeNamespace::new("Northwind.Data");
                let result = generator
                    .generate(black_box(&schema), &mut unit, &mut namespace, &emitter)
                    .unwrap();
                black_box((result, unit, namespace))
            });
        });
    }
    group.finish();
}

/// Benchmark rendering an already generated code document.
fn bench_emit(c: &mut Criterion) {
    let schema = northwind();
    let emitter = CSharpEmitter::new();
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Northwind.Data");
    TypedDataSetGenerator::new()
        .options(GenerateOption::HIERARCHICAL_UPDATE)
        .generate(&schema, &mut unit, &mut namespace, &emitter)
        .unwrap();
    unit.namespaces.insert(0, namespace);

    c.bench_function("emit_compile_unit", |b| {
        b.iter(|| {
            let code = emitter.emit_compile_unit(black_box(&unit)).unwrap();
            black_box(code)
        });
    });
}

criterion_group!(benches, bench_load_design, bench_generate, bench_emit);
criterion_main!(benches);

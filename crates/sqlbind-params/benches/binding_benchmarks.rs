//! Benchmarks for parameter name resolution and binding
//!
//! Resolution runs once per method; binding runs on every call. These
//! benchmarks show the per-call cost that remains after registration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlbind_core::Value;
use sqlbind_params::{MethodMetadata, MethodRegistry, NameAssignment, ParamDescriptor};

/// Metadata for a method with N explicitly named parameters
fn wide_method(num_params: usize) -> MethodMetadata {
    let params = (0..num_params)
        .map(|i| ParamDescriptor::new("i64").named(format!("p_{}", i)))
        .collect();
    MethodMetadata::new(format!("Mapper.wide_{}", num_params), params)
}

fn args(num_params: usize) -> Vec<Value> {
    (0..num_params as i64).map(Value::Int).collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [1, 4, 16, 64] {
        let metadata = wide_method(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &metadata, |b, metadata| {
            b.iter(|| NameAssignment::resolve(black_box(&metadata.params), true));
        });
    }

    group.finish();
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_registered");

    for size in [1, 4, 16, 64] {
        let registry = MethodRegistry::default();
        let metadata = wide_method(size);
        registry.register(&metadata);
        let call_args = args(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &call_args, |b, call_args| {
            b.iter(|| {
                registry
                    .bind(black_box(metadata.id.as_str()), Some(black_box(call_args.as_slice())))
                    .map(black_box)
            });
        });
    }

    group.finish();
}

fn bench_wrap_collection(c: &mut Criterion) {
    let list = Value::List((0..1_000).map(Value::Int).collect());

    c.bench_function("wrap_collection_1000", |b| {
        b.iter(|| NameAssignment::wrap_to_map_if_collection(black_box(list.clone()), Some("ids")));
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_bind,
    bench_wrap_collection
);
criterion_main!(benches);

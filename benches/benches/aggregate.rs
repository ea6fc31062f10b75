// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldset_tree::{FieldSpec, Form, GroupSpec, NodeId, Representation};
use serde_json::{Map, Value, json};

/// A root group holding `groups` nested groups of `fields` fields each.
fn build(groups: usize, fields: usize) -> (Form, NodeId) {
    let mut form = Form::new();
    let root = form.create_group(GroupSpec::new("root"));
    form.attach(root, None, None).unwrap();
    for g in 0..groups {
        let group = form.insert_group(root, GroupSpec::new(format!("g{g}"))).unwrap();
        for f in 0..fields {
            form.insert_field(group, FieldSpec::new(format!("f{f}"), json!(f)))
                .unwrap();
        }
    }
    form.commit();
    (form, root)
}

fn payload(groups: usize, fields: usize, offset: usize) -> Value {
    let mut outer = Map::new();
    for g in 0..groups {
        let mut inner = Map::new();
        for f in 0..fields {
            inner.insert(format!("f{f}"), json!(f + offset));
        }
        outer.insert(format!("g{g}"), Value::Object(inner));
    }
    Value::Object(outer)
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_read");
    for &(groups, fields) in &[(4, 8), (16, 16), (64, 16)] {
        let (form, root) = build(groups, fields);
        group.throughput(Throughput::Elements((groups * fields) as u64));
        group.bench_function(format!("model_{groups}x{fields}"), |b| {
            b.iter(|| black_box(form.value(root, Representation::Model)));
        });
        group.bench_function(format!("values_with_{groups}x{fields}"), |b| {
            b.iter(|| black_box(form.values_with(root, Representation::Model, |_, _| true)));
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_write");
    for &(groups, fields) in &[(4, 8), (16, 16), (64, 16)] {
        let value = payload(groups, fields, 1);
        group.throughput(Throughput::Elements((groups * fields) as u64));
        group.bench_function(format!("distribute_{groups}x{fields}"), |b| {
            b.iter_batched(
                || build(groups, fields),
                |(mut form, root)| {
                    form.set_value(root, Representation::Model, value.clone());
                    form.commit();
                    black_box(form)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read, bench_write);
criterion_main!(benches);

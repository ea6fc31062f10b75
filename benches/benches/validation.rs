// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use fieldset_tree::validate::builtin::{MaxNumber, Required};
use fieldset_tree::{FieldSpec, Form, GroupSpec, NodeId, Representation};
use serde_json::json;

/// A chain of `depth` nested groups with `width` validated fields at the bottom.
fn build(depth: usize, width: usize) -> (Form, Vec<NodeId>) {
    let mut form = Form::new();
    let mut parent = form.create_group(GroupSpec::new("level0"));
    form.attach(parent, None, None).unwrap();
    for d in 1..depth {
        parent = form
            .insert_group(parent, GroupSpec::new(format!("level{d}")))
            .unwrap();
    }
    let fields = (0..width)
        .map(|i| {
            let spec = FieldSpec {
                validators: vec![Box::new(Required), Box::new(MaxNumber(1000.0))],
                ..FieldSpec::new(format!("f{i}"), json!(i))
            };
            form.insert_field(parent, spec).unwrap()
        })
        .collect();
    form.commit();
    (form, fields)
}

fn bench_coalesced(c: &mut Criterion) {
    let mut group = c.benchmark_group("coalesced_validation");
    for &(depth, width) in &[(2, 8), (8, 8), (8, 64)] {
        group.bench_function(format!("change_all_{depth}x{width}"), |b| {
            b.iter_batched(
                || build(depth, width),
                |(mut form, fields)| {
                    for (i, &f) in fields.iter().enumerate() {
                        form.set_value(f, Representation::Model, json!(i + 2000));
                    }
                    black_box(form.commit())
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_coalesced);
criterion_main!(benches);

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation results bubbling through nested groups.
//!
//! A deep field fails, every ancestor reports the error after the commit, and
//! fixing the field clears the chain again. An asynchronous validator resolves
//! in the same commit that runs the group validations.
//!
//! Run:
//! - `cargo run -p fieldset_demos --example nested_validation`

use fieldset_tree::validate::builtin::{MaxNumber, MinLength, Predicate, Required};
use fieldset_tree::{FieldSpec, Form, GroupSpec, NodeId, Representation};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn report(form: &Form, label: &str, ids: &[(&str, NodeId)]) {
    println!("== {label} ==");
    for (name, id) in ids {
        let entries = form.outcome(*id).map(|o| o.entries().to_vec()).unwrap_or_default();
        println!("  {name:<8} error={:<5} {entries:?}", form.has_error(*id));
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut form = Form::new();
    let order = form.create_group(GroupSpec::new("order"));
    form.attach(order, None, None).unwrap();
    let customer = form.insert_group(order, GroupSpec::new("customer")).unwrap();
    let user = form
        .insert_field(
            customer,
            FieldSpec {
                validators: vec![
                    Box::new(Required),
                    Box::new(MinLength(3)),
                    Box::new(Predicate::new("Taken", |v| Ok(v == &json!("admin"))).deferred()),
                ],
                ..FieldSpec::new("user", json!("admin"))
            },
        )
        .unwrap();
    let items = form.insert_group(order, GroupSpec::new("items")).unwrap();
    let qty = form
        .insert_field(
            items,
            FieldSpec {
                validators: vec![Box::new(MaxNumber(10.0))],
                ..FieldSpec::new("qty", json!(12))
            },
        )
        .unwrap();
    let ids = [
        ("order", order),
        ("customer", customer),
        ("user", user),
        ("items", items),
        ("qty", qty),
    ];

    let commit = form.commit();
    println!("validated: {:?}\nresolved: {:?}", commit.validated, commit.resolved);
    report(&form, "Initial", &ids);

    form.set_value(qty, Representation::Model, json!(3));
    form.set_value(user, Representation::Model, json!("ada"));
    let commit = form.commit();
    println!("validated: {:?}", commit.validated);
    report(&form, "Fixed", &ids);
    assert!(!form.has_error(order));
}

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An address fieldset: aggregated values, repeated names, disabled children.
//!
//! Run:
//! - `cargo run -p fieldset_demos --example address_fieldset`
//! - `RUST_LOG=fieldset_tree=trace cargo run -p fieldset_demos --example address_fieldset`

use fieldset_tree::{FieldSpec, Form, GroupSpec, Representation};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut form = Form::new();
    let address = form.create_group(GroupSpec::new("address"));
    form.attach(address, None, None).unwrap();
    form.insert_field(address, FieldSpec::new("street", json!("")))
        .unwrap();
    let number = form
        .insert_field(address, FieldSpec::new("number", json!(null)))
        .unwrap();
    form.insert_field(address, FieldSpec::new("phone[]", json!("")))
        .unwrap();

    // Written before the group is ready: held back and replayed in the commit.
    form.set_value(
        address,
        Representation::Model,
        json!({"street": "Park Avenue", "number": 80, "phone": ["555-0100"], "unknown": true}),
    );
    let commit = form.commit();
    println!("== Commit ==\n  ready: {:?}", commit.ready);
    println!("== Keys ==\n  {:?}", form.keys(address));
    println!(
        "== Model ==\n  {}",
        form.value(address, Representation::Model).unwrap_or_default()
    );

    // A second phone joins the repeated slot.
    form.insert_field(address, FieldSpec::new("phone", json!("555-0199")))
        .unwrap();
    form.set_disabled(number, true);
    form.commit();
    let model = form.value(address, Representation::Model).unwrap_or_default();
    println!("== Model (number disabled) ==\n  {model}");
    assert_eq!(
        model,
        json!({"street": "Park Avenue", "phone": ["555-0100", "555-0199"]})
    );

    form.set_value(number, Representation::Model, json!(81));
    form.reset_group(address);
    println!(
        "== Model (after reset, incl. disabled) ==\n  {:?}",
        form.values_with(address, Representation::Model, |_, _| true)
    );
}

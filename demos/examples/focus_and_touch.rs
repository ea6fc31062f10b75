// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus, touched and dirty flags across a group.
//!
//! Run:
//! - `cargo run -p fieldset_demos --example focus_and_touch`

use fieldset_tree::{FieldSpec, Form, GroupSpec, InteractionFlags, NodeId, Representation};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn show(form: &Form, label: &str, ids: &[(&str, NodeId)]) {
    println!("== {label} ==");
    for (name, id) in ids {
        println!("  {name:<7} {:?}", form.flags(*id).unwrap_or_default());
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut form = Form::new();
    let login = form.create_group(GroupSpec::new("login"));
    form.attach(login, None, None).unwrap();
    let user = form
        .insert_field(login, FieldSpec::new("user", json!("ada")))
        .unwrap();
    let pass = form
        .insert_field(login, FieldSpec::new("password", json!("")))
        .unwrap();
    form.commit();
    let ids = [("login", login), ("user", user), ("pass", pass)];
    show(&form, "Initial", &ids);

    form.focus(user);
    form.focus(pass);
    show(&form, "Focus moved inside the group", &ids);

    form.set_value(pass, Representation::Model, json!("hunter2"));
    // A click that hits nothing lands outside the focused group.
    form.click(None);
    show(&form, "Edited, then clicked outside", &ids);
    let flags = form.flags(login).unwrap_or_default();
    assert!(flags.contains(InteractionFlags::TOUCHED | InteractionFlags::DIRTY));

    form.reset_interaction_state(login);
    show(&form, "Interaction state reset", &ids);
}

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fieldset Tree: a hierarchical form-control engine.
//!
//! A [`Form`] is an arena of control nodes. Leaves ("fields") wrap an external
//! [`Control`] holding a value; groups own an ordered, name-keyed
//! [`Registrar`](fieldset_registrar::Registrar) of children and present them as
//! a single composite control.
//!
//! - Values aggregate bottom-up: a group's value is a map from child name to
//!   child value, disabled children excluded, and writing a map to a group
//!   distributes it to the children by name.
//! - Validation results bubble up: every group runs a structural validator over
//!   its children's outcomes, so an error anywhere below makes the group invalid.
//! - Disabled state flows down as counted requests: a node stays disabled while
//!   any requester still asks for it.
//! - Interaction flags (`focused`, `dirty`, `touched`, `submitted`, `prefilled`)
//!   are kept per node and synchronized up the tree.
//! - Description and label elements declared on groups are linked to every
//!   descendant, nearest group first.
//!
//! ## Workflow
//!
//! 1) Create nodes from a [`FieldSpec`] or [`GroupSpec`] and [`attach`](Form::attach)
//!    them, or use [`insert_field`](Form::insert_field) / [`insert_group`](Form::insert_group).
//! 2) Call [`Form::commit`]. Registering groups become ready, queued value writes
//!    are replayed, and scheduled validations run deepest first.
//! 3) Read values, outcomes and flags; write values, move focus; commit again.
//!
//! Field validation is synchronous. Group validation triggered by changes below
//! is deferred to the next commit and coalesced, so any number of changes in
//! between cost one run per group.
//!
//! ```
//! use fieldset_tree::{FieldSpec, Form, GroupSpec, Representation};
//! use fieldset_tree::validate::builtin::MaxNumber;
//! use serde_json::json;
//!
//! let mut form = Form::new();
//! let address = form.create_group(GroupSpec::new("address"));
//! form.attach(address, None, None).unwrap();
//! let street = form.insert_field(address, FieldSpec::new("street", json!(""))).unwrap();
//! let number = form
//!     .insert_field(
//!         address,
//!         FieldSpec {
//!             validators: vec![Box::new(MaxNumber(100.0))],
//!             ..FieldSpec::new("number", json!(0))
//!         },
//!     )
//!     .unwrap();
//! form.commit();
//!
//! form.set_value(address, Representation::Model, json!({"street": "Park Avenue", "number": 180}));
//! assert!(form.has_error(number));
//! form.commit();
//! assert!(form.has_error(address));
//!
//! form.set_disabled(number, true);
//! form.commit();
//! assert!(!form.has_error(address));
//! assert_eq!(
//!     form.value(address, Representation::Model),
//!     Some(json!({"street": "Park Avenue"}))
//! );
//! # let _ = street;
//! ```

mod a11y;
mod commit;
mod config;
mod control;
mod error;
mod form;
mod group;
mod interaction;
mod signal;
mod types;
mod value;

pub mod validate;

pub use commit::Commit;
pub use config::{FieldSpec, GroupSpec};
pub use control::{AriaRelationSet, AriaRelations, Clearable, Control, Field, Resettable};
pub use error::FormError;
pub use form::Form;
pub use signal::{SubscriptionId, Topics};
pub use types::{
    AddOptions, ElementRef, InteractionFlags, Lifecycle, NodeId, Representation, ValidateOptions,
};
pub use value::{Codec, IdentityCodec, Map, Value, is_empty};

pub use fieldset_registrar::Slot;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::builtin::{MaxNumber, Required};
    use serde_json::json;

    const MODEL: Representation = Representation::Model;

    #[test]
    fn address_round_trip_and_disabled_child() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("address"));
        form.attach(g, None, None).unwrap();
        form.insert_field(g, FieldSpec::new("street", json!(""))).unwrap();
        let number = form.insert_field(g, FieldSpec::new("number", json!(0))).unwrap();
        form.commit();

        let v = json!({"street": "Park Avenue", "number": 80});
        form.set_value(g, MODEL, v.clone());
        assert_eq!(form.value(g, MODEL), Some(v));

        form.set_disabled(number, true);
        assert_eq!(form.value(g, MODEL), Some(json!({"street": "Park Avenue"})));
    }

    #[test]
    fn duplicate_names_form_an_array() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let first = form.insert_field(g, FieldSpec::new("choice", json!("a"))).unwrap();
        let second = form.insert_field(g, FieldSpec::new("choice", json!("b"))).unwrap();
        form.commit();

        assert_eq!(form.keys(g), ["choice"]);
        assert_eq!(form.value(g, MODEL), Some(json!({"choice": ["a", "b"]})));
        assert_eq!(
            form.slot(g, "choice").map(Slot::members),
            Some(&[first, second][..])
        );
    }

    #[test]
    fn deep_error_propagates_and_clears() {
        let mut form = Form::new();
        let outer = form.create_group(GroupSpec::new("outer"));
        form.attach(outer, None, None).unwrap();
        let middle = form.insert_group(outer, GroupSpec::new("middle")).unwrap();
        let inner = form.insert_group(middle, GroupSpec::new("inner")).unwrap();
        let leaf = form
            .insert_field(
                inner,
                FieldSpec {
                    validators: vec![Box::new(MaxNumber(80.0))],
                    ..FieldSpec::new("n", json!(100))
                },
            )
            .unwrap();
        let sibling = form.insert_group(outer, GroupSpec::new("sibling")).unwrap();
        form.insert_field(sibling, FieldSpec::new("s", json!("ok"))).unwrap();
        form.commit();
        for id in [leaf, inner, middle, outer] {
            assert!(form.has_error(id), "{id:?} should report the error");
        }
        assert!(!form.has_error(sibling));

        form.set_value(leaf, MODEL, json!(50));
        let c = form.commit();
        for id in [leaf, inner, middle, outer] {
            assert!(!form.has_error(id), "{id:?} should be clear");
        }
        assert_eq!(c.validated, [inner, middle, outer], "deepest first");
        assert_eq!(c.validation_runs(sibling), 0);
    }

    #[test]
    fn disabled_group_disables_late_children() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec {
            disabled: true,
            ..GroupSpec::new("g")
        });
        form.attach(g, None, None).unwrap();
        let mut children: Vec<_> = (0..3)
            .map(|i| form.insert_field(g, FieldSpec::new(format!("f{i}"), json!(i))).unwrap())
            .collect();
        form.commit();
        children.push(form.insert_field(g, FieldSpec::new("late", json!(3))).unwrap());
        assert!(children.iter().all(|&c| form.is_disabled(c)));
        assert_eq!(form.value(g, MODEL), Some(json!({})));

        form.set_disabled(g, false);
        assert!(children.iter().all(|&c| !form.is_disabled(c)));
        assert_eq!(
            form.value(g, MODEL),
            Some(json!({"f0": 0, "f1": 1, "f2": 2, "late": 3}))
        );
    }

    #[test]
    fn five_changes_one_group_run() {
        let mut form = Form::new();
        let outer = form.create_group(GroupSpec::new("outer"));
        form.attach(outer, None, None).unwrap();
        let g = form.insert_group(outer, GroupSpec::new("g")).unwrap();
        let fields: Vec<_> = (0..5)
            .map(|i| {
                let spec = FieldSpec {
                    validators: vec![Box::new(Required)],
                    ..FieldSpec::new(format!("f{i}"), json!("x"))
                };
                form.insert_field(g, spec).unwrap()
            })
            .collect();
        form.commit();

        for (i, &f) in fields.iter().enumerate() {
            form.set_value(f, MODEL, json!(i));
        }
        let c = form.commit();
        assert_eq!(c.validation_runs(g), 1);
        assert_eq!(c.validation_runs(outer), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let a = form.insert_field(g, FieldSpec::new("a", json!("x"))).unwrap();
        let b = form.insert_field(g, FieldSpec::new("b", json!(""))).unwrap();
        form.commit();

        form.set_value(g, MODEL, json!({"a": "changed", "b": "filled"}));
        form.focus(a);
        form.focus(b);
        form.blur();
        form.submit_group(g);

        form.reset_group(g);
        let once = (form.value(g, MODEL), [g, a, b].map(|id| form.flags(id)));
        form.reset_group(g);
        let twice = (form.value(g, MODEL), [g, a, b].map(|id| form.flags(id)));
        assert_eq!(once, twice);
        assert_eq!(once.0, Some(json!({"a": "x", "b": ""})));
        let cleared =
            InteractionFlags::DIRTY | InteractionFlags::TOUCHED | InteractionFlags::SUBMITTED;
        assert!(!form.flags(g).unwrap().intersects(cleared));
    }

    #[test]
    fn queued_writes_replay_in_program_order() {
        let mut form = Form::new();
        let outer = form.create_group(GroupSpec::new("outer"));
        let inner = form.insert_group(outer, GroupSpec::new("inner")).unwrap();
        let leaf = form.insert_field(inner, FieldSpec::new("x", json!(0))).unwrap();

        form.set_value(inner, MODEL, json!({"x": 1}));
        form.set_value(outer, MODEL, json!({"inner": {"x": 2}}));
        form.attach(outer, None, None).unwrap();
        form.commit();
        assert_eq!(form.value(leaf, MODEL), Some(json!(2)), "outer write came last");
        assert_eq!(form.initial_model_value(leaf), Some(json!(2)));
    }
}

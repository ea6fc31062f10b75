// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group operations: aggregated values, bulk actions, disabled propagation,
//! and description/label relations.

use fieldset_registrar::Slot;

use crate::a11y;
use crate::control::Control;
use crate::form::{Form, NodeKind, QueuedWrite};
use crate::signal::Topics;
use crate::types::{AddOptions, ElementRef, InteractionFlags, Lifecycle, NodeId, Representation};
use crate::value::{Map, Value};

type Filter<'a> = &'a dyn Fn(&Form, NodeId) -> bool;
type Read<'a> = &'a dyn Fn(&dyn Control) -> Value;

impl Form {
    // --- values ---

    /// Read one representation of `id`'s value.
    ///
    /// For a group this is a map from child name to child value in
    /// [`keys`](Self::keys) order, leaving out disabled children. Repeated names
    /// map to an array of the enabled members' values.
    pub fn value(&self, id: NodeId, rep: Representation) -> Option<Value> {
        self.aggregate(id, &|c| c.value(rep), &|form, k| !form.is_disabled(k))
    }

    /// Like [`value`](Self::value) for a group, with a custom child filter.
    ///
    /// The filter is applied at every level of nesting.
    pub fn values_with(
        &self,
        group: NodeId,
        rep: Representation,
        filter: impl Fn(&Self, NodeId) -> bool,
    ) -> Option<Map<String, Value>> {
        self.group(group)?;
        match self.aggregate(group, &|c| c.value(rep), &filter)? {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Initial model value of `id`: what a reset would restore.
    ///
    /// Fields without the [`Resettable`](crate::Resettable) capability report
    /// their current model value.
    pub fn initial_model_value(&self, id: NodeId) -> Option<Value> {
        self.aggregate(
            id,
            &|c| {
                c.resettable().map_or_else(
                    || c.value(Representation::Model),
                    |r| r.initial_value(),
                )
            },
            &|form, k| !form.is_disabled(k),
        )
    }

    fn aggregate(&self, id: NodeId, read: Read<'_>, filter: Filter<'_>) -> Option<Value> {
        match &self.node_opt(id)?.kind {
            NodeKind::Field(c) => Some(read(c.as_ref())),
            NodeKind::Group(g) => {
                let mut out = Map::new();
                for (name, slot) in g.registrar.slots() {
                    match slot {
                        Slot::Single(k) if filter(self, *k) => {
                            if let Some(v) = self.aggregate(*k, read, filter) {
                                out.insert(name.to_owned(), v);
                            }
                        }
                        Slot::Single(_) => {}
                        Slot::Repeated(ks) => {
                            let values = ks
                                .iter()
                                .filter(|k| filter(self, **k))
                                .filter_map(|k| self.aggregate(*k, read, filter))
                                .collect();
                            out.insert(name.to_owned(), Value::Array(values));
                        }
                    }
                }
                Some(Value::Object(out))
            }
        }
    }

    /// Write one representation of `id`'s value.
    ///
    /// For a group, `value` is a map distributed to the children by name; an
    /// array distributes index-wise over a repeated name. Keys naming no child
    /// are ignored. Model and serialized writes to a group that is not ready yet
    /// are queued and replayed, in program order, in the [`commit`](Self::commit)
    /// that makes it ready. Each field keeps the value of the latest write that
    /// reached it, so a replayed write never overrides a later direct one.
    pub fn set_value(&mut self, id: NodeId, rep: Representation, value: Value) {
        if !self.is_alive(id) {
            return;
        }
        let seq = self.next_seq();
        self.write(id, rep, value, seq);
    }

    /// Write the same value to every child of `group`.
    pub fn set_value_for_all(&mut self, group: NodeId, rep: Representation, value: &Value) {
        let seq = self.next_seq();
        for child in self.children(group) {
            self.write(child, rep, value.clone(), seq);
        }
    }

    pub(crate) fn write(&mut self, id: NodeId, rep: Representation, value: Value, seq: u64) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let lifecycle = node.lifecycle;
        match &mut node.kind {
            NodeKind::Field(control) => {
                if seq < node.write_seq {
                    tracing::trace!(node = ?id, seq, "write superseded by a later one");
                    return;
                }
                node.write_seq = seq;
                let before = control.value(Representation::Model);
                control.set_value(rep, value);
                if control.value(Representation::Model) != before {
                    self.on_field_changed(id);
                }
            }
            NodeKind::Group(g) => {
                if lifecycle != Lifecycle::Ready && rep != Representation::Formatted {
                    g.queued.push(QueuedWrite { rep, value, seq });
                    tracing::trace!(group = ?id, ?rep, "value queued until ready");
                } else {
                    self.distribute(id, rep, &value, seq);
                }
            }
        }
    }

    pub(crate) fn distribute(&mut self, id: NodeId, rep: Representation, value: &Value, seq: u64) {
        let Value::Object(map) = value else {
            tracing::trace!(group = ?id, "ignored a group value that is not a map");
            return;
        };
        for (key, v) in map {
            let Some(slot) = self.slot(id, key).cloned() else {
                tracing::trace!(
                    group = ?id,
                    key = key.as_str(),
                    "no child registered under this name"
                );
                continue;
            };
            match (slot, v) {
                (Slot::Single(k), v) => self.write(k, rep, v.clone(), seq),
                (Slot::Repeated(ks), Value::Array(items)) => {
                    for (k, item) in ks.into_iter().zip(items) {
                        self.write(k, rep, item.clone(), seq);
                    }
                }
                (Slot::Repeated(_), _) => {
                    tracing::trace!(
                        group = ?id,
                        key = key.as_str(),
                        "expected an array for a repeated name"
                    );
                }
            }
        }
    }

    fn on_field_changed(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        let became_dirty =
            node.interaction_initialized && !node.flags.contains(InteractionFlags::DIRTY);
        if became_dirty {
            node.flags.insert(InteractionFlags::DIRTY);
        }
        self.run_validation(id);
        if became_dirty {
            self.emit(id, Topics::DIRTY_CHANGED);
        }
    }

    // --- bulk actions ---

    /// Mark `id` and every descendant as submitted.
    pub fn submit_group(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.flags.insert(InteractionFlags::SUBMITTED);
        for child in self.children(id) {
            self.submit_group(child);
        }
    }

    /// Restore every descendant field to its initial value, then reset
    /// interaction state. Fields that cannot reset keep their value.
    pub fn reset_group(&mut self, id: NodeId) {
        self.reset_values(id);
        self.reset_interaction_state(id);
    }

    /// Empty every descendant field, then reset interaction state. Fields that
    /// cannot be cleared keep their value.
    pub fn clear_group(&mut self, id: NodeId) {
        self.clear_values(id);
        self.reset_interaction_state(id);
    }

    fn reset_values(&mut self, id: NodeId) {
        self.each_field(id, |control| match control.resettable_mut() {
            Some(r) => {
                r.reset();
                true
            }
            None => false,
        });
    }

    fn clear_values(&mut self, id: NodeId) {
        self.each_field(id, |control| match control.clearable_mut() {
            Some(c) => {
                c.clear();
                true
            }
            None => false,
        });
    }

    /// Apply `f` to every field below `id` in document order. `f` returns
    /// `true` if it touched the value; changed fields are handled like any write.
    fn each_field(&mut self, id: NodeId, mut f: impl FnMut(&mut dyn Control) -> bool) {
        let seq = self.next_seq();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.node_opt_mut(n) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Group(g) => stack.extend(g.registrar.iter().rev()),
                NodeKind::Field(control) => {
                    let before = control.value(Representation::Model);
                    let touched = f(&mut **control);
                    if touched && control.value(Representation::Model) != before {
                        node.write_seq = seq;
                        self.on_field_changed(n);
                    }
                }
            }
        }
    }

    // --- disabled ---

    /// True if `id` is disabled, explicitly or by request.
    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.disabled)
    }

    /// Set the explicit disabled state of `id`.
    ///
    /// A group that becomes disabled requests every current child to be disabled
    /// and retracts those requests when it becomes enabled again.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.explicit_disabled = disabled;
        self.refresh_disabled(id);
    }

    /// Ask `target` to be disabled on behalf of `requester`. Idempotent per requester.
    pub fn request_disabled(&mut self, target: NodeId, requester: NodeId) {
        let Some(node) = self.node_opt_mut(target) else {
            return;
        };
        if !node.disable_requests.contains(&requester) {
            node.disable_requests.push(requester);
        }
        self.refresh_disabled(target);
    }

    /// Withdraw the request `requester` made. `target` stays disabled while
    /// other requests are outstanding or it is explicitly disabled.
    pub fn retract_disabled_request(&mut self, target: NodeId, requester: NodeId) {
        let Some(node) = self.node_opt_mut(target) else {
            return;
        };
        node.disable_requests.retain(|r| *r != requester);
        self.refresh_disabled(target);
    }

    /// Number of outstanding disable requests on `id`.
    pub fn disable_request_count(&self, id: NodeId) -> usize {
        self.node_opt(id).map_or(0, |n| n.disable_requests.len())
    }

    fn refresh_disabled(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        let disabled = node.explicit_disabled || !node.disable_requests.is_empty();
        if disabled == node.disabled {
            return;
        }
        node.disabled = disabled;
        let is_group = node.is_group();
        tracing::debug!(node = ?id, disabled, "disabled state changed");
        for child in self.children(id) {
            if disabled {
                self.request_disabled(child, id);
            } else {
                self.retract_disabled_request(child, id);
            }
        }
        if is_group {
            self.schedule_validation(id);
        } else {
            self.run_validation(id);
        }
    }

    // --- descriptions and labels ---

    /// Replace the description elements declared on `id`.
    ///
    /// For a field they describe the field itself. For a group they describe every
    /// descendant; the caches of the group and its descendant groups are rebuilt.
    pub fn set_description_elements(&mut self, id: NodeId, elements: Vec<ElementRef>) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let old = core::mem::replace(&mut node.descriptions, elements);
        match &mut node.kind {
            NodeKind::Field(control) => {
                if let Some(aria) = control.aria_mut() {
                    a11y::unlink(aria, &old);
                    a11y::link(aria, &node.descriptions);
                }
            }
            NodeKind::Group(_) => self.invalidate_descriptions(id),
        }
    }

    /// Description elements declared on `id` itself.
    pub fn description_elements(&self, id: NodeId) -> Option<&[ElementRef]> {
        self.node_opt(id).map(|n| n.descriptions.as_slice())
    }

    /// Rebuild the description caches of `group` and every group below it.
    ///
    /// Call this when description elements change identity outside of
    /// [`set_description_elements`](Self::set_description_elements).
    pub fn invalidate_descriptions(&mut self, group: NodeId) {
        let groups = self.groups_in_subtree(group);
        for &g in &groups {
            self.unlink_cache(g);
        }
        for &g in &groups {
            let children = self.children(g);
            if children.is_empty() {
                continue;
            }
            let elements = self.ensure_descriptions(g);
            for child in children {
                if let Some(aria) = self.aria_mut(child) {
                    a11y::link(aria, &elements);
                }
            }
        }
    }

    /// Unlink and drop the caches of `group` and every group below it.
    pub(crate) fn clear_descriptions(&mut self, group: NodeId) {
        for g in self.groups_in_subtree(group) {
            self.unlink_cache(g);
        }
    }

    fn unlink_cache(&mut self, group: NodeId) {
        let Some(g) = self.group_mut(group) else {
            return;
        };
        let old = g.linker.invalidate();
        for child in self.children(group) {
            if let Some(aria) = self.aria_mut(child) {
                a11y::unlink(aria, &old);
            }
        }
    }

    /// The cached ancestor-chain description elements of `group`, collected on first use.
    pub(crate) fn ensure_descriptions(&mut self, group: NodeId) -> Vec<ElementRef> {
        if let Some(g) = self.group(group).filter(|g| g.linker.is_populated()) {
            return g.linker.elements().to_vec();
        }
        let mut chain = Vec::new();
        let mut cur = Some(group);
        while let Some(id) = cur {
            let Some(node) = self.node_opt(id) else {
                break;
            };
            chain.push(node.descriptions.as_slice());
            cur = node.parent;
        }
        let elements = a11y::collect(chain);
        if let Some(g) = self.group_mut(group) {
            g.linker.populate(elements.clone());
        }
        elements
    }

    fn groups_in_subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(g) = self.group(id) {
                out.push(id);
                stack.extend(g.registrar.iter().rev());
            }
        }
        out
    }

    /// Label every child of `group` by `label`, replacing the previous label.
    pub fn set_label(&mut self, group: NodeId, label: Option<ElementRef>) {
        let Some(g) = self.group_mut(group) else {
            return;
        };
        let old = core::mem::replace(&mut g.label, label);
        if old == label {
            return;
        }
        for child in self.children(group) {
            if let Some(aria) = self.aria_mut(child) {
                if let Some(old) = old {
                    aria.remove_from_aria_labelled_by(old);
                }
                if let Some(label) = label {
                    aria.add_to_aria_labelled_by(label, AddOptions::default());
                }
            }
        }
    }

    /// The label of `group`.
    pub fn label(&self, group: NodeId) -> Option<ElementRef> {
        self.group(group)?.label
    }

    /// Elements `id` is described by, for nodes that support ARIA relations.
    pub fn described_by(&self, id: NodeId) -> Option<&[ElementRef]> {
        self.aria(id).map(|a| a.described_by())
    }

    /// Elements `id` is labelled by, for nodes that support ARIA relations.
    pub fn labelled_by(&self, id: NodeId) -> Option<&[ElementRef]> {
        self.aria(id).map(|a| a.labelled_by())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{FieldSpec, GroupSpec};
    use crate::types::{ElementRef, InteractionFlags, Representation};
    use crate::validate::builtin::MaxNumber;
    use crate::value::{Codec, Value};
    use crate::{Form, NodeId};
    use serde_json::json;

    const MODEL: Representation = Representation::Model;

    /// Lower-case model, shown upper-case, stored with an `s:` prefix.
    #[derive(Debug)]
    struct Shout;

    impl Codec for Shout {
        fn format(&self, model: &Value) -> Value {
            json!(model.as_str().unwrap_or_default().to_uppercase())
        }

        fn parse(&self, formatted: &Value) -> Value {
            json!(formatted.as_str().unwrap_or_default().to_lowercase())
        }

        fn serialize(&self, model: &Value) -> Value {
            json!(format!("s:{}", model.as_str().unwrap_or_default()))
        }

        fn deserialize(&self, serialized: &Value) -> Value {
            json!(serialized.as_str().and_then(|s| s.strip_prefix("s:")).unwrap_or_default())
        }
    }

    fn ready_group(form: &mut Form, fields: &[(&str, serde_json::Value)]) -> (NodeId, Vec<NodeId>) {
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let ids = fields
            .iter()
            .map(|(name, v)| form.insert_field(g, FieldSpec::new(*name, v.clone())).unwrap())
            .collect();
        form.commit();
        (g, ids)
    }

    #[test]
    fn values_with_custom_filter() {
        let mut form = Form::new();
        let (g, ids) = ready_group(&mut form, &[("a", json!(1)), ("b", json!(2))]);
        form.set_disabled(ids[1], true);
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 1})));
        let all = form.values_with(g, MODEL, |_, _| true).unwrap();
        assert_eq!(serde_json::Value::Object(all), json!({"a": 1, "b": 2}));
        assert!(form.values_with(ids[0], MODEL, |_, _| true).is_none());
    }

    #[test]
    fn unknown_keys_and_malformed_values_are_ignored() {
        let mut form = Form::new();
        let (g, _) = ready_group(&mut form, &[("a", json!(1))]);
        form.set_value(g, MODEL, json!({"a": 5, "zzz": 9}));
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 5})));
        form.set_value(g, MODEL, json!("not a map"));
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 5})));
    }

    #[test]
    fn repeated_names_distribute_index_wise() {
        let mut form = Form::new();
        let (g, ids) = ready_group(
            &mut form,
            &[("tags[]", json!("x")), ("other", json!(0))],
        );
        assert_eq!(form.value(g, MODEL), Some(json!({"tags": ["x"], "other": 0})));
        let extra = form.insert_field(g, FieldSpec::new("tags", json!("y"))).unwrap();
        form.set_value(g, MODEL, json!({"tags": ["p", "q", "ignored"]}));
        assert_eq!(form.value(ids[0], MODEL), Some(json!("p")));
        assert_eq!(form.value(extra, MODEL), Some(json!("q")));

        form.set_disabled(ids[0], true);
        form.set_disabled(extra, true);
        assert_eq!(form.value(g, MODEL), Some(json!({"tags": [], "other": 0})));
    }

    #[test]
    fn set_value_for_all_and_initial_value() {
        let mut form = Form::new();
        let (g, _) = ready_group(&mut form, &[("a", json!("x")), ("b", json!("y"))]);
        form.set_value_for_all(g, MODEL, &json!("z"));
        assert_eq!(form.value(g, MODEL), Some(json!({"a": "z", "b": "z"})));
        assert_eq!(
            form.initial_model_value(g),
            Some(json!({"a": "x", "b": "y"}))
        );
    }

    #[test]
    fn group_representations_go_through_each_codec() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let a = form
            .insert_field(g, FieldSpec::with_codec("a", json!("x"), Box::new(Shout)))
            .unwrap();
        form.insert_field(g, FieldSpec::new("b", json!(1))).unwrap();
        form.commit();

        let formatted = Representation::Formatted;
        let serialized = Representation::Serialized;
        assert_eq!(form.value(g, formatted), Some(json!({"a": "X", "b": 1})));
        assert_eq!(form.value(g, serialized), Some(json!({"a": "s:x", "b": 1})));

        form.set_value(g, formatted, json!({"a": "HELLO"}));
        assert_eq!(form.value(a, MODEL), Some(json!("hello")));
        form.set_value(g, serialized, json!({"a": "s:bye", "b": 2}));
        assert_eq!(form.value(g, MODEL), Some(json!({"a": "bye", "b": 2})));
        assert_eq!(form.value(g, formatted), Some(json!({"a": "BYE", "b": 2})));
    }

    #[test]
    fn formatted_writes_skip_the_queue() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let a = form
            .insert_field(g, FieldSpec::with_codec("a", json!("x"), Box::new(Shout)))
            .unwrap();
        let b = form.insert_field(g, FieldSpec::new("b", json!(0))).unwrap();

        form.set_value(g, MODEL, json!({"a": "queued", "b": 1}));
        form.set_value(g, Representation::Formatted, json!({"a": "NOW"}));
        assert_eq!(form.value(a, MODEL), Some(json!("now")));
        assert_eq!(form.value(b, MODEL), Some(json!(0)), "model write still queued");

        form.commit();
        // The older queued write does not override the formatted one.
        assert_eq!(form.value(g, MODEL), Some(json!({"a": "now", "b": 1})));
        assert_eq!(form.initial_model_value(g), Some(json!({"a": "now", "b": 1})));
    }

    #[test]
    fn queued_writes_follow_program_order() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let a = form.insert_field(g, FieldSpec::new("a", json!(0))).unwrap();

        form.set_value(g, MODEL, json!({"a": 1}));
        assert_eq!(form.value(a, MODEL), Some(json!(0)), "held until ready");
        form.set_value(g, MODEL, json!({"a": 2}));
        // A direct write after the queued ones must survive the replay.
        let b = form.insert_field(g, FieldSpec::new("b", json!(0))).unwrap();
        form.set_value(g, MODEL, json!({"b": 7}));
        form.set_value(b, MODEL, json!(8));

        form.commit();
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 2, "b": 8})));
        // The replayed values are what a reset restores.
        form.set_value(a, MODEL, json!(5));
        form.reset_group(g);
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 2, "b": 8})));
    }

    #[test]
    fn queued_partial_maps_merge() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        form.insert_field(g, FieldSpec::new("a", json!(0))).unwrap();
        form.insert_field(g, FieldSpec::new("b", json!(0))).unwrap();

        form.set_value(g, MODEL, json!({"a": 1, "b": 1}));
        form.set_value(g, MODEL, json!({"b": 2}));
        form.commit();
        assert_eq!(form.value(g, MODEL), Some(json!({"a": 1, "b": 2})));
        assert_eq!(form.initial_model_value(g), Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn outer_replay_keeps_keys_the_inner_write_left_alone() {
        let mut form = Form::new();
        let outer = form.create_group(GroupSpec::new("outer"));
        let inner = form.insert_group(outer, GroupSpec::new("inner")).unwrap();
        form.insert_field(inner, FieldSpec::new("x", json!(0))).unwrap();
        form.insert_field(inner, FieldSpec::new("y", json!(0))).unwrap();

        form.set_value(outer, MODEL, json!({"inner": {"x": 1, "y": 1}}));
        form.set_value(inner, MODEL, json!({"x": 2}));
        form.attach(outer, None, None).unwrap();
        form.commit();
        assert_eq!(form.value(inner, MODEL), Some(json!({"x": 2, "y": 1})));
    }

    #[test]
    fn queued_value_becomes_initial() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let a = form.insert_field(g, FieldSpec::new("a", json!(0))).unwrap();
        form.set_value(g, MODEL, json!({"a": 3}));
        form.commit();

        assert_eq!(form.value(a, MODEL), Some(json!(3)));
        assert!(form.flags(a).unwrap().contains(InteractionFlags::PREFILLED));
        form.set_value(a, MODEL, json!(4));
        form.reset_group(g);
        assert_eq!(form.value(a, MODEL), Some(json!(3)));
    }

    #[test]
    fn clear_group_empties_fields() {
        let mut form = Form::new();
        let (g, _) = ready_group(&mut form, &[("a", json!("x")), ("b", json!(2))]);
        form.clear_group(g);
        assert_eq!(form.value(g, MODEL), Some(json!({"a": null, "b": null})));
        assert!(form.flags(g).is_some_and(|f| !f.contains(InteractionFlags::DIRTY)));
    }

    #[test]
    fn submit_reaches_every_level() {
        let mut form = Form::new();
        let (g, ids) = ready_group(&mut form, &[("a", json!(1))]);
        let inner = form.insert_group(g, GroupSpec::new("inner")).unwrap();
        let deep = form.insert_field(inner, FieldSpec::new("d", json!(1))).unwrap();
        form.commit();
        form.submit_group(g);
        for id in [g, ids[0], inner, deep] {
            assert!(form.flags(id).unwrap().contains(InteractionFlags::SUBMITTED));
        }
    }

    #[test]
    fn nested_disable_requests() {
        let mut form = Form::new();
        let (outer, _) = ready_group(&mut form, &[]);
        let inner = form.insert_group(outer, GroupSpec::new("inner")).unwrap();
        let leaf = form.insert_field(inner, FieldSpec::new("x", json!(1))).unwrap();

        form.set_disabled(outer, true);
        assert!(form.is_disabled(inner));
        assert!(form.is_disabled(leaf));

        // An independent request keeps the leaf disabled.
        form.request_disabled(leaf, outer);
        form.set_disabled(outer, false);
        assert!(!form.is_disabled(inner));
        assert!(form.is_disabled(leaf));
        assert_eq!(form.disable_request_count(leaf), 1);
        form.retract_disabled_request(leaf, outer);
        assert!(!form.is_disabled(leaf));
    }

    #[test]
    fn detach_retracts_the_parents_request() {
        let mut form = Form::new();
        let (g, ids) = ready_group(&mut form, &[("a", json!(1))]);
        form.set_disabled(g, true);
        assert!(form.is_disabled(ids[0]));
        form.detach(ids[0]).unwrap();
        assert!(!form.is_disabled(ids[0]));
        form.attach(ids[0], Some(g), None).unwrap();
        assert!(form.is_disabled(ids[0]));
    }

    #[test]
    fn disabled_child_is_excluded_from_structural_check() {
        let mut form = Form::new();
        let g = form.create_group(GroupSpec::new("g"));
        form.attach(g, None, None).unwrap();
        let n = form
            .insert_field(
                g,
                FieldSpec {
                    validators: vec![Box::new(MaxNumber(80.0))],
                    ..FieldSpec::new("number", json!(100))
                },
            )
            .unwrap();
        form.commit();
        assert!(form.has_error(g));

        form.set_disabled(n, true);
        assert!(form.outcome(n).unwrap().is_empty());
        form.commit();
        assert!(!form.has_error(g));
    }

    #[test]
    fn descriptions_are_collected_deepest_first() {
        let outer_error = ElementRef::new(1, 1);
        let inner_help = ElementRef::new(2, 5);
        let inner_error = ElementRef::new(3, 9);

        let mut form = Form::new();
        let outer = form.create_group(GroupSpec {
            descriptions: vec![outer_error],
            ..GroupSpec::new("outer")
        });
        form.attach(outer, None, None).unwrap();
        let inner = form
            .insert_group(
                outer,
                GroupSpec {
                    descriptions: vec![inner_help, inner_error],
                    ..GroupSpec::new("inner")
                },
            )
            .unwrap();
        let leaf = form.insert_field(inner, FieldSpec::new("x", json!(1))).unwrap();
        assert_eq!(
            form.described_by(leaf),
            Some(&[inner_error, inner_help, outer_error][..])
        );
        assert_eq!(form.described_by(inner), Some(&[outer_error][..]));

        // Invalidation picks up new elements and drops stale ones.
        let new_outer = ElementRef::new(4, 0);
        form.set_description_elements(outer, vec![new_outer]);
        assert_eq!(
            form.described_by(leaf),
            Some(&[inner_error, inner_help, new_outer][..])
        );

        form.detach(leaf).unwrap();
        assert_eq!(form.described_by(leaf), Some(&[][..]));
    }

    #[test]
    fn moving_a_subtree_relinks_descriptions() {
        let a_error = ElementRef::new(1, 1);
        let b_error = ElementRef::new(2, 2);
        let mut form = Form::new();
        let root = form.create_group(GroupSpec::new("root"));
        form.attach(root, None, None).unwrap();
        let a = form
            .insert_group(root, GroupSpec { descriptions: vec![a_error], ..GroupSpec::new("a") })
            .unwrap();
        let b = form
            .insert_group(root, GroupSpec { descriptions: vec![b_error], ..GroupSpec::new("b") })
            .unwrap();
        let sub = form.insert_group(a, GroupSpec::new("sub")).unwrap();
        let leaf = form.insert_field(sub, FieldSpec::new("x", json!(1))).unwrap();
        assert_eq!(form.described_by(leaf), Some(&[a_error][..]));

        form.reparent(sub, Some(b), None).unwrap();
        assert_eq!(form.described_by(leaf), Some(&[b_error][..]));
    }

    #[test]
    fn label_is_swapped_on_children() {
        let l1 = ElementRef::new(10, 0);
        let l2 = ElementRef::new(11, 0);
        let mut form = Form::new();
        let g = form.create_group(GroupSpec { label: Some(l1), ..GroupSpec::new("g") });
        form.attach(g, None, None).unwrap();
        let f = form.insert_field(g, FieldSpec::new("f", json!(1))).unwrap();
        assert_eq!(form.labelled_by(f), Some(&[l1][..]));
        form.set_label(g, Some(l2));
        assert_eq!(form.labelled_by(f), Some(&[l2][..]));
        assert_eq!(form.label(g), Some(l2));
        form.detach(f).unwrap();
        assert_eq!(form.labelled_by(f), Some(&[][..]));
    }

    #[test]
    fn field_descriptions_describe_the_field() {
        let help = ElementRef::new(5, 5);
        let mut form = Form::new();
        let f = form.create_field(FieldSpec {
            descriptions: vec![help],
            ..FieldSpec::new("f", json!(1))
        });
        assert_eq!(form.described_by(f), Some(&[help][..]));
        form.set_description_elements(f, Vec::new());
        assert_eq!(form.described_by(f), Some(&[][..]));
        assert_eq!(form.description_elements(f), Some(&[][..]));
    }
}

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction state: focus, touched, dirty, submitted and prefilled.
//!
//! Fields own their flags. For groups, `focused` follows whether focus lies
//! inside the group, `dirty` is the OR of the children, and `prefilled` is the
//! AND of the children, computed on read. A group becomes `touched` when focus
//! leaves its last child in document order, or when a click lands outside it
//! while it holds focus.

use fieldset_focus::types::{FocusEvent, path_to_root};

use crate::form::{Form, NodeKind};
use crate::signal::Topics;
use crate::types::{InteractionFlags, NodeId};

impl Form {
    /// Interaction flags of `id`.
    pub fn flags(&self, id: NodeId) -> Option<InteractionFlags> {
        let node = self.node_opt(id)?;
        match &node.kind {
            NodeKind::Field(_) => Some(node.flags),
            NodeKind::Group(g) => {
                let mut flags = node.flags;
                let prefilled = g.registrar.iter().all(|c| {
                    self.flags(c)
                        .is_some_and(|f| f.contains(InteractionFlags::PREFILLED))
                });
                flags.set(InteractionFlags::PREFILLED, prefilled);
                Some(flags)
            }
        }
    }

    /// Move focus to the field `id`.
    ///
    /// Returns `false` (and leaves focus alone) for groups, disabled fields and
    /// nodes that are not connected.
    pub fn focus(&mut self, id: NodeId) -> bool {
        let focusable = self
            .node_opt(id)
            .is_some_and(|n| !n.is_group() && !n.disabled)
            && self.is_connected(id);
        if !focusable {
            return false;
        }
        let path = path_to_root(id, &*self);
        let events = self.focus.update_path(&path);
        self.apply_focus_events(&events);
        true
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        let events = self.focus.clear();
        self.apply_focus_events(&events);
    }

    /// Route a click on `target` (`None` for a click that hits no node).
    ///
    /// Focused groups the click lands outside of become touched; then focus moves
    /// to `target` if it is a focusable field, and is dropped otherwise.
    pub fn click(&mut self, target: Option<NodeId>) {
        let target = target.filter(|&t| self.is_connected(t));
        let path = target.map(|t| path_to_root(t, &*self)).unwrap_or_default();
        for group in self.outside.dispatch(&path) {
            if let Some(node) = self.node_opt_mut(group) {
                tracing::debug!(?group, "click outside focused group");
                node.flags.insert(InteractionFlags::TOUCHED);
            }
        }
        let focused = target.is_some_and(|t| self.focus(t));
        if !focused {
            self.blur();
        }
    }

    fn apply_focus_events(&mut self, events: &[FocusEvent<NodeId>]) {
        for event in events {
            match *event {
                FocusEvent::In(id) => self.set_focused(id, true),
                FocusEvent::Out(id) => {
                    self.set_focused(id, false);
                    let Some(node) = self.node_opt_mut(id) else {
                        continue;
                    };
                    if !node.is_group() {
                        node.flags.insert(InteractionFlags::TOUCHED);
                    }
                    let Some(parent) = node.parent else {
                        continue;
                    };
                    let left_last = self
                        .group(parent)
                        .is_some_and(|g| g.registrar.last() == Some(id));
                    if left_last {
                        self.node_mut(parent)
                            .flags
                            .insert(InteractionFlags::TOUCHED);
                    }
                }
            }
        }
    }

    /// Groups listen for outside clicks exactly while they are focused.
    fn set_focused(&mut self, id: NodeId, focused: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.flags.contains(InteractionFlags::FOCUSED) == focused {
            return;
        }
        node.flags.set(InteractionFlags::FOCUSED, focused);
        if node.is_group() {
            if focused {
                self.outside.install(id);
            } else {
                self.outside.remove(id);
            }
        }
    }

    /// Recompute a group's `dirty` from its children; notify on change.
    pub(crate) fn sync_dirty(&mut self, group: NodeId) {
        let Some(g) = self.group(group) else {
            return;
        };
        let dirty = g.registrar.iter().any(|c| {
            self.node_opt(c)
                .is_some_and(|n| n.flags.contains(InteractionFlags::DIRTY))
        });
        let node = self.node_mut(group);
        if node.flags.contains(InteractionFlags::DIRTY) == dirty {
            return;
        }
        node.flags.set(InteractionFlags::DIRTY, dirty);
        self.emit(group, Topics::DIRTY_CHANGED);
    }

    /// Capture the field's initial value and whether it starts prefilled.
    ///
    /// Runs once per field, when it connects under a ready parent (or as a root)
    /// or when its parent group becomes ready.
    pub(crate) fn init_interaction_state(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.interaction_initialized {
            return;
        }
        let NodeKind::Field(control) = &mut node.kind else {
            return;
        };
        if let Some(r) = control.resettable_mut() {
            r.capture_initial();
        }
        let prefilled = !control.is_empty();
        node.flags.set(InteractionFlags::PREFILLED, prefilled);
        node.flags.remove(InteractionFlags::DIRTY);
        node.interaction_initialized = true;
    }

    /// Clear `submitted`, `touched` and `dirty` on `id` and every descendant.
    ///
    /// Fields recompute `prefilled` from their current value.
    pub fn reset_interaction_state(&mut self, id: NodeId) {
        let Some(parent) = self.node_opt(id).map(|n| n.parent) else {
            return;
        };
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            node.flags.remove(
                InteractionFlags::SUBMITTED | InteractionFlags::TOUCHED | InteractionFlags::DIRTY,
            );
            match &node.kind {
                NodeKind::Field(control) => {
                    let prefilled = !control.is_empty();
                    node.flags.set(InteractionFlags::PREFILLED, prefilled);
                }
                NodeKind::Group(g) => stack.extend(g.registrar.iter()),
            }
        }
        if let Some(parent) = parent {
            self.sync_dirty(parent);
        }
    }
}

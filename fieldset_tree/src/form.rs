// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core arena: structure, lifecycle, validation scheduling, notifications.

use core::cmp::Reverse;
use core::fmt;
use std::collections::{BinaryHeap, HashMap};

use fieldset_focus::focus::FocusState;
use fieldset_focus::outside::OutsideClick;
use fieldset_focus::types::ParentLookup;
use fieldset_registrar::{Registrar, Slot, normalize_name};

use crate::a11y::{self, DescriptionLinker};
use crate::commit::Commit;
use crate::config::{FieldSpec, GroupSpec};
use crate::control::{AriaRelationSet, AriaRelations, Control};
use crate::error::FormError;
use crate::signal::{Subscribers, SubscriptionId, Topics};
use crate::types::{
    AddOptions, ElementRef, InteractionFlags, Lifecycle, NodeId, Representation, ValidateOptions,
};
use crate::validate::{self, Feedback, Severity, StructuralValidator, ValidationOutcome, Verdict};
use crate::value::{Value, is_empty};

pub(crate) type ReadyCallback = Box<dyn FnOnce(&mut Form, NodeId)>;

/// A bulk value write held back until its group is ready.
#[derive(Clone, Debug)]
pub(crate) struct QueuedWrite {
    pub(crate) rep: Representation,
    pub(crate) value: Value,
    pub(crate) seq: u64,
}

pub(crate) struct GroupNode {
    pub(crate) registrar: Registrar<NodeId>,
    pub(crate) subscriptions: HashMap<NodeId, SubscriptionId>,
    pub(crate) structural: Box<dyn StructuralValidator>,
    pub(crate) label: Option<ElementRef>,
    pub(crate) aria: AriaRelationSet,
    pub(crate) linker: DescriptionLinker,
    pub(crate) queued: Vec<QueuedWrite>,
    pub(crate) on_ready: Vec<ReadyCallback>,
}

impl fmt::Debug for GroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupNode")
            .field("registrar", &self.registrar)
            .field("structural", &self.structural)
            .field("label", &self.label)
            .field("queued", &self.queued.len())
            .field("on_ready", &self.on_ready.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Field(Box<dyn Control>),
    Group(Box<GroupNode>),
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    /// Attached as a root or registered with a parent.
    pub(crate) attached: bool,
    pub(crate) name: String,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) explicit_disabled: bool,
    /// Effective state: explicit or requested.
    pub(crate) disabled: bool,
    pub(crate) disable_requests: Vec<NodeId>,
    pub(crate) flags: InteractionFlags,
    pub(crate) interaction_initialized: bool,
    /// Sequence number of the last value write applied to this field.
    pub(crate) write_seq: u64,
    pub(crate) validators: Vec<Box<dyn validate::Validator>>,
    pub(crate) outcome: ValidationOutcome,
    /// Indices of asynchronous validators awaiting the next commit.
    pub(crate) deferred: Vec<usize>,
    pub(crate) validation_pending: bool,
    pub(crate) descriptions: Vec<ElementRef>,
    pub(crate) subscribers: Subscribers,
    pub(crate) kind: NodeKind,
}

impl Node {
    fn new(generation: u32, name: String, disabled: bool, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            attached: false,
            name,
            lifecycle: Lifecycle::Uninitialized,
            explicit_disabled: disabled,
            disabled,
            disable_requests: Vec::new(),
            flags: InteractionFlags::empty(),
            interaction_initialized: false,
            write_seq: 0,
            validators: Vec::new(),
            outcome: ValidationOutcome::default(),
            deferred: Vec::new(),
            validation_pending: false,
            descriptions: Vec::new(),
            subscribers: Subscribers::default(),
            kind,
        }
    }

    pub(crate) fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// A forest of form controls: fields and (nested) groups.
///
/// See the [crate docs](crate) for the model and the commit workflow.
pub struct Form {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    seq: u64,
    pub(crate) focus: FocusState<NodeId>,
    pub(crate) outside: OutsideClick<NodeId>,
    /// Scheduled group validations: deepest first, then in scheduling order.
    pending: BinaryHeap<(usize, Reverse<u64>, NodeId)>,
    /// Nodes with asynchronous validators left to resolve.
    awaiting: Vec<NodeId>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let subscriptions: usize = self
            .nodes
            .iter()
            .flatten()
            .map(|n| n.subscribers.len())
            .sum();
        f.debug_struct("Form")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("subscriptions", &subscriptions)
            .field("pending_validations", &self.pending.len())
            .field("focused", &self.focus.target())
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            seq: 0,
            focus: FocusState::new(),
            outside: OutsideClick::new(),
            pending: BinaryHeap::new(),
            awaiting: Vec::new(),
        }
    }

    // --- creation ---

    /// Create a detached field. Its validators run right away.
    pub fn create_field(&mut self, spec: FieldSpec) -> NodeId {
        let FieldSpec {
            name,
            mut control,
            validators,
            descriptions,
            disabled,
        } = spec;
        if let Some(aria) = control.aria_mut() {
            a11y::link(aria, &descriptions);
        }
        let id = self.alloc(|generation| {
            let mut node = Node::new(generation, name, disabled, NodeKind::Field(control));
            node.validators = validators;
            node.descriptions = descriptions;
            node
        });
        self.run_validation(id);
        id
    }

    /// Create a detached group. It validates once it becomes ready.
    pub fn create_group(&mut self, spec: GroupSpec) -> NodeId {
        let GroupSpec {
            name,
            validators,
            structural,
            label,
            descriptions,
            disabled,
        } = spec;
        let group = GroupNode {
            registrar: Registrar::new(),
            subscriptions: HashMap::new(),
            structural,
            label,
            aria: AriaRelationSet::default(),
            linker: DescriptionLinker::default(),
            queued: Vec::new(),
            on_ready: Vec::new(),
        };
        self.alloc(|generation| {
            let mut node = Node::new(generation, name, disabled, NodeKind::Group(Box::new(group)));
            node.validators = validators;
            node.descriptions = descriptions;
            node
        })
    }

    fn alloc(&mut self, make: impl FnOnce(u32) -> Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(make(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(make(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a field and register it as the last child of `parent`.
    pub fn insert_field(&mut self, parent: NodeId, spec: FieldSpec) -> Result<NodeId, FormError> {
        let id = self.create_field(spec);
        if let Err(err) = self.attach(id, Some(parent), None) {
            self.destroy(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Create a group and register it as the last child of `parent`.
    pub fn insert_group(&mut self, parent: NodeId, spec: GroupSpec) -> Result<NodeId, FormError> {
        let id = self.create_group(spec);
        if let Err(err) = self.attach(id, Some(parent), None) {
            self.destroy(id);
            return Err(err);
        }
        Ok(id)
    }

    // --- structure ---

    /// Attach `id` as a root (`parent == None`) or register it with a group.
    ///
    /// `index` is the document position among the parent's children; `None` or an
    /// index past the end appends. Attaching into a connected tree moves every
    /// group of the subtree to [`Lifecycle::Registering`]; they become ready in
    /// the next [`commit`](Self::commit).
    pub fn attach(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<(), FormError> {
        if !self.is_alive(id) {
            return Err(FormError::StaleNode(id));
        }
        if self.node(id).attached {
            return Err(FormError::RegistrationConflict { node: id });
        }
        match parent {
            Some(p) => {
                self.check_parent(id, p)?;
                self.add_form_element(p, id, index)?;
            }
            None => self.node_mut(id).attached = true,
        }
        if self.group(id).is_some_and(|g| !g.registrar.is_empty()) {
            // The ancestor chain changed; recollect below this point.
            self.invalidate_descriptions(id);
        }
        if self.is_connected(id) {
            self.connect(id);
        }
        Ok(())
    }

    /// Detach `id` from its parent (or from the document, for a root).
    ///
    /// The node and its subtree stay alive and can be attached again.
    /// Detaching a node that is not attached is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<(), FormError> {
        if !self.is_alive(id) {
            return Err(FormError::StaleNode(id));
        }
        if !self.node(id).attached {
            return Ok(());
        }
        let was_connected = self.is_connected(id);
        if self.focus.contains(id) {
            self.blur();
        }
        match self.node(id).parent {
            Some(p) => self.remove_form_element(p, id),
            None => self.node_mut(id).attached = false,
        }
        if self.is_group(id) {
            self.clear_descriptions(id);
        }
        if was_connected {
            self.disconnect(id);
        }
        Ok(())
    }

    /// Move `id` under `new_parent` at `index`.
    pub fn reparent(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<(), FormError> {
        if !self.is_alive(id) {
            return Err(FormError::StaleNode(id));
        }
        if let Some(p) = new_parent {
            self.check_parent(id, p)?;
        }
        self.detach(id)?;
        self.attach(id, new_parent, index)
    }

    /// Detach `id` and destroy it together with its subtree.
    ///
    /// Every descendant leaves its own parent individually, so disable requests,
    /// subscriptions and description links are retracted level by level.
    pub fn remove(&mut self, id: NodeId) -> Result<(), FormError> {
        self.detach(id)?;
        self.destroy(id);
        Ok(())
    }

    fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        for child in self.children(id) {
            if self.detach(child).is_ok() {
                self.destroy(child);
            }
        }
        self.outside.remove(id);
        tracing::debug!(node = ?id, "node destroyed");
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn check_parent(&self, id: NodeId, parent: NodeId) -> Result<(), FormError> {
        if !self.is_alive(parent) {
            return Err(FormError::StaleNode(parent));
        }
        if !self.is_group(parent) {
            return Err(FormError::NotAGroup(parent));
        }
        if parent == id || self.is_ancestor(id, parent) {
            return Err(FormError::Cycle { node: id, parent });
        }
        Ok(())
    }

    /// Register `child` with `group`: subscribe, forward the group's disabled
    /// request, link descriptions and label, then revalidate the group from scratch.
    fn add_form_element(
        &mut self,
        group: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), FormError> {
        let name = self.node(child).name.clone();
        self.group_mut(group)
            .ok_or(FormError::NotAGroup(group))?
            .registrar
            .register(child, &name, index)
            .map_err(|_| FormError::RegistrationConflict { node: child })?;

        let sub = self
            .node_mut(child)
            .subscribers
            .subscribe(group, Topics::all());
        if let Some(g) = self.group_mut(group) {
            g.subscriptions.insert(child, sub);
        }
        {
            let c = self.node_mut(child);
            c.parent = Some(group);
            c.attached = true;
        }
        if self.node(group).disabled {
            self.request_disabled(child, group);
        }

        let elements = self.ensure_descriptions(group);
        let label = self.group(group).and_then(|g| g.label);
        if let Some(aria) = self.aria_mut(child) {
            a11y::link(aria, &elements);
            if let Some(label) = label {
                aria.add_to_aria_labelled_by(label, AddOptions::default());
            }
        }

        self.validate(
            group,
            ValidateOptions {
                clear_current_result: true,
            },
        );
        self.sync_dirty(group);
        Ok(())
    }

    fn remove_form_element(&mut self, group: NodeId, child: NodeId) {
        let Some(g) = self.group_mut(group) else {
            return;
        };
        g.registrar.deregister(child);
        let sub = g.subscriptions.remove(&child);
        let elements = g.linker.elements().to_vec();
        let label = g.label;

        if let Some(sub) = sub {
            self.node_mut(child).subscribers.unsubscribe(sub);
        }
        if let Some(aria) = self.aria_mut(child) {
            a11y::unlink(aria, &elements);
            if let Some(label) = label {
                aria.remove_from_aria_labelled_by(label);
            }
        }
        {
            let c = self.node_mut(child);
            c.parent = None;
            c.attached = false;
        }
        self.retract_disabled_request(child, group);

        self.validate(
            group,
            ValidateOptions {
                clear_current_result: true,
            },
        );
        self.sync_dirty(group);
    }

    fn connect(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let parent_ready = self
                .node(n)
                .parent
                .is_none_or(|p| self.node(p).lifecycle == Lifecycle::Ready);
            let node = self.node_mut(n);
            match &node.kind {
                NodeKind::Group(g) => {
                    if matches!(node.lifecycle, Lifecycle::Uninitialized | Lifecycle::TornDown) {
                        node.lifecycle = Lifecycle::Registering;
                        tracing::debug!(group = ?n, "group registering");
                    }
                    stack.extend(g.registrar.iter().rev());
                }
                NodeKind::Field(_) => {
                    node.lifecycle = Lifecycle::Ready;
                    if parent_ready {
                        self.init_interaction_state(n);
                    }
                }
            }
        }
    }

    fn disconnect(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            node.lifecycle = Lifecycle::TornDown;
            node.flags.remove(InteractionFlags::FOCUSED);
            if let NodeKind::Group(g) = &mut node.kind {
                // Pending work belongs to the registration that was cut short.
                let dropped = g.queued.len() + g.on_ready.len();
                g.queued.clear();
                g.on_ready.clear();
                stack.extend(g.registrar.iter());
                tracing::debug!(group = ?n, dropped, "group torn down");
                self.outside.remove(n);
            }
        }
    }

    // --- queries ---

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// True if `id` is a live group.
    pub fn is_group(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(Node::is_group)
    }

    /// True if `id` is attached, directly or through its ancestors, to the document.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let Some(mut node) = self.node_opt(id) else {
            return false;
        };
        while let Some(p) = node.parent {
            node = self.node(p);
        }
        node.attached
    }

    /// Parent group of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a group in document order; empty for fields and stale ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.group(id)
            .map(|g| g.registrar.iter().collect())
            .unwrap_or_default()
    }

    /// Child names of a group, in first-registration order.
    pub fn keys(&self, group: NodeId) -> Vec<&str> {
        self.group(group)
            .map(|g| g.registrar.keys().collect())
            .unwrap_or_default()
    }

    /// The slot registered under `name` in `group`.
    pub fn slot(&self, group: NodeId, name: &str) -> Option<&Slot<NodeId>> {
        self.group(group)?.registrar.get(name)
    }

    /// The name `id` registers under (without a trailing `[]`).
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| normalize_name(&n.name).0)
    }

    /// Lifecycle state of `id`.
    pub fn lifecycle(&self, id: NodeId) -> Option<Lifecycle> {
        self.node_opt(id).map(|n| n.lifecycle)
    }

    /// The control backing a field.
    pub fn control(&self, id: NodeId) -> Option<&dyn Control> {
        match &self.node_opt(id)?.kind {
            NodeKind::Field(c) => Some(c.as_ref()),
            NodeKind::Group(_) => None,
        }
    }

    /// The focused field, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.target()
    }

    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.node_opt(id).and_then(|n| n.parent);
        while let Some(p) = cur {
            depth += 1;
            cur = self.node(p).parent;
        }
        depth
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    // --- validation ---

    /// Revalidate `id`.
    ///
    /// Fields validate immediately. Groups are scheduled and validate in the next
    /// [`commit`](Self::commit), after every scheduled descendant; repeated requests
    /// before then coalesce into one run.
    pub fn validate(&mut self, id: NodeId, options: ValidateOptions) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if options.clear_current_result {
            node.outcome.clear();
            node.deferred.clear();
        }
        if node.is_group() {
            self.schedule_validation(id);
        } else {
            self.run_validation(id);
        }
    }

    /// Outcome of the last validation run of `id`.
    pub fn outcome(&self, id: NodeId) -> Option<&ValidationOutcome> {
        self.node_opt(id).map(|n| &n.outcome)
    }

    /// True if the last outcome of `id` holds an error.
    pub fn has_error(&self, id: NodeId) -> bool {
        self.outcome(id).is_some_and(ValidationOutcome::has_error)
    }

    /// True if `id` has a scheduled validation or unresolved asynchronous validators.
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.validation_pending || !n.deferred.is_empty())
    }

    /// True if any child of `group` currently reports feedback of `severity`.
    pub fn any_child_has_feedback_for(&self, group: NodeId, severity: Severity) -> bool {
        self.children(group)
            .into_iter()
            .any(|c| self.outcome(c).is_some_and(|o| o.has_feedback_for(severity)))
    }

    pub(crate) fn schedule_validation(&mut self, id: NodeId) {
        let depth = self.depth(id);
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.validation_pending {
            tracing::trace!(node = ?id, "validation already pending, coalesced");
            return;
        }
        node.validation_pending = true;
        let seq = self.next_seq();
        self.pending.push((depth, Reverse(seq), id));
    }

    /// Recompute the outcome of `id` and notify subscribers.
    pub(crate) fn run_validation(&mut self, id: NodeId) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let (outcome, deferred) = if node.disabled {
            (ValidationOutcome::default(), Vec::new())
        } else {
            let value = self.model_value(id);
            let (mut outcome, deferred) =
                validate::run_sync(&node.validators, &value, is_empty(&value));
            if let NodeKind::Group(g) = &node.kind {
                let children: Vec<&ValidationOutcome> = g
                    .registrar
                    .iter()
                    .filter_map(|c| self.node_opt(c))
                    .filter(|c| !c.disabled)
                    .map(|c| &c.outcome)
                    .collect();
                if g.structural.execute(&children).has_error {
                    outcome.record(Feedback {
                        severity: Severity::Error,
                        validator: g.structural.name().to_owned(),
                        message: g.structural.message(),
                        verdict: Verdict::Failed,
                    });
                }
            }
            (outcome, deferred)
        };
        let awaiting = !deferred.is_empty();
        {
            let node = self.node_mut(id);
            node.outcome = outcome;
            node.deferred = deferred;
            node.validation_pending = false;
        }
        if awaiting {
            self.awaiting.push(id);
        }
        self.emit(id, Topics::VALIDATE_PERFORMED);
    }

    // --- notifications ---

    /// Subscribe `subscriber` to `topics` emitted by `source`.
    ///
    /// Groups react to `VALIDATE_PERFORMED` by scheduling their own validation and
    /// to `DIRTY_CHANGED` by resyncing `dirty`. Parents subscribe to their
    /// children automatically.
    pub fn subscribe(
        &mut self,
        source: NodeId,
        subscriber: NodeId,
        topics: Topics,
    ) -> Option<SubscriptionId> {
        if !self.is_alive(subscriber) {
            return None;
        }
        Some(
            self.node_opt_mut(source)?
                .subscribers
                .subscribe(subscriber, topics),
        )
    }

    /// Drop a subscription made with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&mut self, source: NodeId, subscription: SubscriptionId) -> bool {
        self.node_opt_mut(source)
            .is_some_and(|n| n.subscribers.unsubscribe(subscription))
    }

    pub(crate) fn emit(&mut self, source: NodeId, topic: Topics) {
        let Some(node) = self.node_opt(source) else {
            return;
        };
        for subscriber in node.subscribers.for_topic(topic) {
            self.deliver(subscriber, source, topic);
        }
    }

    fn deliver(&mut self, subscriber: NodeId, source: NodeId, topic: Topics) {
        if !self.is_group(subscriber) {
            return;
        }
        tracing::trace!(?source, ?subscriber, ?topic, "deliver");
        if topic.contains(Topics::VALIDATE_PERFORMED) {
            self.schedule_validation(subscriber);
        }
        if topic.contains(Topics::DIRTY_CHANGED) {
            self.sync_dirty(subscriber);
        }
    }

    // --- commit ---

    /// Run `f` once `group` is ready.
    ///
    /// Callbacks run in the next [`commit`](Self::commit), right after the group
    /// becomes ready, or in the next commit at all if it already is. Detaching
    /// the group before that drops them.
    pub fn on_ready(&mut self, group: NodeId, f: impl FnOnce(&mut Self, NodeId) + 'static) {
        if let Some(g) = self.group_mut(group) {
            g.on_ready.push(Box::new(f));
        }
    }

    /// Run the batched update.
    ///
    /// 1) Registering groups become ready, outermost first: queued value writes are
    ///    replayed in program order, child fields capture their initial values and
    ///    initialize their interaction state, and `on_ready` callbacks run.
    /// 2) Scheduled validations run, deepest first.
    /// 3) Asynchronous validators resolve.
    ///
    /// Steps repeat until nothing is left to do.
    pub fn commit(&mut self) -> Commit {
        let mut commit = Commit::default();
        loop {
            let mut progressed = self.flush_registrations(&mut commit);
            progressed |= self.flush_validations(&mut commit);
            progressed |= self.flush_deferred(&mut commit);
            if !progressed {
                break;
            }
        }
        commit
    }

    fn flush_registrations(&mut self, commit: &mut Commit) -> bool {
        let mut due: Vec<(usize, NodeId)> = self
            .live_ids()
            .filter(|&id| {
                let node = self.node(id);
                match &node.kind {
                    NodeKind::Group(g) => {
                        node.lifecycle == Lifecycle::Registering
                            || (node.lifecycle == Lifecycle::Ready && !g.on_ready.is_empty())
                    }
                    NodeKind::Field(_) => false,
                }
            })
            .map(|id| (self.depth(id), id))
            .collect();
        if due.is_empty() {
            return false;
        }
        due.sort();
        for (_, id) in due {
            if self.is_alive(id) {
                self.become_ready(id, commit);
            }
        }
        true
    }

    fn become_ready(&mut self, id: NodeId, commit: &mut Commit) {
        if self.node(id).lifecycle == Lifecycle::Registering {
            self.node_mut(id).lifecycle = Lifecycle::Ready;
            tracing::debug!(group = ?id, "group ready");
            let mut queued = self
                .group_mut(id)
                .map(|g| core::mem::take(&mut g.queued))
                .unwrap_or_default();
            queued.sort_by_key(|w| w.seq);
            for w in queued {
                self.distribute(id, w.rep, &w.value, w.seq);
            }
            for child in self.children(id) {
                if !self.is_group(child) {
                    self.init_interaction_state(child);
                }
            }
            self.schedule_validation(id);
        }
        let callbacks = self
            .group_mut(id)
            .map(|g| core::mem::take(&mut g.on_ready))
            .unwrap_or_default();
        for f in callbacks {
            f(self, id);
        }
        commit.ready.push(id);
    }

    fn flush_validations(&mut self, commit: &mut Commit) -> bool {
        let mut ran = false;
        while let Some((_, _, id)) = self.pending.pop() {
            if !self.node_opt(id).is_some_and(|n| n.validation_pending) {
                continue;
            }
            self.run_validation(id);
            commit.validated.push(id);
            ran = true;
        }
        ran
    }

    fn flush_deferred(&mut self, commit: &mut Commit) -> bool {
        let awaiting = core::mem::take(&mut self.awaiting);
        let mut resolved = false;
        for id in awaiting {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if node.deferred.is_empty() || node.disabled {
                continue;
            }
            let value = self.model_value(id);
            let node = self.node_mut(id);
            let indices = core::mem::take(&mut node.deferred);
            let changed =
                validate::run_deferred(&node.validators, &indices, &value, &mut node.outcome);
            commit.resolved.push(id);
            resolved = true;
            if changed {
                self.emit(id, Topics::VALIDATE_PERFORMED);
            }
        }
        resolved
    }

    // --- internals ---

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            n.as_ref().map(|n| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                NodeId::new(i as u32, n.generation)
            })
        })
    }

    pub(crate) fn model_value(&self, id: NodeId) -> Value {
        self.value(id, Representation::Model)
            .unwrap_or(Value::Null)
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn group(&self, id: NodeId) -> Option<&GroupNode> {
        match &self.node_opt(id)?.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Field(_) => None,
        }
    }

    pub(crate) fn group_mut(&mut self, id: NodeId) -> Option<&mut GroupNode> {
        match &mut self.node_opt_mut(id)?.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Field(_) => None,
        }
    }

    pub(crate) fn aria(&self, id: NodeId) -> Option<&dyn AriaRelations> {
        match &self.node_opt(id)?.kind {
            NodeKind::Field(c) => c.aria(),
            NodeKind::Group(g) => Some(&g.aria),
        }
    }

    pub(crate) fn aria_mut(&mut self, id: NodeId) -> Option<&mut dyn AriaRelations> {
        match &mut self.node_opt_mut(id)?.kind {
            NodeKind::Field(c) => c.aria_mut(),
            NodeKind::Group(g) => Some(&mut g.aria),
        }
    }
}

impl ParentLookup<NodeId> for Form {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

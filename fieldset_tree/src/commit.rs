// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Summary of a [`Form::commit`](crate::Form::commit) pass.

use crate::types::NodeId;

/// What a commit did.
///
/// ## Semantics
///
/// - `ready`: groups that moved `Registering → Ready`, outermost first, plus
///   already-ready groups whose pending `on_ready` callbacks ran.
/// - `validated`: one entry per deferred validation run, in run order. A node
///   appears more than once only if it was rescheduled after it ran.
/// - `resolved`: nodes whose asynchronous validators were resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    /// Groups that became ready.
    pub ready: Vec<NodeId>,
    /// Validation runs, in order.
    pub validated: Vec<NodeId>,
    /// Nodes whose asynchronous validators were resolved.
    pub resolved: Vec<NodeId>,
}

impl Commit {
    /// True if the commit had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.validated.is_empty() && self.resolved.is_empty()
    }

    /// How many times `id` was validated during the commit.
    pub fn validation_runs(&self, id: NodeId) -> usize {
        self.validated.iter().filter(|v| **v == id).count()
    }
}

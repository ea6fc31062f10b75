// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by structural form operations.

use crate::types::NodeId;

/// Errors returned by structural [`Form`](crate::Form) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The node is already attached; detach it first.
    #[error("node {node:?} is already attached")]
    RegistrationConflict {
        /// The node that was being attached.
        node: NodeId,
    },
    /// The intended parent is a field, not a group.
    #[error("node {0:?} is not a group")]
    NotAGroup(NodeId),
    /// Attaching would make the node its own ancestor.
    #[error("attaching {node:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The node being attached.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
    /// The id does not refer to a live node.
    #[error("node {0:?} does not exist")]
    StaleNode(NodeId),
}

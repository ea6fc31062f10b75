// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the form tree: node identifiers, flags, lifecycle, and element references.

/// Identifier for a node in the [`Form`](crate::Form).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the node is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Form::is_alive`](crate::Form::is_alive) to check whether a `NodeId` still
/// refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Interaction history of a node.
    ///
    /// For groups `FOCUSED` and `DIRTY` are kept in sync with the children,
    /// and `PREFILLED` is derived on read.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InteractionFlags: u8 {
        /// The node (or, for a group, one of its children) holds focus.
        const FOCUSED   = 0b0000_0001;
        /// The value was changed by the user after initialization.
        const DIRTY     = 0b0000_0010;
        /// The user has left the node at least once.
        const TOUCHED   = 0b0000_0100;
        /// The surrounding form was submitted.
        const SUBMITTED = 0b0000_1000;
        /// The node held a non-empty value when its interaction state was initialized.
        const PREFILLED = 0b0001_0000;
    }
}

/// Lifecycle of a node.
///
/// Groups move `Uninitialized → Registering → Ready → TornDown`; the
/// `Registering → Ready` step happens in [`Form::commit`](crate::Form::commit).
/// Fields skip `Registering` and are `Ready` as soon as they are attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Created, never attached.
    Uninitialized,
    /// Attached; children declared alongside it are still registering.
    Registering,
    /// Registration complete; all operations apply immediately.
    Ready,
    /// Detached from the document.
    TornDown,
}

/// Which of the three parallel value representations to read or write.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The value as the application models it.
    Model,
    /// The value as it would be persisted or transmitted.
    Serialized,
    /// The value as it is shown to the user.
    Formatted,
}

/// Reference to a description or label element (error text, help text, a legend).
///
/// The engine never looks inside these elements; it only orders and associates them.
/// `order` is the element's position in the document and drives the DOM-order comparator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef {
    /// Identity of the element.
    pub id: u32,
    /// Document position of the element.
    pub order: u32,
}

impl ElementRef {
    /// Create a reference to element `id` at document position `order`.
    pub const fn new(id: u32, order: u32) -> Self {
        Self { id, order }
    }
}

/// Options for adding an element to an ARIA relation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Re-sort the whole relation by document order after adding.
    pub reorder: bool,
}

/// Options for [`Form::validate`](crate::Form::validate).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Drop the current outcome right away instead of showing it until the new one is ready.
    pub clear_current_result: bool,
}

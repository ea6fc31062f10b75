// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: parent lookups and focus transitions.
//!
//! ## Overview
//!
//! These types describe the inputs and outputs of the focus helpers.
//! They are referenced by [`focus`](crate::focus) and [`outside`](crate::outside)
//! and implemented by downstream control trees.

use alloc::vec::Vec;

/// Look up the parent of a node to reconstruct a root→node path.
///
/// Implemented by the tree that owns the nodes. Used by [`path_to_root`] to
/// build the paths fed into [`FocusState::update_path`](crate::focus::FocusState::update_path)
/// and [`OutsideClick::dispatch`](crate::outside::OutsideClick::dispatch).
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A focus transition produced by [`FocusState`](crate::focus::FocusState).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusEvent<K> {
    /// Focus moved into the given node (emitted outer→inner).
    In(K),
    /// Focus moved out of the given node (emitted inner→outer).
    Out(K),
}

/// Build the root→`target` path by walking parents.
///
/// The caller ensures the ancestry is acyclic.
pub fn path_to_root<K: Copy>(target: K, lookup: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    loop {
        out.push(cur);
        match lookup.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

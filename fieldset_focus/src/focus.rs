// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus state helper: compute focus-in/focus-out transitions from path changes.
//!
//! ## Usage
//!
//! 1) When a control receives focus, build its root→control path with
//!    [`path_to_root`](crate::types::path_to_root).
//! 2) Call [`FocusState::update_path`] with that path to get `In(..)` / `Out(..)` transitions.
//! 3) Call [`FocusState::clear`] when focus leaves the tree entirely.
//!
//! ## Minimal example
//!
//! ```
//! use fieldset_focus::focus::FocusState;
//! use fieldset_focus::types::FocusEvent;
//! let mut f: FocusState<u32> = FocusState::new();
//! assert_eq!(f.update_path(&[1, 2]), vec![FocusEvent::In(1), FocusEvent::In(2)]);
//! assert_eq!(f.update_path(&[1, 3]), vec![FocusEvent::Out(2), FocusEvent::In(3)]);
//! ```

use alloc::vec::Vec;

use crate::types::FocusEvent;

/// A focus state machine over root→target paths.
///
/// Tracks the currently focused path and, when updated with a new path,
/// computes the minimal sequence of out and in transitions.
///
/// Ordering semantics:
/// - Out events are emitted from inner-most to outer-most.
/// - In events are emitted from outer-most to inner-most.
///
/// Ancestors shared by the old and new path receive no transition: focus moving
/// between two fields of the same group never leaves the group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState<K: Copy + Eq> {
    current: Vec<K>,
}

impl<K: Copy + Eq> FocusState<K> {
    /// Create an empty focus state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// Return the current root→target path (empty when nothing is focused).
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The focused target, if any.
    pub fn target(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// True if `node` is on the focused path.
    pub fn contains(&self, node: K) -> bool {
        self.current.contains(&node)
    }

    /// Drop focus, returning out events from inner-most to outer-most.
    pub fn clear(&mut self) -> Vec<FocusEvent<K>> {
        let mut out = Vec::new();
        for &k in self.current.iter().rev() {
            out.push(FocusEvent::Out(k));
        }
        self.current.clear();
        out
    }

    /// Update the focused path and return the transitions from the previous path to `new_path`.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<FocusEvent<K>> {
        // Length of the shared ancestry (lowest common ancestor depth).
        let mut lca = 0;
        while lca < self.current.len() && lca < new_path.len() && self.current[lca] == new_path[lca]
        {
            lca += 1;
        }

        let mut out = Vec::new();
        for &k in self.current[lca..].iter().rev() {
            out.push(FocusEvent::Out(k));
        }
        for &k in &new_path[lca..] {
            out.push(FocusEvent::In(k));
        }

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn focus_in_on_fresh_path() {
        let mut f: FocusState<u32> = FocusState::new();
        let ev = f.update_path(&[1, 2, 3]);
        assert_eq!(
            ev,
            vec![FocusEvent::In(1), FocusEvent::In(2), FocusEvent::In(3)]
        );
        assert_eq!(f.target(), Some(3));
    }

    #[test]
    fn clear_emits_outs_inner_first() {
        let mut f: FocusState<u32> = FocusState::new();
        let _ = f.update_path(&[1, 2]);
        assert_eq!(f.clear(), vec![FocusEvent::Out(2), FocusEvent::Out(1)]);
        assert!(f.current_path().is_empty());
        assert_eq!(f.target(), None);
    }

    // Sibling move inside a group: the group sees no transition.
    #[test]
    fn sibling_move_keeps_shared_ancestors() {
        let mut f: FocusState<u32> = FocusState::new();
        let _ = f.update_path(&[1, 2, 3]);
        let ev = f.update_path(&[1, 2, 4]);
        assert_eq!(ev, vec![FocusEvent::Out(3), FocusEvent::In(4)]);
    }

    #[test]
    fn disjoint_paths() {
        let mut f: FocusState<u32> = FocusState::new();
        let _ = f.update_path(&[1, 2]);
        let ev = f.update_path(&[5, 6]);
        assert_eq!(
            ev,
            vec![
                FocusEvent::Out(2),
                FocusEvent::Out(1),
                FocusEvent::In(5),
                FocusEvent::In(6),
            ]
        );
    }

    #[test]
    fn same_path_no_events() {
        let mut f: FocusState<u32> = FocusState::new();
        let _ = f.update_path(&[7, 8]);
        assert!(f.update_path(&[7, 8]).is_empty());
    }
}

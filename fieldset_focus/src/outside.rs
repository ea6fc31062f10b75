// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-click listeners.
//!
//! ## Overview
//!
//! A group that currently holds focus wants to know when the user clicks
//! somewhere that is not inside it. Instead of a permanently attached,
//! document-wide handler, each interested node installs a listener here while
//! it is focused and removes it when focus leaves or the node is torn down.
//!
//! [`OutsideClick::dispatch`] takes the root→target path of the click and
//! returns the listeners the click landed outside of, in installation order.

use alloc::vec::Vec;

/// Registry of nodes listening for clicks outside their subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutsideClick<K: Copy + Eq> {
    listeners: Vec<K>,
}

impl<K: Copy + Eq> Default for OutsideClick<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> OutsideClick<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Install a listener for `node`. Returns `false` if one was already installed.
    pub fn install(&mut self, node: K) -> bool {
        if self.listeners.contains(&node) {
            return false;
        }
        self.listeners.push(node);
        true
    }

    /// Remove the listener for `node`. Returns `false` if none was installed.
    pub fn remove(&mut self, node: K) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|k| *k != node);
        self.listeners.len() != before
    }

    /// Number of installed listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if no listener is installed.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Route a click whose target has the given root→target path.
    ///
    /// Returns every listener that is not on `target_path`, i.e. the click landed
    /// outside its subtree. An empty path means the click hit no node at all.
    pub fn dispatch(&self, target_path: &[K]) -> Vec<K> {
        self.listeners
            .iter()
            .copied()
            .filter(|k| !target_path.contains(k))
            .collect()
    }
}

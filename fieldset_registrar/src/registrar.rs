// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Registrar` API.

use core::hash::Hash;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::types::{RegistrarError, Slot, normalize_name};

/// Ordered, name-keyed collection of a group's direct members.
///
/// Two views are kept in sync:
/// - the flat document order of all members (see [`Registrar::iter`]),
/// - the name slots in first-registration order of each distinct name (see [`Registrar::keys`]).
///
/// Members are identified by a copyable key `K` (typically a generational node id).
/// The registrar holds no validation or aggregation logic; the owner reacts to
/// structural changes right after [`register`](Registrar::register) and
/// [`deregister`](Registrar::deregister) return.
#[derive(Clone, Debug)]
pub struct Registrar<K: Copy + Eq + Hash> {
    order: Vec<K>,
    slots: IndexMap<String, Slot<K>>,
    names: HashMap<K, String>,
}

impl<K: Copy + Eq + Hash> Default for Registrar<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> Registrar<K> {
    /// Create an empty registrar.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            slots: IndexMap::new(),
            names: HashMap::new(),
        }
    }

    /// Register `key` under `name`, inserting at `index` in document order or appending.
    ///
    /// An `index` past the end appends. A name ending in `[]` is stored under the
    /// bare name as a repeated slot. A name that is already present collapses into a
    /// repeated slot; the new member is placed in that sub-sequence according to its
    /// document position.
    ///
    /// Registering a key that is already a member is rejected and leaves the
    /// registrar untouched.
    pub fn register(
        &mut self,
        key: K,
        name: &str,
        index: Option<usize>,
    ) -> Result<(), RegistrarError> {
        if let Some(existing) = self.names.get(&key) {
            return Err(RegistrarError::AlreadyRegistered {
                name: existing.clone(),
            });
        }
        let (bare, repeated) = normalize_name(name);
        let at = index.map_or(self.order.len(), |i| i.min(self.order.len()));
        self.order.insert(at, key);
        self.names.insert(key, bare.to_owned());

        let names = &self.names;
        match self.slots.get_mut(bare) {
            Some(slot) => {
                let mut members = match slot {
                    Slot::Single(k) => vec![*k],
                    Slot::Repeated(v) => core::mem::take(v),
                };
                // Same-name members ahead of `at` in one pass over the prefix.
                let pos = self.order[..at]
                    .iter()
                    .filter(|k| names.get(*k).is_some_and(|n| n == bare))
                    .count();
                members.insert(pos, key);
                *slot = Slot::Repeated(members);
            }
            None => {
                let slot = if repeated {
                    Slot::Repeated(vec![key])
                } else {
                    Slot::Single(key)
                };
                self.slots.insert(bare.to_owned(), slot);
            }
        }
        Ok(())
    }

    /// Remove `key`, dropping its name entry when the slot becomes empty.
    ///
    /// Returns `false` if `key` was not a member. Membership and the name are
    /// found by hash; removing from document order and from the name order
    /// shifts the tail, so the cost is linear in the number of members.
    pub fn deregister(&mut self, key: K) -> bool {
        let Some(name) = self.names.remove(&key) else {
            return false;
        };
        self.order.retain(|k| *k != key);
        let now_empty = match self.slots.get_mut(&name) {
            Some(Slot::Single(_)) => true,
            Some(Slot::Repeated(v)) => {
                v.retain(|k| *k != key);
                v.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.slots.shift_remove(&name);
        }
        true
    }

    /// Names in the order they were first registered.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(String::as_str)
    }

    /// Name slots in [`keys`](Self::keys) order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot<K>)> + '_ {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The slot registered under `name` (bare name, without `[]`).
    pub fn get(&self, name: &str) -> Option<&Slot<K>> {
        self.slots.get(name)
    }

    /// All members in document order, flattening repeated slots.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = K> + ExactSizeIterator + '_ {
        self.order.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if there are no members.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if `key` is a member.
    pub fn contains(&self, key: K) -> bool {
        self.names.contains_key(&key)
    }

    /// The last member in document order.
    pub fn last(&self) -> Option<K> {
        self.order.last().copied()
    }
}

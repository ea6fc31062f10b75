// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fieldset Focus: deterministic, `no_std` focus bookkeeping for control trees.
//!
//! ## Overview
//!
//! This crate turns focus and click targets into the transitions a form tree needs
//! to keep its interaction state in sync. It does not own any tree: the caller
//! implements [`ParentLookup`](crate::types::ParentLookup) and feeds node keys in.
//!
//! ## Focus
//!
//! [`FocusState`](crate::focus::FocusState) remembers the focused root→target path.
//! Moving focus yields the minimal set of [`FocusEvent`](crate::types::FocusEvent)s:
//! `Out` from the old target up to (not including) the shared ancestor, then `In`
//! down to the new target. A group containing both the old and the new target
//! sees nothing, which is exactly what "focus left the group" needs.
//!
//! ## Outside clicks
//!
//! [`OutsideClick`](crate::outside::OutsideClick) is a registry of nodes that want
//! to hear about clicks landing outside their subtree. Listeners are installed and
//! removed explicitly by the owner as its focus changes, so nothing stays attached
//! after a node loses focus or leaves the tree.
//!
//! ## Workflow
//!
//! 1) Resolve the target of a focus or click to a node key.
//! 2) Build its path with [`path_to_root`](crate::types::path_to_root).
//! 3) Feed the path to [`FocusState::update_path`](crate::focus::FocusState::update_path)
//!    or [`OutsideClick::dispatch`](crate::outside::OutsideClick::dispatch) and apply
//!    the returned transitions to your nodes.
//!
//! ```
//! use fieldset_focus::focus::FocusState;
//! use fieldset_focus::outside::OutsideClick;
//! use fieldset_focus::types::{FocusEvent, ParentLookup, path_to_root};
//!
//! // 1 is a group holding fields 2 and 3; 9 is an unrelated root.
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         matches!(node, 2 | 3).then_some(1)
//!     }
//! }
//!
//! let mut focus = FocusState::new();
//! let mut outside = OutsideClick::new();
//!
//! let ev = focus.update_path(&path_to_root(2, &Parents));
//! assert_eq!(ev, [FocusEvent::In(1), FocusEvent::In(2)]);
//! outside.install(1);
//!
//! // Clicking field 3 stays inside the group; clicking 9 does not.
//! assert!(outside.dispatch(&path_to_root(3, &Parents)).is_empty());
//! assert_eq!(outside.dispatch(&path_to_root(9, &Parents)), [1_u32]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod focus;
pub mod outside;
pub mod types;

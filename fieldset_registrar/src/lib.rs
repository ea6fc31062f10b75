// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fieldset Registrar: an ordered, name-keyed collection of group members.
//!
//! Fieldset Registrar is the building block a form group uses to hold its direct children.
//!
//! - Members are kept in document order and may be inserted at an arbitrary position.
//! - Every member is filed under a name; names keep the order in which they were first registered.
//! - Members sharing a name collapse into a [`Slot::Repeated`] sub-sequence that follows
//!   document order.
//! - A trailing `[]` on a name (`"choice[]"`) declares the slot repeated up front.
//!
//! It is generic over the member key `K` and knows nothing about values, validation, or forms.
//! Higher layers (like a form tree) react to structural changes after each call returns.
//!
//! # Example
//!
//! ```rust
//! use fieldset_registrar::{Registrar, Slot};
//!
//! let mut reg: Registrar<u32> = Registrar::new();
//! reg.register(1, "street", None).unwrap();
//! reg.register(2, "choice", None).unwrap();
//! reg.register(3, "choice", None).unwrap();
//!
//! // `choice` is listed once and holds both members in registration order.
//! let keys: Vec<_> = reg.keys().collect();
//! assert_eq!(keys, ["street", "choice"]);
//! assert_eq!(reg.get("choice"), Some(&Slot::Repeated(vec![2, 3])));
//!
//! // Removing the last member of a name drops the name.
//! reg.deregister(1);
//! assert_eq!(reg.keys().collect::<Vec<_>>(), ["choice"]);
//! ```

mod registrar;
mod types;

pub use registrar::Registrar;
pub use types::{REPEATED_SUFFIX, RegistrarError, Slot, normalize_name};

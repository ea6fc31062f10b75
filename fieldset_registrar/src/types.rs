// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the registrar: name slots, errors, and name normalization.

/// Suffix marking a name as explicitly repeated (for example `"choice[]"`).
pub const REPEATED_SUFFIX: &str = "[]";

/// The entry stored under one name.
///
/// A name registered once holds a [`Slot::Single`].
/// Registering the same name again (or declaring it with the [`REPEATED_SUFFIX`])
/// collapses the entry into a [`Slot::Repeated`] sub-sequence kept in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<K> {
    /// Exactly one member under this name.
    Single(K),
    /// An ordered sub-sequence of members sharing this name.
    Repeated(Vec<K>),
}

impl<K: Copy + Eq> Slot<K> {
    /// Members of this slot in document order.
    pub fn members(&self) -> &[K] {
        match self {
            Self::Single(k) => core::slice::from_ref(k),
            Self::Repeated(v) => v,
        }
    }

    /// True if this slot is a repeated sub-sequence (even with a single member).
    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }

    /// True if `key` is a member of this slot.
    pub fn contains(&self, key: K) -> bool {
        self.members().contains(&key)
    }
}

/// Errors reported by [`Registrar`](crate::Registrar) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrarError {
    /// The member is already registered in this registrar; deregister it first.
    #[error("member is already registered under name `{name}`")]
    AlreadyRegistered {
        /// Name the member is currently registered under.
        name: String,
    },
}

/// Split a declared name into its key and whether it was explicitly repeated.
///
/// ```
/// use fieldset_registrar::normalize_name;
/// assert_eq!(normalize_name("choice[]"), ("choice", true));
/// assert_eq!(normalize_name("street"), ("street", false));
/// ```
pub fn normalize_name(name: &str) -> (&str, bool) {
    match name.strip_suffix(REPEATED_SUFFIX) {
        Some(bare) => (bare, true),
        None => (name, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot_members() {
        let s = Slot::Single(3_u32);
        assert_eq!(s.members(), &[3]);
        assert!(!s.is_repeated());
        assert!(s.contains(3));
        assert!(!s.contains(4));
    }

    #[test]
    fn repeated_slot_with_one_member_is_still_repeated() {
        let s = Slot::Repeated(vec![7_u32]);
        assert!(s.is_repeated());
        assert_eq!(s.members(), &[7]);
    }

    #[test]
    fn bare_suffix_normalizes_to_empty_key() {
        assert_eq!(normalize_name("[]"), ("", true));
    }
}

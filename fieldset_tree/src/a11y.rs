// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor-chain description elements for a group's children.

use crate::control::AriaRelations;
use crate::types::{AddOptions, ElementRef};

/// Per-group cache of the description elements its children are described by.
///
/// Populated lazily the first time a child needs it and kept until the group is
/// torn down or explicitly invalidated.
#[derive(Clone, Debug, Default)]
pub(crate) struct DescriptionLinker {
    cache: Vec<ElementRef>,
    populated: bool,
}

impl DescriptionLinker {
    pub(crate) fn is_populated(&self) -> bool {
        self.populated
    }

    pub(crate) fn elements(&self) -> &[ElementRef] {
        &self.cache
    }

    pub(crate) fn populate(&mut self, elements: Vec<ElementRef>) {
        self.cache = elements;
        self.populated = true;
    }

    /// Empty the cache, returning what was linked so it can be unlinked.
    pub(crate) fn invalidate(&mut self) -> Vec<ElementRef> {
        self.populated = false;
        core::mem::take(&mut self.cache)
    }
}

/// Gather description elements along an ancestor chain.
///
/// `chain` yields the locally declared elements of each level, starting at the
/// group itself and walking outward. Each level is put in reverse document order,
/// so the deepest-declared element comes first; duplicates keep their first position.
pub(crate) fn collect<'a>(chain: impl IntoIterator<Item = &'a [ElementRef]>) -> Vec<ElementRef> {
    let mut out: Vec<ElementRef> = Vec::new();
    for level in chain {
        let mut ordered = level.to_vec();
        ordered.sort_by(|a, b| b.order.cmp(&a.order));
        for el in ordered {
            if !out.contains(&el) {
                out.push(el);
            }
        }
    }
    out
}

pub(crate) fn link(target: &mut dyn AriaRelations, elements: &[ElementRef]) {
    for &el in elements {
        target.add_to_aria_described_by(el, AddOptions { reorder: false });
    }
}

pub(crate) fn unlink(target: &mut dyn AriaRelations, elements: &[ElementRef]) {
    for &el in elements {
        target.remove_from_aria_described_by(el);
    }
}

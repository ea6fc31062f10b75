// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative node configuration.
//!
//! Both specs are plain structs with `Default`, meant to be filled in with
//! struct-update syntax:
//!
//! ```
//! use fieldset_tree::{FieldSpec, GroupSpec};
//! use fieldset_tree::validate::builtin::Required;
//! use serde_json::json;
//!
//! let street = FieldSpec {
//!     validators: vec![Box::new(Required)],
//!     ..FieldSpec::new("street", json!("Park Avenue"))
//! };
//! let address = GroupSpec { disabled: true, ..GroupSpec::new("address") };
//! # let _ = (street, address);
//! ```

use crate::control::{Control, Field};
use crate::types::ElementRef;
use crate::validate::{FormElementsHaveNoError, StructuralValidator, Validator};
use crate::value::{Codec, Value};

/// Configuration of a leaf.
#[derive(Debug)]
pub struct FieldSpec {
    /// Name under which the field registers with its parent. A trailing `[]`
    /// always files it into a repeated slot.
    pub name: String,
    /// The control holding the value.
    pub control: Box<dyn Control>,
    /// Validators, in declaration order.
    pub validators: Vec<Box<dyn Validator>>,
    /// Description elements declared on the field itself.
    pub descriptions: Vec<ElementRef>,
    /// Start out disabled.
    pub disabled: bool,
}

impl FieldSpec {
    /// A [`Field`] named `name` holding `value`.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            control: Box::new(Field::new(value)),
            ..Self::default()
        }
    }

    /// A [`Field`] named `name` holding `value`, converted through `codec`.
    pub fn with_codec(name: impl Into<String>, value: Value, codec: Box<dyn Codec>) -> Self {
        Self {
            name: name.into(),
            control: Box::new(Field::new(value).with_codec(codec)),
            ..Self::default()
        }
    }

    /// A custom control named `name`.
    pub fn control(name: impl Into<String>, control: Box<dyn Control>) -> Self {
        Self {
            name: name.into(),
            control,
            ..Self::default()
        }
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            control: Box::new(Field::default()),
            validators: Vec::new(),
            descriptions: Vec::new(),
            disabled: false,
        }
    }
}

/// Configuration of a group.
#[derive(Debug)]
pub struct GroupSpec {
    /// Name under which the group registers with its parent.
    pub name: String,
    /// Validators run against the aggregated model value.
    pub validators: Vec<Box<dyn Validator>>,
    /// Validator run over the children's outcomes.
    pub structural: Box<dyn StructuralValidator>,
    /// Label element every child is labelled by.
    pub label: Option<ElementRef>,
    /// Description elements declared on the group (feedback, help text).
    pub descriptions: Vec<ElementRef>,
    /// Start out disabled.
    pub disabled: bool,
}

impl GroupSpec {
    /// A group named `name` with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            validators: Vec::new(),
            structural: Box::new(FormElementsHaveNoError),
            label: None,
            descriptions: Vec::new(),
            disabled: false,
        }
    }
}

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf controls and their optional capabilities.
//!
//! ## Overview
//!
//! A leaf in the form tree is any type implementing [`Control`]. The engine
//! owns everything that is shared by all nodes (disabled requests, interaction
//! flags, validation outcome); the control only owns its value.
//!
//! Optional behavior is expressed as separate capability traits, reached through
//! accessor methods on [`Control`] that return `None` by default:
//!
//! - [`Resettable`]: remembers an initial value and can go back to it.
//! - [`Clearable`]: can be emptied.
//! - [`AriaRelations`]: accepts `aria-describedby` / `aria-labelledby` associations.
//!
//! A control lacking a capability is skipped silently by the operations that need it.
//! [`Field`] is a ready-made control implementing all three.

use core::fmt::Debug;

use crate::types::{AddOptions, ElementRef, Representation};
use crate::value::{Codec, IdentityCodec, Value, is_empty};

/// A leaf participant of the form tree.
pub trait Control: Debug {
    /// Read one representation of the value.
    fn value(&self, rep: Representation) -> Value;

    /// Write one representation of the value.
    fn set_value(&mut self, rep: Representation, value: Value);

    /// True if the model value carries no user input.
    fn is_empty(&self) -> bool {
        is_empty(&self.value(Representation::Model))
    }

    /// The [`Resettable`] capability, if supported.
    fn resettable(&self) -> Option<&dyn Resettable> {
        None
    }

    /// The [`Resettable`] capability, mutably.
    fn resettable_mut(&mut self) -> Option<&mut dyn Resettable> {
        None
    }

    /// The [`Clearable`] capability, if supported.
    fn clearable_mut(&mut self) -> Option<&mut dyn Clearable> {
        None
    }

    /// The [`AriaRelations`] capability, if supported.
    fn aria(&self) -> Option<&dyn AriaRelations> {
        None
    }

    /// The [`AriaRelations`] capability, mutably.
    fn aria_mut(&mut self) -> Option<&mut dyn AriaRelations> {
        None
    }
}

/// A control that can return to its initial value.
pub trait Resettable {
    /// Remember the current model value as the initial one.
    fn capture_initial(&mut self);

    /// The remembered initial model value.
    fn initial_value(&self) -> Value;

    /// Restore the initial model value.
    fn reset(&mut self);
}

/// A control that can be emptied.
pub trait Clearable {
    /// Set the model value to empty.
    fn clear(&mut self);
}

/// A control that takes part in ARIA relations.
///
/// Adding an element twice or removing an absent one is a no-op.
pub trait AriaRelations {
    /// Associate a description element.
    fn add_to_aria_described_by(&mut self, element: ElementRef, options: AddOptions);

    /// Drop a description association.
    fn remove_from_aria_described_by(&mut self, element: ElementRef);

    /// Associate a label element.
    fn add_to_aria_labelled_by(&mut self, element: ElementRef, options: AddOptions);

    /// Drop a label association.
    fn remove_from_aria_labelled_by(&mut self, element: ElementRef);

    /// Current description associations, in announcement order.
    fn described_by(&self) -> &[ElementRef];

    /// Current label associations, in announcement order.
    fn labelled_by(&self) -> &[ElementRef];
}

/// Ordered, duplicate-free `aria-describedby` and `aria-labelledby` lists.
///
/// Groups use this directly; controls can embed it to implement [`AriaRelations`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AriaRelationSet {
    described_by: Vec<ElementRef>,
    labelled_by: Vec<ElementRef>,
}

impl AriaRelationSet {
    fn add(list: &mut Vec<ElementRef>, element: ElementRef, options: AddOptions) {
        if !list.contains(&element) {
            list.push(element);
        }
        if options.reorder {
            list.sort_by_key(|e| e.order);
        }
    }
}

impl AriaRelations for AriaRelationSet {
    fn add_to_aria_described_by(&mut self, element: ElementRef, options: AddOptions) {
        Self::add(&mut self.described_by, element, options);
    }

    fn remove_from_aria_described_by(&mut self, element: ElementRef) {
        self.described_by.retain(|e| *e != element);
    }

    fn add_to_aria_labelled_by(&mut self, element: ElementRef, options: AddOptions) {
        Self::add(&mut self.labelled_by, element, options);
    }

    fn remove_from_aria_labelled_by(&mut self, element: ElementRef) {
        self.labelled_by.retain(|e| *e != element);
    }

    fn described_by(&self) -> &[ElementRef] {
        &self.described_by
    }

    fn labelled_by(&self) -> &[ElementRef] {
        &self.labelled_by
    }
}

/// The default leaf control.
///
/// Stores the model value and derives the serialized and formatted
/// representations through a [`Codec`].
#[derive(Debug)]
pub struct Field {
    model: Value,
    initial: Value,
    codec: Box<dyn Codec>,
    aria: AriaRelationSet,
}

impl Field {
    /// A field holding `value`, which is also its initial value.
    pub fn new(value: Value) -> Self {
        Self {
            initial: value.clone(),
            model: value,
            codec: Box::new(IdentityCodec),
            aria: AriaRelationSet::default(),
        }
    }

    /// Replace the codec.
    pub fn with_codec(mut self, codec: Box<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl Control for Field {
    fn value(&self, rep: Representation) -> Value {
        match rep {
            Representation::Model => self.model.clone(),
            Representation::Serialized => self.codec.serialize(&self.model),
            Representation::Formatted => self.codec.format(&self.model),
        }
    }

    fn set_value(&mut self, rep: Representation, value: Value) {
        self.model = match rep {
            Representation::Model => value,
            Representation::Serialized => self.codec.deserialize(&value),
            Representation::Formatted => self.codec.parse(&value),
        };
    }

    fn resettable(&self) -> Option<&dyn Resettable> {
        Some(self)
    }

    fn resettable_mut(&mut self) -> Option<&mut dyn Resettable> {
        Some(self)
    }

    fn clearable_mut(&mut self) -> Option<&mut dyn Clearable> {
        Some(self)
    }

    fn aria(&self) -> Option<&dyn AriaRelations> {
        Some(&self.aria)
    }

    fn aria_mut(&mut self) -> Option<&mut dyn AriaRelations> {
        Some(&mut self.aria)
    }
}

impl Resettable for Field {
    fn capture_initial(&mut self) {
        self.initial = self.model.clone();
    }

    fn initial_value(&self) -> Value {
        self.initial.clone()
    }

    fn reset(&mut self) {
        self.model = self.initial.clone();
    }
}

impl Clearable for Field {
    fn clear(&mut self) {
        self.model = Value::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Amounts modelled in cents, shown with two decimals, stored as integers.
    #[derive(Debug)]
    struct Cents;

    impl Codec for Cents {
        fn format(&self, model: &Value) -> Value {
            match model.as_i64() {
                Some(c) => Value::String(format!("{}.{:02}", c / 100, c % 100)),
                None => Value::String(String::new()),
            }
        }

        fn parse(&self, formatted: &Value) -> Value {
            let Some(s) = formatted.as_str() else {
                return Value::Null;
            };
            match s.split_once('.') {
                Some((whole, frac)) => match (whole.parse::<i64>(), frac.parse::<i64>()) {
                    (Ok(w), Ok(f)) => json!(w * 100 + f),
                    _ => Value::Null,
                },
                None => s.parse::<i64>().map_or(Value::Null, |w| json!(w * 100)),
            }
        }
    }

    #[test]
    fn codec_drives_formatted_representation() {
        let mut f = Field::new(json!(1250)).with_codec(Box::new(Cents));
        assert_eq!(f.value(Representation::Formatted), json!("12.50"));
        assert_eq!(f.value(Representation::Serialized), json!(1250));

        f.set_value(Representation::Formatted, json!("3.05"));
        assert_eq!(f.value(Representation::Model), json!(305));

        f.set_value(Representation::Formatted, json!("abc"));
        assert!(f.is_empty(), "unparseable input leaves an empty model");
    }

    #[test]
    fn reset_returns_to_captured_initial() {
        let mut f = Field::new(json!("a"));
        f.set_value(Representation::Model, json!("b"));
        f.reset();
        assert_eq!(f.value(Representation::Model), json!("a"));

        f.set_value(Representation::Model, json!("c"));
        f.capture_initial();
        f.set_value(Representation::Model, json!("d"));
        f.reset();
        assert_eq!(f.value(Representation::Model), json!("c"));
        assert_eq!(f.initial_value(), json!("c"));
    }

    #[test]
    fn clear_empties_the_model() {
        let mut f = Field::new(json!("x"));
        f.clear();
        assert!(f.is_empty());
    }

    #[test]
    fn aria_set_is_idempotent_and_reorders_on_request() {
        let mut set = AriaRelationSet::default();
        let late = ElementRef::new(1, 20);
        let early = ElementRef::new(2, 10);
        set.add_to_aria_described_by(late, AddOptions::default());
        set.add_to_aria_described_by(late, AddOptions::default());
        set.add_to_aria_described_by(early, AddOptions::default());
        assert_eq!(set.described_by(), &[late, early]);

        set.add_to_aria_described_by(early, AddOptions { reorder: true });
        assert_eq!(set.described_by(), &[early, late]);

        set.remove_from_aria_described_by(late);
        set.remove_from_aria_described_by(late);
        assert_eq!(set.described_by(), &[early]);
        assert!(set.labelled_by().is_empty());
    }
}

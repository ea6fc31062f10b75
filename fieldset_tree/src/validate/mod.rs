// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validators and the outcome model.
//!
//! ## Overview
//!
//! A node carries an ordered list of [`Validator`]s. Running them against the
//! node's model value yields a [`ValidationOutcome`]: at most one [`Feedback`]
//! entry per [`Severity`], where the first failing validator of a severity wins
//! and later validators of that severity are skipped.
//!
//! - Empty values only run validators that opt in with [`Validator::runs_on_empty`].
//! - Asynchronous validators are not run inline; their indices are handed back
//!   so the form can resolve them in [`Form::commit`](crate::Form::commit).
//!   Later validators of the same severity wait for them, so declaration order
//!   still decides which failure surfaces.
//! - A validator that cannot evaluate the value returns a
//!   [`ValidatorExecutionError`]. The failure is logged and its severity is
//!   recorded as [`Verdict::Indeterminate`] without aborting the other validators.
//!
//! Groups additionally run a [`StructuralValidator`] over their children's
//! outcomes; [`FormElementsHaveNoError`] is the default.

use core::fmt::Debug;

use crate::value::Value;

pub mod builtin;

/// Feedback severity, in surfacing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The value is invalid.
    Error,
    /// The value is suspicious.
    Warning,
    /// Neutral information about the value.
    Info,
    /// Positive confirmation.
    Success,
}

/// How a feedback entry came about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// The validator evaluated the value and its feedback applies.
    Failed,
    /// The validator could not evaluate the value.
    Indeterminate,
}

/// One entry of a [`ValidationOutcome`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feedback {
    /// Severity of the validator that produced this entry.
    pub severity: Severity,
    /// Name of the validator that produced this entry.
    pub validator: String,
    /// Message to show.
    pub message: String,
    /// Whether the feedback applies or could not be determined.
    pub verdict: Verdict,
}

/// Result of the last validation run of a node.
///
/// Entries are ordered by [`Severity`]; there is at most one per severity.
/// An outcome with no entries is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationOutcome {
    entries: Vec<Feedback>,
}

impl ValidationOutcome {
    /// All entries, in severity order.
    pub fn entries(&self) -> &[Feedback] {
        &self.entries
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if an error-severity validator failed.
    pub fn has_error(&self) -> bool {
        self.has_feedback_for(Severity::Error)
    }

    /// True if a validator of `severity` failed. Indeterminate entries do not count.
    pub fn has_feedback_for(&self, severity: Severity) -> bool {
        self.get(severity)
            .is_some_and(|f| f.verdict == Verdict::Failed)
    }

    /// The entry for `severity`, if any.
    pub fn get(&self, severity: Severity) -> Option<&Feedback> {
        self.entries.iter().find(|f| f.severity == severity)
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record `feedback` unless its severity is already settled.
    ///
    /// A failure replaces an indeterminate entry of the same severity; anything
    /// else leaves an existing entry in place. Returns `true` if the outcome changed.
    pub(crate) fn record(&mut self, feedback: Feedback) -> bool {
        match self.entries.iter().position(|f| f.severity == feedback.severity) {
            Some(i) => {
                let replace = self.entries[i].verdict == Verdict::Indeterminate
                    && feedback.verdict == Verdict::Failed;
                if replace {
                    self.entries[i] = feedback;
                }
                replace
            }
            None => {
                let at = self
                    .entries
                    .iter()
                    .position(|f| f.severity > feedback.severity)
                    .unwrap_or(self.entries.len());
                self.entries.insert(at, feedback);
                true
            }
        }
    }

    fn is_settled(&self, severity: Severity) -> bool {
        self.has_feedback_for(severity)
    }
}

/// A validator could not evaluate the value it was given.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("validator could not evaluate the value: {reason}")]
pub struct ValidatorExecutionError {
    /// Why evaluation failed.
    pub reason: String,
}

impl ValidatorExecutionError {
    /// Create an error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A check applied to a node's model value.
pub trait Validator: Debug {
    /// Identifies the validator in feedback and logs.
    fn name(&self) -> &str;

    /// Severity of the feedback this validator produces.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// The parameter the validator was configured with, if any.
    fn param(&self) -> Option<Value> {
        None
    }

    /// True if evaluation is deferred to [`Form::commit`](crate::Form::commit).
    fn is_async(&self) -> bool {
        false
    }

    /// True if the validator also runs when the value is empty.
    fn runs_on_empty(&self) -> bool {
        false
    }

    /// Message shown when the feedback applies.
    fn message(&self) -> String {
        format!("{} is not satisfied", self.name())
    }

    /// Evaluate `value`. `Ok(true)` means the feedback applies.
    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError>;
}

/// Result of a [`StructuralValidator`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuralVerdict {
    /// True if the group must report an error.
    pub has_error: bool,
}

/// A validator that looks at the children's outcomes instead of the group's value.
pub trait StructuralValidator: Debug {
    /// Identifies the validator in feedback.
    fn name(&self) -> &str;

    /// Message shown when the group reports an error.
    fn message(&self) -> String;

    /// Inspect the outcomes of the registered, enabled children.
    fn execute(&self, outcomes: &[&ValidationOutcome]) -> StructuralVerdict;
}

/// The default structural validator: no child reports an error.
#[derive(Copy, Clone, Debug, Default)]
pub struct FormElementsHaveNoError;

impl StructuralValidator for FormElementsHaveNoError {
    fn name(&self) -> &str {
        "FormElementsHaveNoError"
    }

    fn message(&self) -> String {
        "One or more fields contain errors".into()
    }

    fn execute(&self, outcomes: &[&ValidationOutcome]) -> StructuralVerdict {
        StructuralVerdict {
            has_error: outcomes.iter().any(|o| o.has_error()),
        }
    }
}

/// Run the synchronous validators against `value`.
///
/// Returns the outcome and the indices of the validators that still need to
/// run: every asynchronous validator, plus the validators declared after it
/// with the same severity.
pub(crate) fn run_sync(
    validators: &[Box<dyn Validator>],
    value: &Value,
    empty: bool,
) -> (ValidationOutcome, Vec<usize>) {
    let mut outcome = ValidationOutcome::default();
    let mut deferred = Vec::new();
    // Severities held back behind an asynchronous validator.
    let mut waiting: Vec<Severity> = Vec::new();
    for (i, v) in validators.iter().enumerate() {
        if empty && !v.runs_on_empty() {
            continue;
        }
        let severity = v.severity();
        if outcome.is_settled(severity) {
            continue;
        }
        if v.is_async() || waiting.contains(&severity) {
            if !waiting.contains(&severity) {
                waiting.push(severity);
            }
            deferred.push(i);
            continue;
        }
        apply(&mut outcome, v.as_ref(), value);
    }
    (outcome, deferred)
}

/// Run the deferred validators at `indices` in declaration order, merging into
/// `outcome`. A severity settled by an earlier one skips the rest.
///
/// Returns `true` if the outcome changed.
pub(crate) fn run_deferred(
    validators: &[Box<dyn Validator>],
    indices: &[usize],
    value: &Value,
    outcome: &mut ValidationOutcome,
) -> bool {
    let mut changed = false;
    for v in indices.iter().filter_map(|&i| validators.get(i)) {
        if outcome.is_settled(v.severity()) {
            continue;
        }
        changed |= apply(outcome, v.as_ref(), value);
    }
    changed
}

fn apply(outcome: &mut ValidationOutcome, v: &dyn Validator, value: &Value) -> bool {
    let verdict = match v.execute(value) {
        Ok(true) => Verdict::Failed,
        Ok(false) => return false,
        Err(err) => {
            tracing::warn!(validator = v.name(), %err, "validator execution failed");
            Verdict::Indeterminate
        }
    };
    outcome.record(Feedback {
        severity: v.severity(),
        validator: v.name().to_owned(),
        message: v.message(),
        verdict,
    })
}

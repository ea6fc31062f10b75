// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in validators.

use core::fmt;

use super::{Severity, Validator, ValidatorExecutionError};
use crate::value::{Value, is_empty};

/// Fails when the value is empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct Required;

impl Validator for Required {
    fn name(&self) -> &str {
        "Required"
    }

    fn runs_on_empty(&self) -> bool {
        true
    }

    fn message(&self) -> String {
        "Please fill in this field".into()
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        Ok(is_empty(value))
    }
}

fn length_of(value: &Value) -> Result<usize, ValidatorExecutionError> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(a) => Ok(a.len()),
        other => Err(ValidatorExecutionError::new(format!(
            "expected a string or an array, got {other}"
        ))),
    }
}

fn number_of(value: &Value) -> Result<f64, ValidatorExecutionError> {
    value
        .as_f64()
        .ok_or_else(|| ValidatorExecutionError::new(format!("expected a number, got {value}")))
}

/// Fails when a string (in characters) or array is shorter than the parameter.
#[derive(Copy, Clone, Debug)]
pub struct MinLength(pub usize);

impl Validator for MinLength {
    fn name(&self) -> &str {
        "MinLength"
    }

    fn param(&self) -> Option<Value> {
        Some(self.0.into())
    }

    fn message(&self) -> String {
        format!("Please enter at least {} characters", self.0)
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        Ok(length_of(value)? < self.0)
    }
}

/// Fails when a string (in characters) or array is longer than the parameter.
#[derive(Copy, Clone, Debug)]
pub struct MaxLength(pub usize);

impl Validator for MaxLength {
    fn name(&self) -> &str {
        "MaxLength"
    }

    fn param(&self) -> Option<Value> {
        Some(self.0.into())
    }

    fn message(&self) -> String {
        format!("Please enter at most {} characters", self.0)
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        Ok(length_of(value)? > self.0)
    }
}

/// Fails when a number is below the parameter.
#[derive(Copy, Clone, Debug)]
pub struct MinNumber(pub f64);

impl Validator for MinNumber {
    fn name(&self) -> &str {
        "MinNumber"
    }

    fn param(&self) -> Option<Value> {
        Some(self.0.into())
    }

    fn message(&self) -> String {
        format!("Please enter a number of at least {}", self.0)
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        Ok(number_of(value)? < self.0)
    }
}

/// Fails when a number is above the parameter.
#[derive(Copy, Clone, Debug)]
pub struct MaxNumber(pub f64);

impl Validator for MaxNumber {
    fn name(&self) -> &str {
        "MaxNumber"
    }

    fn param(&self) -> Option<Value> {
        Some(self.0.into())
    }

    fn message(&self) -> String {
        format!("Please enter a number of at most {}", self.0)
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        Ok(number_of(value)? > self.0)
    }
}

type Check = dyn Fn(&Value) -> Result<bool, ValidatorExecutionError>;

/// A validator backed by a closure.
///
/// The closure returns `Ok(true)` when the feedback applies.
///
/// ```
/// use fieldset_tree::validate::Validator;
/// use fieldset_tree::validate::builtin::Predicate;
/// use serde_json::json;
///
/// let even = Predicate::new("Even", |v| Ok(v.as_i64().is_some_and(|n| n % 2 != 0)))
///     .with_message("Please enter an even number");
/// assert_eq!(even.execute(&json!(3)), Ok(true));
/// assert_eq!(even.execute(&json!(4)), Ok(false));
/// ```
pub struct Predicate {
    name: String,
    severity: Severity,
    message: Option<String>,
    is_async: bool,
    check: Box<Check>,
}

impl Predicate {
    /// An error-severity predicate named `name`.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&Value) -> Result<bool, ValidatorExecutionError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            severity: Severity::Error,
            message: None,
            is_async: false,
            check: Box::new(check),
        }
    }

    /// Report with `severity` instead of [`Severity::Error`].
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Use a custom message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Evaluate during [`Form::commit`](crate::Form::commit) instead of inline.
    pub fn deferred(mut self) -> Self {
        self.is_async = true;
        self
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("is_async", &self.is_async)
            .finish_non_exhaustive()
    }
}

impl Validator for Predicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn is_async(&self) -> bool {
        self.is_async
    }

    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("{} is not satisfied", self.name))
    }

    fn execute(&self, value: &Value) -> Result<bool, ValidatorExecutionError> {
        (self.check)(value)
    }
}

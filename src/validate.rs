//! Pluggable value checks run after a field has been extracted.
//!
//! A validator looks at a value and either stays quiet (accept), calls
//! [`Context::reject`] one or more times, or calls [`Context::coerce`] to
//! substitute a different value. Substitutions only take effect when nothing
//! was rejected, so a failing field never ends up half converted.

use std::sync::Arc;

use crate::{field::Value, Error, Result};

pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value, cx: &mut Context<'_>);
}

impl<F> Validator for F
where
    F: Fn(&Value, &mut Context<'_>) + Send + Sync,
{
    fn validate(&self, value: &Value, cx: &mut Context<'_>) {
        self(value, cx)
    }
}

/// Collects the outcome of one validation.
#[derive(Debug)]
pub struct Context<'a> {
    field: &'a str,
    errors: Vec<String>,
    coercions: Vec<Value>,
}

impl<'a> Context<'a> {
    fn new(field: &'a str) -> Context<'a> {
        Context { field, errors: Vec::new(), coercions: Vec::new() }
    }

    pub fn field(&self) -> &str {
        self.field
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn coerce(&mut self, value: Value) {
        self.coercions.push(value);
    }
}

/// Runs `validator` over `value`. Every rejection is reported together; on
/// success the last coercion, if any, replaces the value.
pub(crate) fn check(validator: &dyn Validator, field: &str, value: Value) -> Result<Value> {
    if value == Value::Absent {
        return Ok(value);
    }
    let mut cx = Context::new(field);
    validator.validate(&value, &mut cx);
    if !cx.errors.is_empty() {
        tracing::debug!(field, errors = cx.errors.len(), "validation failed");
        return Err(Error::InvalidValue { field: field.to_string(), messages: cx.errors });
    }
    Ok(cx.coercions.pop().unwrap_or(value))
}

/// Accepts decimal integers and turns a single string into [`Value::Int`].
/// Lists are checked item by item but left as strings.
pub fn is_integer() -> impl Validator {
    |value: &Value, cx: &mut Context<'_>| match value {
        Value::Int(_) | Value::Counter(_) => (),
        Value::Str(it) => match it.parse::<i64>() {
            Ok(n) => cx.coerce(Value::Int(n)),
            Err(_) => cx.reject(format!("expected an integer, got `{it}`")),
        },
        Value::List(items) => {
            for it in items {
                if it.parse::<i64>().is_err() {
                    cx.reject(format!("expected an integer, got `{it}`"));
                }
            }
        }
        other => cx.reject(format!("expected an integer, got {other:?}")),
    }
}

pub fn is_one_of(choices: &[&str]) -> impl Validator {
    let choices: Vec<String> = choices.iter().map(|it| it.to_string()).collect();
    move |value: &Value, cx: &mut Context<'_>| {
        for it in value.texts() {
            if !choices.iter().any(|choice| choice == it) {
                let expected =
                    choices.iter().map(|it| format!("`{it}`")).collect::<Vec<_>>().join(", ");
                cx.reject(format!("expected one of {expected}, got `{it}`"));
            }
        }
    }
}

/// Rejects every string for which `pred` is false with `message`.
pub fn matches<P>(pred: P, message: impl Into<String>) -> impl Validator
where
    P: Fn(&str) -> bool + Send + Sync,
{
    let message = message.into();
    move |value: &Value, cx: &mut Context<'_>| {
        for it in value.texts() {
            if !pred(it) {
                cx.reject(format!("{message}, got `{it}`"));
            }
        }
    }
}

/// Runs every validator against the same value and keeps all of their
/// messages.
pub fn all_of(validators: Vec<Arc<dyn Validator>>) -> impl Validator {
    move |value: &Value, cx: &mut Context<'_>| {
        for it in &validators {
            it.validate(value, cx);
        }
    }
}

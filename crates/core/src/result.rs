use std::{fmt, future::Future};

use serde_json::Value;

use crate::contract::ValidationErrors;

/// Failure side of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure<E> {
    /// The contract rejected the input with field-level errors.
    Invalid(ValidationErrors),
    /// The contract rejected the input without field-level errors.
    Rejected(Value),
    /// The body failed.
    Error(E),
}

impl<E> Failure<E> {
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Failure::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Failure::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            Failure::Error(error) => Some(error),
            _ => None,
        }
    }

    /// True when validation reported errors for `field`.
    pub fn has_key(&self, field: &str) -> bool {
        self.errors().is_some_and(|errors| errors.has_key(field))
    }

    pub fn map_error<F, O>(self, op: O) -> Failure<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Failure::Invalid(errors) => Failure::Invalid(errors),
            Failure::Rejected(value) => Failure::Rejected(value),
            Failure::Error(error) => Failure::Error(op(error)),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Invalid(errors) => write!(f, "validation failed: {errors}"),
            Failure::Rejected(value) => write!(f, "rejected: {value}"),
            Failure::Error(error) => write!(f, "{error}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Failure<E> {}

pub type Outcome<T, E> = Result<T, Failure<E>>;

/// A pair of handlers; exactly one runs for a given outcome.
pub struct Matcher<S, F> {
    on_success: S,
    on_failure: F,
}

impl<S, F> Matcher<S, F> {
    pub fn new(on_success: S, on_failure: F) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }

    pub fn dispatch<T, E, R>(self, outcome: Outcome<T, E>) -> R
    where
        S: FnOnce(T) -> R,
        F: FnOnce(Failure<E>) -> R,
    {
        match outcome {
            Ok(value) => (self.on_success)(value),
            Err(failure) => (self.on_failure)(failure),
        }
    }
}

/// Run a fallible future, capturing its error as `Failure::Error`.
pub async fn safe_call<T, E, Fut>(future: Fut) -> Outcome<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    future.await.map_err(Failure::Error)
}

/// `safe_call` with custom mappings for either side.
pub async fn safe_call_with<T, E, U, G, Fut, S, F>(
    future: Fut,
    on_success: S,
    on_error: F,
) -> Outcome<U, G>
where
    Fut: Future<Output = Result<T, E>>,
    S: FnOnce(T) -> Outcome<U, G>,
    F: FnOnce(E) -> Outcome<U, G>,
{
    match future.await {
        Ok(value) => on_success(value),
        Err(error) => on_error(error),
    }
}

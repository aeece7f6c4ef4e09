use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span};

use crate::{
    args::{Arg, Args, CallArgs, Key},
    contract::{Contract, ValidationOutcome},
    error::UsageError,
    result::{Failure, Matcher, Outcome},
    utils::invocation_id,
};

#[derive(Debug, Clone, Copy)]
enum Presence {
    Required,
    Optional,
    Default(fn() -> Value),
}

/// A constructor parameter of an interactor.
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    name: &'static str,
    presence: Presence,
}

impl Attribute {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Optional,
        }
    }

    pub const fn with_default(name: &'static str, default: fn() -> Value) -> Self {
        Self {
            name,
            presence: Presence::Default(default),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A single unit of business logic with one entrypoint.
///
/// The interactor is deserialized from the normalized call arguments once
/// its contract (if any) accepted the declared attributes.
#[async_trait]
pub trait Interactor: DeserializeOwned + Send + Sized + 'static {
    type Output: Send + 'static;
    type Error: Send + 'static;

    const NAME: &'static str;

    /// Constructor parameters; only these are shown to the contract.
    const ATTRIBUTES: &'static [Attribute];

    fn contract() -> Option<Arc<dyn Contract>> {
        None
    }

    /// Called before a validation failure is returned.
    fn on_validation_failure(_attributes: &Args, _outcome: &ValidationOutcome) {}

    /// The body. Its outcome is returned to the caller as is.
    async fn call(self) -> Outcome<Self::Output, Self::Error>;

    fn invoker() -> Invoker<Self> {
        Invoker::new()
    }

    async fn invoke(args: CallArgs) -> Result<Outcome<Self::Output, Self::Error>, UsageError> {
        Invoker::<Self>::new().with_args(args).invoke().await
    }
}

/// One invocation of `I`: call shape, optional explicit contract.
pub struct Invoker<I> {
    args: CallArgs,
    contract: Option<Arc<dyn Contract>>,
    _interactor: PhantomData<fn() -> I>,
}

impl<I: Interactor> Default for Invoker<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Interactor> Invoker<I> {
    pub fn new() -> Self {
        Self {
            args: CallArgs::new(),
            contract: None,
            _interactor: PhantomData,
        }
    }

    pub fn positional(mut self, arg: impl Into<Arg>) -> Self {
        self.args = self.args.positional(arg);
        self
    }

    pub fn keyword(mut self, key: impl Into<Key>, value: impl Into<Arg>) -> Self {
        self.args = self.args.keyword(key, value);
        self
    }

    pub fn with_args(mut self, args: CallArgs) -> Self {
        self.args = args;
        self
    }

    /// Use `contract` instead of the one declared by `I`.
    pub fn contract(mut self, contract: Arc<dyn Contract>) -> Self {
        self.contract = Some(contract);
        self
    }

    pub async fn invoke(self) -> Result<Outcome<I::Output, I::Error>, UsageError> {
        let span = debug_span!("invoke", interactor = I::NAME, id = %invocation_id());
        self.run().instrument(span).await
    }

    /// Invoke, then hand the outcome to exactly one of the matcher's handlers.
    pub async fn invoke_matching<S, F, R>(self, matcher: Matcher<S, F>) -> Result<R, UsageError>
    where
        S: FnOnce(I::Output) -> R,
        F: FnOnce(Failure<I::Error>) -> R,
    {
        let outcome = self.invoke().await?;
        Ok(matcher.dispatch(outcome))
    }

    async fn run(self) -> Result<Outcome<I::Output, I::Error>, UsageError> {
        let args = self.args.normalize()?;
        let contract = self.contract.or_else(I::contract);
        let instance = Instance::<I>::build(args)?;

        let outcome = match &contract {
            Some(contract) => contract.validate(&instance.attributes),
            None => ValidationOutcome::Success,
        };

        let failure = match &outcome {
            ValidationOutcome::Success => None,
            ValidationOutcome::Failure(errors) => Some(Failure::Invalid(errors.clone())),
            ValidationOutcome::Rejected(raw) => Some(Failure::Rejected(raw.clone())),
        };

        if let Some(failure) = failure {
            debug!(?outcome, "validation failed");
            I::on_validation_failure(&instance.attributes, &outcome);
            return Ok(Err(failure));
        }

        let interactor = instance.materialize()?;
        Ok(interactor.call().await)
    }
}

/// Constructed state of an invocation before the body runs.
struct Instance<I> {
    args: Args,
    attributes: Args,
    _interactor: PhantomData<fn() -> I>,
}

impl<I: Interactor> Instance<I> {
    fn build(mut args: Args) -> Result<Self, UsageError> {
        let mut attributes = Args::new();

        for attribute in I::ATTRIBUTES {
            let name = attribute.name();
            match (args.get(name), attribute.presence) {
                (Some(value), _) => attributes.insert(name, value.clone()),
                (None, Presence::Required) => {
                    return Err(UsageError::MissingAttribute {
                        interactor: I::NAME,
                        attribute: name,
                    });
                }
                (None, Presence::Optional) => {}
                (None, Presence::Default(default)) => {
                    let value = default();
                    args.insert(name, value.clone());
                    attributes.insert(name, value);
                }
            }
        }

        Ok(Self {
            args,
            attributes,
            _interactor: PhantomData,
        })
    }

    fn materialize(self) -> Result<I, UsageError> {
        serde_json::from_value(self.args.into_value()).map_err(|source| {
            UsageError::Construction {
                interactor: I::NAME,
                source,
            }
        })
    }
}

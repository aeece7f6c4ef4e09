pub mod aliases;
pub mod args;
pub mod contract;
pub mod error;
pub mod interactor;
pub mod messages;
pub mod result;
pub mod utils;

pub use crate::args::{Arg, ArgMap, Args, CallArgs, Key, Params, Record, ToMapping};
pub use crate::contract::{Contract, Kind, SchemaContract, ValidationErrors, ValidationOutcome};
pub use crate::error::UsageError;
pub use crate::interactor::{Attribute, Interactor, Invoker};
pub use crate::result::{Failure, Matcher, Outcome, safe_call, safe_call_with};

#[cfg(test)]
mod tests;

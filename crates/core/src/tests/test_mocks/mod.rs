use std::{collections::HashMap, sync::Arc, sync::LazyLock};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    args::Args,
    contract::{Contract, Kind, SchemaContract, ValidationOutcome},
    interactor::{Attribute, Interactor},
    result::{Failure, Outcome},
    utils::generate_short_id,
};

// per-tag call counters
static BODY_CALLS: LazyLock<Mutex<HashMap<String, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static HOOK_CALLS: LazyLock<Mutex<HashMap<String, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub fn new_tag() -> String {
    generate_short_id(16)
}

pub fn body_calls(tag: &str) -> usize {
    BODY_CALLS.lock().get(tag).copied().unwrap_or(0)
}

pub fn hook_calls(tag: &str) -> usize {
    HOOK_CALLS.lock().get(tag).copied().unwrap_or(0)
}

fn record(calls: &Mutex<HashMap<String, usize>>, tag: Option<&str>) {
    if let Some(tag) = tag {
        *calls.lock().entry(tag.to_string()).or_default() += 1;
    }
}

/// Contract double: remembers what it was shown and answers a fixed outcome.
pub struct RecordingContract {
    pub outcome: ValidationOutcome,
    pub last_attributes: Mutex<Option<Args>>,
    pub calls: Mutex<usize>,
}

impl RecordingContract {
    pub fn new(outcome: ValidationOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            last_attributes: Mutex::new(None),
            calls: Mutex::new(0),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(ValidationOutcome::Success)
    }
}

impl Contract for RecordingContract {
    fn validate(&self, attributes: &Args) -> ValidationOutcome {
        *self.last_attributes.lock() = Some(attributes.clone());
        *self.calls.lock() += 1;
        self.outcome.clone()
    }
}

/// Doubles an integer.
#[derive(Debug, Deserialize)]
pub struct Double {
    pub foo: i64,
    #[serde(default)]
    pub tag: Option<String>,
}

#[async_trait]
impl Interactor for Double {
    type Output = i64;
    type Error = String;

    const NAME: &'static str = "Double";
    const ATTRIBUTES: &'static [Attribute] = &[Attribute::required("foo")];

    fn contract() -> Option<Arc<dyn Contract>> {
        Some(Arc::new(SchemaContract::new().required("foo", Kind::Integer)))
    }

    async fn call(self) -> Outcome<i64, String> {
        record(&BODY_CALLS, self.tag.as_deref());
        Ok(self.foo * 2)
    }
}

/// Returns its input untouched; declares no contract.
#[derive(Debug, Deserialize)]
pub struct Echo {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub tag: Option<String>,
}

#[async_trait]
impl Interactor for Echo {
    type Output = Value;
    type Error = String;

    const NAME: &'static str = "Echo";
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute::optional("value"),
        Attribute::optional("tag"),
    ];

    async fn call(self) -> Outcome<Value, String> {
        record(&BODY_CALLS, self.tag.as_deref());
        Ok(self.value)
    }
}

/// Body always fails.
#[derive(Debug, Deserialize)]
pub struct Explode {
    pub reason: String,
}

#[async_trait]
impl Interactor for Explode {
    type Output = ();
    type Error = String;

    const NAME: &'static str = "Explode";
    const ATTRIBUTES: &'static [Attribute] = &[Attribute::required("reason")];

    fn contract() -> Option<Arc<dyn Contract>> {
        Some(Arc::new(SchemaContract::new().required("reason", Kind::String)))
    }

    async fn call(self) -> Outcome<(), String> {
        Err(Failure::Error(self.reason))
    }
}

fn default_greeting() -> Value {
    json!("Hello")
}

/// Mixes required, optional and defaulted attributes.
#[derive(Debug, Deserialize)]
pub struct Greet {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub greeting: String,
}

#[async_trait]
impl Interactor for Greet {
    type Output = String;
    type Error = String;

    const NAME: &'static str = "Greet";
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute::required("name"),
        Attribute::optional("title"),
        Attribute::with_default("greeting", default_greeting),
    ];

    async fn call(self) -> Outcome<String, String> {
        Ok(match self.title {
            Some(title) => format!("{}, {} {}", self.greeting, title, self.name),
            None => format!("{}, {}", self.greeting, self.name),
        })
    }
}

/// Overrides the validation-failure hook.
#[derive(Debug, Deserialize)]
pub struct Audited {
    pub foo: i64,
    pub tag: String,
}

#[async_trait]
impl Interactor for Audited {
    type Output = i64;
    type Error = String;

    const NAME: &'static str = "Audited";
    const ATTRIBUTES: &'static [Attribute] =
        &[Attribute::required("foo"), Attribute::required("tag")];

    fn contract() -> Option<Arc<dyn Contract>> {
        Some(Arc::new(SchemaContract::new().required("foo", Kind::Integer)))
    }

    fn on_validation_failure(attributes: &Args, _outcome: &ValidationOutcome) {
        record(&HOOK_CALLS, attributes.get("tag").and_then(Value::as_str));
    }

    async fn call(self) -> Outcome<i64, String> {
        Ok(self.foo)
    }
}

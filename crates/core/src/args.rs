use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::{error::UsageError, messages};

/// A field key as supplied by the caller. Both forms name the same field
/// once arguments are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Symbol(String),
    Text(String),
}

impl Key {
    pub fn symbol(name: impl Into<String>) -> Self {
        Key::Symbol(name.into())
    }

    pub fn text(name: impl Into<String>) -> Self {
        Key::Text(name.into())
    }

    /// Canonical field name.
    pub fn name(&self) -> &str {
        match self {
            Key::Symbol(name) | Key::Text(name) => name,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Symbol(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Symbol(name)
    }
}

/// An ordered keyed mapping whose keys may mix both representations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgMap {
    entries: Vec<(Key, Arg)>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Arg>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Arg>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical object. On a key collision after normalization the later
    /// entry wins.
    pub fn into_object(self) -> Map<String, Value> {
        let mut object = Map::new();
        for (key, value) in self.entries {
            object.insert(key.name().to_string(), value.into_value());
        }
        object
    }
}

impl<K: Into<Key>, V: Into<Arg>> FromIterator<(K, V)> for ArgMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Values that can present themselves as a keyed mapping.
pub trait ToMapping {
    fn to_mapping(&self) -> ArgMap;
}

/// Request parameters as they arrive from a web layer: string keys, with an
/// optional permit list restricting which keys survive conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    entries: Vec<(String, Arg)>,
    permitted: Option<BTreeSet<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn permit<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted
            .get_or_insert_with(BTreeSet::new)
            .extend(keys.into_iter().map(Into::into));
        self
    }

    fn is_permitted(&self, key: &str) -> bool {
        self.permitted
            .as_ref()
            .is_none_or(|permitted| permitted.contains(key))
    }
}

impl ToMapping for Params {
    fn to_mapping(&self) -> ArgMap {
        let mut mapping = ArgMap::new();
        for (key, value) in &self.entries {
            if self.is_permitted(key) {
                mapping.insert(Key::text(key.clone()), value.clone());
            } else {
                debug!(key = %key, "dropping unpermitted parameter");
            }
        }
        mapping
    }
}

/// A named struct-like value with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<(Key, Arg)>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<Key>, value: impl Into<Arg>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ToMapping for Record {
    fn to_mapping(&self) -> ArgMap {
        self.fields.iter().cloned().collect()
    }
}

/// A value at the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Map(ArgMap),
    List(Vec<Arg>),
    Params(Params),
    Record(Record),
}

impl Arg {
    /// Whether this argument can stand in for the keyed arguments of a call.
    pub fn is_record_like(&self) -> bool {
        matches!(
            self,
            Arg::Value(Value::Object(_)) | Arg::Map(_) | Arg::Params(_) | Arg::Record(_)
        )
    }

    /// Convert to canonical JSON, expanding convertible wrappers.
    pub fn into_value(self) -> Value {
        match self {
            Arg::Value(value) => value,
            Arg::Map(map) => Value::Object(map.into_object()),
            Arg::List(items) => Value::Array(items.into_iter().map(Arg::into_value).collect()),
            Arg::Params(params) => Value::Object(params.to_mapping().into_object()),
            Arg::Record(record) => Value::Object(record.to_mapping().into_object()),
        }
    }

    fn into_object(self) -> Option<Map<String, Value>> {
        match self.into_value() {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Arg::Record(record) => format!("#<{}>", record.name()),
            other => other.clone().into_value().to_string(),
        }
    }
}

macro_rules! arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

arg_from_value!(bool, i32, i64, u32, u64, f64, &str, String);

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<ArgMap> for Arg {
    fn from(map: ArgMap) -> Self {
        Arg::Map(map)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

impl From<Params> for Arg {
    fn from(params: Params) -> Self {
        Arg::Params(params)
    }
}

impl From<Record> for Arg {
    fn from(record: Record) -> Self {
        Arg::Record(record)
    }
}

/// Normalized invocation arguments: canonical field names to JSON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(Map<String, Value>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Args {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Raw call shape: positional arguments plus keyword arguments.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Arg>,
    keyed: ArgMap,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(mut self, arg: impl Into<Arg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    pub fn keyword(mut self, key: impl Into<Key>, value: impl Into<Arg>) -> Self {
        self.keyed.insert(key, value);
        self
    }

    /// Merge and normalize into canonical arguments.
    ///
    /// At most one positional argument is accepted and it must be
    /// record-like. Keyword arguments win over positional ones on collision.
    pub fn normalize(self) -> Result<Args, UsageError> {
        let CallArgs {
            mut positional,
            keyed,
        } = self;

        let mut merged = match positional.len() {
            0 => Map::new(),
            1 if positional[0].is_record_like() => positional
                .pop()
                .and_then(Arg::into_object)
                .unwrap_or_default(),
            _ => return Err(unexpected_positional(&positional)),
        };

        merged.extend(keyed.into_object());

        Ok(Args(merged))
    }
}

fn unexpected_positional(positional: &[Arg]) -> UsageError {
    let args = format!(
        "[{}]",
        positional
            .iter()
            .map(Arg::inspect)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let message = messages::translate(
        messages::DEFAULT_LOCALE,
        "errors.unexpected_positional_arguments",
        &[("args", &args)],
    );

    UsageError::UnexpectedPositional { message, args }
}

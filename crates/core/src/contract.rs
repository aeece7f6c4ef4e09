use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{args::Args, messages};

/// Field name to human-readable messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn has_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field} {}", messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

/// What a contract concluded about a set of attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Success,
    Failure(ValidationErrors),
    /// A failure that carries no field-level errors.
    Rejected(Value),
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success)
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationOutcome::Failure(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ValidationOutcome {
    fn from(errors: ValidationErrors) -> Self {
        if errors.is_empty() {
            ValidationOutcome::Success
        } else {
            ValidationOutcome::Failure(errors)
        }
    }
}

/// A rule set applied to an interactor's declared attributes before it runs.
pub trait Contract: Send + Sync {
    fn validate(&self, attributes: &Args) -> ValidationOutcome;
}

impl<F> Contract for F
where
    F: Fn(&Args) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, attributes: &Args) -> ValidationOutcome {
        self(attributes)
    }
}

/// Expected shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Any,
    String,
    Integer,
    Bool,
    Hash,
    Array,
}

impl Kind {
    fn check(self, value: &Value) -> Result<(), &'static str> {
        let ok = match self {
            Kind::Any => true,
            Kind::String => value.is_string(),
            Kind::Integer => value.is_i64() || value.is_u64(),
            Kind::Bool => value.is_boolean(),
            Kind::Hash => value.is_object(),
            Kind::Array => value.is_array(),
        };

        if ok {
            return Ok(());
        }

        Err(match self {
            Kind::Any => "filled?",
            Kind::String => "str?",
            Kind::Integer => "int?",
            Kind::Bool => "bool?",
            Kind::Hash => "hash?",
            Kind::Array => "array?",
        })
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    required: bool,
    filled: bool,
    kind: Kind,
}

type RuleFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

struct Rule {
    field: String,
    check: Arc<RuleFn>,
}

/// Declarative contract: a key schema followed by per-field rules.
///
/// Rules for a field only run when its schema checks passed. Rule failures
/// name a message key that is looked up under the contract's locale.
pub struct SchemaContract {
    locale: String,
    fields: Vec<FieldSpec>,
    rules: Vec<Rule>,
}

impl Default for SchemaContract {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaContract {
    pub fn new() -> Self {
        Self {
            locale: messages::DEFAULT_LOCALE.to_string(),
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn current_locale(&self) -> &str {
        &self.locale
    }

    /// Key must be present, non-empty and of `kind`.
    pub fn required(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            required: true,
            filled: true,
            kind,
        });
        self
    }

    /// Key may be absent; when present it must be of `kind`.
    pub fn optional(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            required: false,
            filled: false,
            kind,
        });
        self
    }

    /// Extra check for a field. `Err` carries a message key.
    pub fn rule<F>(mut self, field: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            field: field.into(),
            check: Arc::new(check),
        });
        self
    }

    fn check_field(&self, spec: &FieldSpec, attributes: &Args) -> Result<(), String> {
        let value = match attributes.get(&spec.name) {
            Some(value) => value,
            None if spec.required => return Err(messages::error_message(&self.locale, "key?")),
            None => return Ok(()),
        };

        if spec.filled && is_blank(value) {
            return Err(messages::error_message(&self.locale, "filled?"));
        }

        if !spec.required && value.is_null() {
            return Ok(());
        }

        spec.kind
            .check(value)
            .map_err(|predicate| messages::error_message(&self.locale, predicate))
    }
}

impl Contract for SchemaContract {
    fn validate(&self, attributes: &Args) -> ValidationOutcome {
        let mut errors = ValidationErrors::new();

        for spec in &self.fields {
            if let Err(message) = self.check_field(spec, attributes) {
                errors.add(spec.name.clone(), message);
            }
        }

        for rule in &self.rules {
            if errors.has_key(&rule.field) {
                continue;
            }
            let Some(value) = attributes.get(&rule.field) else {
                continue;
            };
            if let Err(key) = (rule.check)(value) {
                errors.add(rule.field.clone(), messages::error_message(&self.locale, &key));
            }
        }

        errors.into()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

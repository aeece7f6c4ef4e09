use std::{collections::HashMap, sync::LazyLock};

use parking_lot::RwLock;

pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN: &[(&str, &str)] = &[
    (
        "errors.unexpected_positional_arguments",
        "Unexpected positional arguments: %{args}",
    ),
    ("errors.key?", "is missing"),
    ("errors.filled?", "must be filled"),
    ("errors.str?", "must be a string"),
    ("errors.int?", "must be an integer"),
    ("errors.bool?", "must be boolean"),
    ("errors.hash?", "must be a hash"),
    ("errors.array?", "must be an array"),
    ("errors.invalid_http_method", "is not a supported HTTP method"),
    ("errors.invalid_url", "is not a valid URL"),
];

type Catalog = HashMap<(String, String), String>;

static CATALOG: LazyLock<RwLock<Catalog>> = LazyLock::new(|| {
    let catalog = BUILTIN
        .iter()
        .map(|(key, template)| {
            (
                (DEFAULT_LOCALE.to_string(), key.to_string()),
                template.to_string(),
            )
        })
        .collect();

    RwLock::new(catalog)
});

/// Register (or replace) a message template for a locale.
pub fn register(locale: &str, key: &str, template: &str) {
    CATALOG
        .write()
        .insert((locale.to_string(), key.to_string()), template.to_string());
}

/// Look up `key` for `locale` and interpolate `%{name}` placeholders.
///
/// Falls back to the default locale, then to the bare key.
pub fn translate(locale: &str, key: &str, vars: &[(&str, &str)]) -> String {
    let template = {
        let catalog = CATALOG.read();
        catalog
            .get(&(locale.to_string(), key.to_string()))
            .or_else(|| catalog.get(&(DEFAULT_LOCALE.to_string(), key.to_string())))
            .cloned()
    };

    let Some(mut message) = template else {
        return key.to_string();
    };

    for (name, value) in vars {
        message = message.replace(&format!("%{{{name}}}"), value);
    }

    message
}

/// Shorthand for an `errors.*` message.
pub fn error_message(locale: &str, name: &str) -> String {
    translate(locale, &format!("errors.{name}"), &[])
}

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use interactor_core::{
    Attribute, Contract, Interactor, Kind, Outcome, SchemaContract, safe_call,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::{
    connection::{Connection, ConnectionOptions, Response},
    error::HttpError,
};

pub const ALLOWED_METHODS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

static CONTRACT: LazyLock<Arc<SchemaContract>> = LazyLock::new(|| {
    Arc::new(
        SchemaContract::new()
            .required("http_method", Kind::String)
            .required("url", Kind::String)
            .optional("request_params", Kind::Any)
            .optional("request_headers", Kind::Hash)
            .optional("options", Kind::Hash)
            .rule("http_method", |value| {
                let method = value.as_str().unwrap_or_default().to_ascii_lowercase();
                if ALLOWED_METHODS.contains(&method.as_str()) {
                    Ok(())
                } else {
                    Err("invalid_http_method".to_string())
                }
            })
            .rule("url", |value| {
                match value.as_str().map(Url::parse) {
                    Some(Ok(_)) => Ok(()),
                    _ => Err("invalid_url".to_string()),
                }
            }),
    )
});

fn empty_object() -> Value {
    json!({})
}

/// Performs one HTTP request.
#[derive(Debug, Deserialize)]
pub struct RequestInteractor {
    http_method: String,
    url: String,
    #[serde(default)]
    request_params: Value,
    #[serde(default)]
    request_headers: Value,
    #[serde(default)]
    options: Value,
}

impl RequestInteractor {
    async fn perform(&self) -> Result<Response, HttpError> {
        let method = Method::from_bytes(self.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| HttpError::InvalidMethod(self.http_method.clone()))?;
        let headers = match &self.request_headers {
            Value::Null => Map::new(),
            Value::Object(headers) => headers.clone(),
            other => return Err(HttpError::InvalidHeader(other.to_string())),
        };
        let options = match &self.options {
            Value::Null => ConnectionOptions::default(),
            options => serde_json::from_value(options.clone())
                .map_err(|e| HttpError::InvalidOptions(e.to_string()))?,
        };
        let connection = Connection::new(&self.url, &headers, &options)?;

        connection.send(method, &self.request_params).await
    }
}

#[async_trait]
impl Interactor for RequestInteractor {
    type Output = Response;
    type Error = HttpError;

    const NAME: &'static str = "RequestInteractor";
    const ATTRIBUTES: &'static [Attribute] = &[
        Attribute::required("http_method"),
        Attribute::required("url"),
        Attribute::with_default("request_params", empty_object),
        Attribute::with_default("request_headers", empty_object),
        Attribute::with_default("options", empty_object),
    ];

    fn contract() -> Option<Arc<dyn Contract>> {
        Some(CONTRACT.clone())
    }

    async fn call(self) -> Outcome<Response, HttpError> {
        let response = safe_call(self.perform())
            .await
            .inspect_err(|failure| warn!(%failure, url = %self.url, "request failed"))?;

        debug!(status = response.status, "request completed");
        Ok(response)
    }
}

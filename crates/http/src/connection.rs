use std::{collections::BTreeMap, time::Duration};

use bytes::Bytes;
use reqwest::{
    Client, Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::HttpError;

/// Per-call transport settings. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionOptions {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

/// What came back from the server. Error statuses are still responses.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A client bound to one URL with default headers.
pub struct Connection {
    client: Client,
    url: Url,
}

impl Connection {
    pub fn new(
        url: &str,
        headers: &Map<String, Value>,
        options: &ConnectionOptions,
    ) -> Result<Self, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder().default_headers(header_map(headers)?);
        if let Some(ms) = options.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = options.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send `params` as the query for GET/DELETE, as a urlencoded form
    /// otherwise. A string is sent as the raw body.
    pub async fn send(&self, method: Method, params: &Value) -> Result<Response, HttpError> {
        debug!(%method, url = %self.url, "sending request");

        let in_query = method == Method::GET || method == Method::DELETE;
        let mut request = self.client.request(method, self.url.clone());

        request = match params {
            Value::Null => request,
            Value::Object(map) if map.is_empty() => request,
            Value::Object(map) if in_query => request.query(&form_pairs(map)),
            Value::Object(map) => request.form(&form_pairs(map)),
            Value::String(body) => request.body(body.clone()),
            other => request.json(other),
        };

        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn header_map(headers: &Map<String, Value>) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
        let header_value = HeaderValue::from_str(&scalar_text(value))
            .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Flatten a mapping into form pairs; nested values are sent as JSON text.
pub(crate) fn form_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), scalar_text(value)))
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

use std::{env, time::Duration};

use interactor_core::CallArgs;
use serde_json::{Map, Value, json};

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct RequestConfig {
    pub http_method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl RequestConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let url = env::var("REQUEST_URL")
            .map_err(|_| AppError::Config("REQUEST_URL not set".into()))?;

        let http_method = env::var("REQUEST_METHOD").unwrap_or_else(|_| "get".to_string());

        let timeout = match env::var("REQUEST_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| AppError::Config(format!("REQUEST_TIMEOUT_MS is not a number: {raw}")))?,
            Err(_) => Duration::from_secs(10),
        };

        let headers = env::var("REQUEST_HEADERS")
            .map(|raw| parse_headers(&raw))
            .unwrap_or_default();

        Ok(Self {
            http_method,
            url,
            headers,
            timeout,
        })
    }

    pub fn call_args(&self) -> CallArgs {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();

        CallArgs::new()
            .keyword("http_method", self.http_method.as_str())
            .keyword("url", self.url.as_str())
            .keyword("request_headers", Value::Object(headers))
            .keyword("options", json!({ "timeout_ms": self.timeout.as_millis() as u64 }))
    }
}

/// `Name: value; Other: value`
fn parse_headers(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| pair.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_split_on_semicolons() {
        let headers = parse_headers("Accept: application/json; X-Trace : abc ;broken");

        assert_eq!(
            headers,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn call_args_carry_every_setting() {
        let config = RequestConfig {
            http_method: "post".into(),
            url: "https://example.com/hooks".into(),
            headers: vec![("X-Token".into(), "t".into())],
            timeout: Duration::from_millis(250),
        };

        let args = config.call_args().normalize().expect("keyword-only call");

        assert_eq!(
            args.into_value(),
            json!({
                "http_method": "post",
                "url": "https://example.com/hooks",
                "request_headers": {"X-Token": "t"},
                "options": {"timeout_ms": 250},
            })
        );
    }
}

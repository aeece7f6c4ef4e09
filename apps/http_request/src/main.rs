use dotenvy::{dotenv, from_filename};
use interactor_core::{Failure, Interactor, Matcher, aliases::install_legacy_aliases};
use interactor_http::{HttpError, RequestInteractor, Response};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::RequestConfig, errors::AppError};

pub mod config;
pub mod errors;

fn load_env_for_workspace() {
    let _ = from_filename(concat!(env!("CARGO_MANIFEST_DIR"), "/.env"));
    let _ = from_filename(".env");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();

    load_env_for_workspace();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    install_legacy_aliases();

    let cfg = RequestConfig::from_env()?;
    info!(method = %cfg.http_method, url = %cfg.url, "performing request");

    RequestInteractor::invoker()
        .with_args(cfg.call_args())
        .invoke_matching(Matcher::new(
            |response: Response| {
                info!(status = response.status, bytes = response.body.len(), "response received");
                println!("{}", response.text());
                Ok(())
            },
            |failure: Failure<HttpError>| {
                error!(%failure, "request did not complete");
                Err(AppError::Request(failure.to_string()))
            },
        ))
        .await?
}

pub mod connection;
pub mod error;
pub mod request_interactor;

pub use crate::connection::{Connection, ConnectionOptions, Response};
pub use crate::error::HttpError;
pub use crate::request_interactor::{ALLOWED_METHODS, RequestInteractor};

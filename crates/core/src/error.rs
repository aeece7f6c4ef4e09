use thiserror::Error;

/// Malformed calls. These never travel inside a `Failure`; the caller gets
/// them on the outer `Result` of an invocation.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("{message}")]
    UnexpectedPositional { message: String, args: String },

    #[error("{interactor}: missing keyword: {attribute}")]
    MissingAttribute {
        interactor: &'static str,
        attribute: &'static str,
    },

    #[error("{interactor}: cannot build from validated attributes: {source}")]
    Construction {
        interactor: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

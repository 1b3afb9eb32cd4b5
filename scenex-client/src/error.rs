//! Error taxonomy for the engine.
//!
//! Only submission failures are handed back to callers; channel faults
//! are contained, logged and retried inside the channel client.

use thiserror::Error;

use scenex_model::draft::Violation;
use scenex_model::ids::ScenarioId;

/// Failure of a `submit` or listing call.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No bearer token on the session; checked before any network call.
    #[error("authentication token not found, please login again")]
    Auth,

    /// Draft failed local checks; no network call was made.
    #[error("{}", summarize_violations(.0))]
    Validation(Vec<Violation>),

    /// Backend answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure before a status was received.
    #[error("network failure during request")]
    Network(#[from] reqwest::Error),

    /// Backend answered 2xx but the body was not in the expected shape.
    #[error("unexpected response body from server")]
    InvalidResponse,

    /// The registry refused the resulting record.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn summarize_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of a registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("scenario {0} is already present in the registry")]
    DuplicateId(ScenarioId),
}

/// Failure while opening the push channel.
///
/// Never surfaced to callers as a hard failure; logged and retried.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("push channel connect failed: {0}")]
    Connect(String),
}

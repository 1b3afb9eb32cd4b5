//! Client-side scenario lifecycle engine.
//!
//! Coordinates two independent producers into one consistent record set:
//! the submission gateway (request/response path) and the push channel
//! client (streaming event path). All record mutations funnel through
//! the [`registry::ScenarioRegistry`]; process-wide state lives on the
//! [`session::SessionContext`].

pub mod api;
pub mod channel;
pub mod error;
pub mod form;
pub mod gateway;
pub mod registry;
pub mod session;
pub mod testing;

pub use api::{ApiClient, ScenarioApi};
pub use channel::{ChannelClient, ChannelState, DEFAULT_RETRY_DELAY};
pub use error::{ChannelError, RegistryError, SubmitError};
pub use form::ScenarioForm;
pub use gateway::SubmissionGateway;
pub use registry::{
    ChangeKind, ListenerId, MergeOutcome, RegistryChange, ScenarioPatch,
    ScenarioRegistry,
};
pub use session::{ScenarioFailure, SessionContext};

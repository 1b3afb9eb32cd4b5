//! Transport seam for the push channel.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::ChannelError;

/// One connection's worth of transport activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established; frames may follow.
    Open,
    /// One inbound frame, raw text.
    Frame(String),
    /// The remote side closed or the transport errored.
    Closed(String),
}

/// Stream of events for a single connection attempt. The stream ending,
/// with or without a `Closed` event, counts as a close.
pub type TransportStream = BoxStream<'static, TransportEvent>;

/// A connect-per-attempt push transport.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open one connection. Errors here are connect failures and
    /// trigger the client's retry path.
    async fn open(&self) -> Result<TransportStream, ChannelError>;

    /// Attempt to send an outbound frame. Returns whether the transport
    /// accepted it; the channel is receive-dominant and delivery is not
    /// confirmed either way.
    async fn send(&self, frame: String) -> bool;
}

//! Server-sent-events transport for the push channel.

use async_trait::async_trait;
use futures::StreamExt;

use scenex_contracts::routes::v1;

use crate::channel::transport::{
    PushTransport, TransportEvent, TransportStream,
};
use crate::error::ChannelError;
use crate::session::SessionContext;

/// Production transport over the backend's SSE event endpoint.
///
/// Reconnection policy lives in the channel client, not here: each
/// `open` is a single connection attempt, and any transport error is
/// reported as a close so the client owns the retry timer.
pub struct SseTransport {
    client: reqwest::Client,
    url: String,
    session: SessionContext,
}

impl std::fmt::Debug for SseTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseTransport").field("url", &self.url).finish()
    }
}

impl SseTransport {
    pub fn new(
        base_url: impl AsRef<str>,
        session: SessionContext,
    ) -> Self {
        let url = format!(
            "{}{}",
            base_url.as_ref().trim_end_matches('/'),
            v1::events::SCENARIOS
        );
        SseTransport {
            client: reqwest::Client::new(),
            url,
            session,
        }
    }
}

#[async_trait]
impl PushTransport for SseTransport {
    async fn open(&self) -> Result<TransportStream, ChannelError> {
        log::info!("Creating scenario events SSE connection to: {}", self.url);

        let mut request = self.client.get(&self.url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        let source = reqwest_eventsource::EventSource::new(request)
            .map_err(|err| ChannelError::Connect(err.to_string()))?;

        let stream = source.map(|event| match event {
            Ok(reqwest_eventsource::Event::Open) => TransportEvent::Open,
            Ok(reqwest_eventsource::Event::Message(msg)) => {
                TransportEvent::Frame(msg.data)
            }
            Err(err) => TransportEvent::Closed(err.to_string()),
        });

        Ok(Box::pin(stream))
    }

    async fn send(&self, _frame: String) -> bool {
        // The SSE channel is server-to-client only.
        false
    }
}

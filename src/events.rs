use std::future::Future;

use aws_sdk_eventbridge::Client;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::model::fixture::{LINEUP_SET_DETAIL_TYPE, LineupOrigin, LineupSet};

/// Announces stored lineups to whoever is listening.
pub trait EventPublisher {
    fn publish(
        &self,
        origin: LineupOrigin,
        event: &LineupSet,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct EventBridgePublisher {
    client: Client,
    event_bus: String,
}

impl EventBridgePublisher {
    pub fn new(client: Client, event_bus: impl Into<String>) -> Self {
        Self { client, event_bus: event_bus.into() }
    }
}

impl EventPublisher for EventBridgePublisher {
    #[instrument(
        level = "info",
        skip(self, event),
        fields(match_id = event.match_id, source = origin.source())
    )]
    async fn publish(&self, origin: LineupOrigin, event: &LineupSet) -> Result<()> {
        let entry = PutEventsRequestEntry::builder()
            .event_bus_name(&self.event_bus)
            .detail_type(LINEUP_SET_DETAIL_TYPE)
            .source(origin.source())
            .detail(serde_json::to_string(event)?)
            .build();

        let output = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(aws_sdk_eventbridge::Error::from)?;

        // PutEvents reports per-entry failures with a 200 response
        if let Some(failed) = output.entries().iter().find(|e| e.error_code().is_some()) {
            return Err(Error::Publish(format!(
                "{}: {}",
                failed.error_code().unwrap_or_default(),
                failed.error_message().unwrap_or_default()
            )));
        }

        info!("Published Lineup Set event");
        Ok(())
    }
}

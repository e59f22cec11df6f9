use aws_lambda_events::eventbridge::EventBridgeEvent;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::model::fixture::{LINEUP_SET_DETAIL_TYPE, LineupSet};
use crate::notify::{TwilioSecret, dispatch};
use crate::secrets::ExtensionSecrets;
use crate::settings::{ExtensionSettings, MakeCallSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

pub struct MakeCall {
    secrets: ExtensionSecrets,
    secret_name: String,
}

impl MakeCall {
    pub fn new(settings: MakeCallSettings, extension: &ExtensionSettings) -> Self {
        Self { secrets: ExtensionSecrets::new(extension), secret_name: settings.twilio_secret_name }
    }
}

/// Accept a Lineup Set event from either resolver.
pub fn lineup_event(event: EventBridgeEvent<LineupSet>) -> crate::Result<LineupSet> {
    if event.detail_type != LINEUP_SET_DETAIL_TYPE {
        let message = format!("detail type {}", event.detail_type);
        return Err(crate::Error::UnexpectedEvent(message));
    }
    info!(source = %event.source, match_id = event.detail.match_id, "Received lineup");
    Ok(event.detail)
}

#[instrument(skip(call, event))]
pub async fn handler(
    call: &MakeCall,
    event: LambdaEvent<EventBridgeEvent<LineupSet>>,
) -> Result<Response, Error> {
    let lineup = lineup_event(event.payload)?;
    let secret: TwilioSecret = call.secrets.fetch(&call.secret_name).await?;
    let recipients = secret.recipients(&call.secret_name)?;
    let sent = dispatch(&secret.client(), &recipients, &lineup).await?;
    Ok(Response {
        message: format!("Lineup for match {} sent to {} recipients", lineup.match_id, sent),
    })
}

use std::collections::HashMap;

use aws_config::SdkConfig;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::events::EventBridgePublisher;
use crate::fotmob::{FotmobAuth, FotmobClient};
use crate::resolver::fotmob::FotmobResolver;
use crate::resolver::{CheckOutcome, check_lineup};
use crate::secrets::ExtensionSecrets;
use crate::settings::{CheckLineupSettings, ExtensionSettings};
use crate::store::DynamoFixtureStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub match_id: i64,
}

pub struct CheckLineup {
    store: DynamoFixtureStore,
    publisher: EventBridgePublisher,
    secrets: ExtensionSecrets,
    token_secret_name: Option<String>,
}

impl CheckLineup {
    pub fn new(
        settings: CheckLineupSettings,
        extension: &ExtensionSettings,
        aws: &SdkConfig,
    ) -> Self {
        let dynamodb = aws_sdk_dynamodb::Client::new(aws);
        let eventbridge = aws_sdk_eventbridge::Client::new(aws);
        Self {
            store: DynamoFixtureStore::new(dynamodb, settings.table_name),
            publisher: EventBridgePublisher::new(eventbridge, settings.event_bus_arn),
            secrets: ExtensionSecrets::new(extension),
            token_secret_name: settings.fotmob_token_secret_name,
        }
    }

    /// Use the rotated header bundle when one is configured, otherwise sign requests.
    async fn fotmob_auth(&self) -> crate::Result<FotmobAuth> {
        match &self.token_secret_name {
            Some(name) => {
                let headers: HashMap<String, String> = self.secrets.fetch(name).await?;
                Ok(FotmobAuth::Headers(headers))
            }
            None => Ok(FotmobAuth::Signed),
        }
    }
}

#[instrument(skip(check, event), fields(match_id = event.payload.match_id))]
pub async fn handler(
    check: &CheckLineup,
    event: LambdaEvent<Request>,
) -> Result<CheckOutcome, Error> {
    let resolver = FotmobResolver::new(FotmobClient::new(check.fotmob_auth().await?));
    let match_id = event.payload.match_id;
    let outcome = check_lineup(&resolver, &check.store, &check.publisher, match_id).await?;
    Ok(outcome)
}

use aws_config::SdkConfig;
use chrono::{DateTime, Utc};
use lambda_runtime::{Error, LambdaEvent};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::events::EventBridgePublisher;
use crate::mastodon::MastodonClient;
use crate::mistral::{MistralClient, VisionModel};
use crate::resolver::vision::VisionResolver;
use crate::resolver::{CheckOutcome, check_lineup};
use crate::secrets::ExtensionSecrets;
use crate::settings::{AiCheckLineupSettings, ExtensionSettings};
use crate::store::DynamoFixtureStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub match_id: i64,
    pub lineup_announcement_at: DateTime<Utc>,
}

/// Keys shared by the bot's third party integrations.
#[derive(Debug, Deserialize)]
pub struct SharedSecrets {
    #[serde(rename = "MISTRAL_API_KEY")]
    pub mistral_api_key: SecretString,
}

/// Mistral client that reads its API key from the shared secret bundle when asked a question,
/// so ticks that never reach the model skip the secret lookup.
#[derive(Debug, Clone)]
pub struct SharedSecretMistral {
    secrets: ExtensionSecrets,
    secret_name: String,
    model: String,
}

impl VisionModel for SharedSecretMistral {
    async fn complete(&self, image_url: &str, prompt: &str) -> crate::Result<Option<String>> {
        let shared: SharedSecrets = self.secrets.fetch(&self.secret_name).await?;
        let client = MistralClient::new(shared.mistral_api_key, self.model.clone());
        client.complete(image_url, prompt).await
    }
}

pub struct AiCheckLineup {
    store: DynamoFixtureStore,
    publisher: EventBridgePublisher,
    mastodon: MastodonClient,
    model: SharedSecretMistral,
}

impl AiCheckLineup {
    pub fn new(
        settings: AiCheckLineupSettings,
        extension: &ExtensionSettings,
        aws: &SdkConfig,
    ) -> Self {
        let dynamodb = aws_sdk_dynamodb::Client::new(aws);
        let eventbridge = aws_sdk_eventbridge::Client::new(aws);
        Self {
            store: DynamoFixtureStore::new(dynamodb, settings.table_name),
            publisher: EventBridgePublisher::new(eventbridge, settings.event_bus_arn),
            mastodon: MastodonClient::new(
                settings.mastodon_instance_url,
                settings.mastodon_account_id,
            ),
            model: SharedSecretMistral {
                secrets: ExtensionSecrets::new(extension),
                secret_name: settings.shared_secrets,
                model: settings.mistral_model,
            },
        }
    }
}

#[instrument(skip(check, event), fields(match_id = event.payload.match_id))]
pub async fn handler(
    check: &AiCheckLineup,
    event: LambdaEvent<Request>,
) -> Result<CheckOutcome, Error> {
    let request = event.payload;
    let resolver = VisionResolver::new(
        check.mastodon.clone(),
        check.model.clone(),
        request.lineup_announcement_at,
    );
    let outcome = check_lineup(&resolver, &check.store, &check.publisher, request.match_id).await?;
    Ok(outcome)
}

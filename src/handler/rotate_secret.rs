use aws_config::SdkConfig;
use lambda_runtime::{Error, LambdaEvent};
use tracing::instrument;

use crate::rotation::{HttpTokenService, RotationEvent, SecretsManagerStore, rotate};
use crate::settings::RotationSettings;

pub struct RotateSecret {
    store: SecretsManagerStore,
    tokens: HttpTokenService,
}

impl RotateSecret {
    pub fn new(settings: RotationSettings, aws: &SdkConfig) -> Self {
        Self {
            store: SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(aws)),
            tokens: HttpTokenService::new(settings.fotmob_token_url, settings.fotmob_test_url),
        }
    }
}

#[instrument(skip(rotation, event))]
pub async fn handler(
    rotation: &RotateSecret,
    event: LambdaEvent<RotationEvent>,
) -> Result<(), Error> {
    rotate(&event.payload, &rotation.store, &rotation.tokens).await?;
    Ok(())
}

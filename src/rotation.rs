use std::collections::HashMap;
use std::future::Future;

use aws_sdk_secretsmanager::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};

pub const CURRENT_STAGE: &str = "AWSCURRENT";
pub const PENDING_STAGE: &str = "AWSPENDING";

/// The four steps Secrets Manager walks through, one invocation each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationStep {
    CreateSecret,
    SetSecret,
    TestSecret,
    FinishSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RotationEvent {
    pub step: RotationStep,
    pub secret_id: String,
    /// Version id of the secret being rotated in.
    pub client_request_token: String,
}

/// Versioned secret storage used by the rotation steps.
pub trait SecretVersionStore {
    fn put_pending(
        &self,
        secret_id: &str,
        version_id: &str,
        value: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn pending_value(&self, secret_id: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Version id currently labelled current, if any.
    fn current_version(
        &self,
        secret_id: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Move the current label to `version_id`, taking it off `previous`.
    fn promote(
        &self,
        secret_id: &str,
        version_id: &str,
        previous: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Issues and checks FotMob request credentials.
pub trait TokenService {
    fn issue(&self) -> impl Future<Output = Result<String>> + Send;

    /// `Ok(false)` when no validation endpoint is configured.
    fn validate(
        &self,
        headers: &HashMap<String, String>,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Run a single rotation step.
#[instrument(
    level = "info",
    skip(store, tokens),
    fields(step = ?event.step, secret_id = %event.secret_id)
)]
pub async fn rotate<S, T>(event: &RotationEvent, store: &S, tokens: &T) -> Result<()>
where
    S: SecretVersionStore,
    T: TokenService,
{
    info!("Handling secret rotation step");
    match event.step {
        RotationStep::CreateSecret => create_secret(event, store, tokens).await,
        RotationStep::SetSecret => {
            // The token lives only in Secrets Manager; nothing downstream needs staging.
            info!("Nothing to set");
            Ok(())
        }
        RotationStep::TestSecret => test_secret(event, store, tokens).await,
        RotationStep::FinishSecret => finish_secret(event, store).await,
    }
}

async fn create_secret<S, T>(event: &RotationEvent, store: &S, tokens: &T) -> Result<()>
where
    S: SecretVersionStore,
    T: TokenService,
{
    let token = tokens.issue().await?;
    store.put_pending(&event.secret_id, &event.client_request_token, &token).await?;
    info!("Created pending secret version");
    Ok(())
}

async fn test_secret<S, T>(event: &RotationEvent, store: &S, tokens: &T) -> Result<()>
where
    S: SecretVersionStore,
    T: TokenService,
{
    let pending = store
        .pending_value(&event.secret_id)
        .await?
        .ok_or_else(|| Error::Rotation("pending secret has no value".to_string()))?;
    let headers: HashMap<String, String> = serde_json::from_str(&pending)
        .map_err(|_| Error::Rotation("pending secret is not valid JSON".to_string()))?;

    if tokens.validate(&headers).await? {
        info!("Pending token passed validation");
    } else {
        warn!("No validation endpoint configured; pending token not tested");
    }
    Ok(())
}

async fn finish_secret<S: SecretVersionStore>(event: &RotationEvent, store: &S) -> Result<()> {
    let current = store.current_version(&event.secret_id).await?;
    if current.as_deref() == Some(event.client_request_token.as_str()) {
        info!("Version already current");
        return Ok(());
    }
    store
        .promote(&event.secret_id, &event.client_request_token, current.as_deref())
        .await?;
    info!(previous = ?current, "Promoted pending version to current");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl SecretVersionStore for SecretsManagerStore {
    async fn put_pending(&self, secret_id: &str, version_id: &str, value: &str) -> Result<()> {
        self.client
            .put_secret_value()
            .secret_id(secret_id)
            .client_request_token(version_id)
            .secret_string(value)
            .version_stages(PENDING_STAGE)
            .send()
            .await
            .map_err(aws_sdk_secretsmanager::Error::from)?;
        Ok(())
    }

    async fn pending_value(&self, secret_id: &str) -> Result<Option<String>> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .version_stage(PENDING_STAGE)
            .send()
            .await
            .map_err(aws_sdk_secretsmanager::Error::from)?;
        Ok(output.secret_string().map(str::to_string))
    }

    async fn current_version(&self, secret_id: &str) -> Result<Option<String>> {
        let output = self
            .client
            .describe_secret()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(aws_sdk_secretsmanager::Error::from)?;
        let stages = output
            .version_ids_to_stages()
            .ok_or_else(|| Error::Rotation(format!("secret {} has no versions", secret_id)))?;
        Ok(stages
            .iter()
            .find(|(_, labels)| labels.iter().any(|l| l == CURRENT_STAGE))
            .map(|(version, _)| version.clone()))
    }

    async fn promote(
        &self,
        secret_id: &str,
        version_id: &str,
        previous: Option<&str>,
    ) -> Result<()> {
        self.client
            .update_secret_version_stage()
            .secret_id(secret_id)
            .version_stage(CURRENT_STAGE)
            .move_to_version_id(version_id)
            .set_remove_from_version_id(previous.map(str::to_string))
            .send()
            .await
            .map_err(aws_sdk_secretsmanager::Error::from)?;
        Ok(())
    }
}

/// Token issuing and validation endpoints reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTokenService {
    token_url: String,
    test_url: Option<String>,
}

impl HttpTokenService {
    pub fn new(token_url: impl Into<String>, test_url: Option<String>) -> Self {
        Self { token_url: token_url.into(), test_url }
    }

    fn fetch_token(&self) -> Result<String> {
        let started = std::time::Instant::now();
        let token = ureq::get(&self.token_url).call()?.into_body().read_to_string()?;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "Fetched new token");
        Ok(token)
    }

    fn check_headers(&self, headers: &HashMap<String, String>) -> Result<bool> {
        let Some(url) = &self.test_url else {
            return Ok(false);
        };
        let mut request = ureq::get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        // Any non-2xx comes back as an error
        request
            .call()
            .map_err(|e| Error::Rotation(format!("token is not valid: {}", e)))?;
        Ok(true)
    }
}

impl TokenService for HttpTokenService {
    async fn issue(&self) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.fetch_token()).await?
    }

    async fn validate(&self, headers: &HashMap<String, String>) -> Result<bool> {
        let service = self.clone();
        let headers = headers.clone();
        tokio::task::spawn_blocking(move || service.check_headers(&headers)).await?
    }
}

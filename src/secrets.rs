use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info_span, instrument};

use crate::error::{Error, Result};
use crate::settings::ExtensionSettings;

const TOKEN_HEADER: &str = "X-Aws-Parameters-Secrets-Token";

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecretValue {
    secret_string: Option<String>,
}

/// Reads JSON secrets through the Lambda Parameters and Secrets extension,
/// which caches them locally.
#[derive(Debug, Clone)]
pub struct ExtensionSecrets {
    port: u16,
    session_token: SecretString,
}

impl ExtensionSecrets {
    pub fn new(settings: &ExtensionSettings) -> Self {
        Self {
            port: settings.parameters_secrets_extension_http_port,
            session_token: settings.aws_session_token.clone(),
        }
    }

    /// Fetch a secret whose value is a JSON document and decode it.
    #[instrument(level = "info", skip(self))]
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let url = format!("http://localhost:{}/secretsmanager/get", self.port);
        let response = {
            let _span = info_span!("secret_fetch", secret = %name).entered();
            ureq::get(&url)
                .query("secretId", name)
                .header(TOKEN_HEADER, self.session_token.expose_secret())
                .call()?
        };
        let value = response.into_body().read_json::<SecretValue>()?;
        let secret_string = value
            .secret_string
            .ok_or_else(|| Error::secret(name, "no SecretString in response"))?;
        serde_json::from_str(&secret_string)
            .map_err(|e| Error::secret(name, format!("not valid JSON: {}", e)))
    }

    /// Async wrapper around [`ExtensionSecrets::get_json`].
    pub async fn fetch<T: DeserializeOwned + Send + 'static>(&self, name: &str) -> Result<T> {
        let secrets = self.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || secrets.get_json::<T>(&name)).await?
    }
}

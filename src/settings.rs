use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

const DEFAULT_TEAM_ID: i64 = 8559;
const DEFAULT_LEAGUE_ID: i64 = 108;
const DEFAULT_EXTENSION_PORT: u16 = 2773;
const DEFAULT_MASTODON_INSTANCE: &str = "https://mastodon.social";
const DEFAULT_MASTODON_ACCOUNT: &str = "113873729220290769";
const DEFAULT_MISTRAL_MODEL: &str = "mistral-small-latest";

/// Load a settings struct from the process environment.
///
/// Environment keys are lowercased, so `TABLE_NAME` populates a `table_name` field.
pub fn from_env<T: DeserializeOwned>() -> Result<T> {
    let settings = config::Config::builder()
        .add_source(config::Environment::default())
        .build()?
        .try_deserialize::<T>()?;
    Ok(settings)
}

/// Settings for the daily fixture check.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCronSettings {
    pub table_name: String,
    pub schedule_group_name: String,
    pub scheduler_role_arn: String,
    pub lineup_checker_arn: String,
    pub ai_lineup_checker_arn: String,
    #[serde(default = "default_team_id")]
    pub team_id: i64,
    #[serde(default = "default_league_id")]
    pub league_id: i64,
}

/// Settings for the deterministic lineup check.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckLineupSettings {
    pub table_name: String,
    pub event_bus_arn: String,
    /// When set, FotMob requests carry the rotated header bundle stored under this name
    /// instead of a freshly signed token.
    #[serde(default)]
    pub fotmob_token_secret_name: Option<String>,
}

/// Settings for the image based lineup check.
#[derive(Debug, Clone, Deserialize)]
pub struct AiCheckLineupSettings {
    pub table_name: String,
    pub event_bus_arn: String,
    pub shared_secrets: String,
    #[serde(default = "default_mastodon_instance")]
    pub mastodon_instance_url: String,
    #[serde(default = "default_mastodon_account")]
    pub mastodon_account_id: String,
    #[serde(default = "default_mistral_model")]
    pub mistral_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MakeCallSettings {
    pub twilio_secret_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotationSettings {
    pub fotmob_token_url: String,
    #[serde(default)]
    pub fotmob_test_url: Option<String>,
}

/// Connection details for the Lambda Parameters and Secrets extension.
///
/// Loaded on its own by every handler that reads secrets at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionSettings {
    pub aws_session_token: SecretString,
    #[serde(default = "default_extension_port")]
    pub parameters_secrets_extension_http_port: u16,
}

fn default_team_id() -> i64 {
    DEFAULT_TEAM_ID
}

fn default_league_id() -> i64 {
    DEFAULT_LEAGUE_ID
}

fn default_extension_port() -> u16 {
    DEFAULT_EXTENSION_PORT
}

fn default_mastodon_instance() -> String {
    DEFAULT_MASTODON_INSTANCE.to_string()
}

fn default_mastodon_account() -> String {
    DEFAULT_MASTODON_ACCOUNT.to_string()
}

fn default_mistral_model() -> String {
    DEFAULT_MISTRAL_MODEL.to_string()
}

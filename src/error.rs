/// Result type used throughout the lineup bot.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can fail while scheduling, resolving or announcing a lineup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("http request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dynamodb request failed: {0}")]
    DynamoDb(#[from] aws_sdk_dynamodb::Error),

    #[error("eventbridge request failed: {0}")]
    EventBridge(#[from] aws_sdk_eventbridge::Error),

    #[error("scheduler request failed: {0}")]
    Scheduler(#[from] aws_sdk_scheduler::Error),

    #[error("secrets manager request failed: {0}")]
    SecretsManager(#[from] aws_sdk_secretsmanager::Error),

    #[error("could not build aws request: {0}")]
    Build(#[from] aws_sdk_scheduler::error::BuildError),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The FotMob homepage no longer exposes the version used for request signing.
    #[error("could not scrape signing version: {0}")]
    SigningVersion(String),

    #[error("secret {name} is unusable: {message}")]
    Secret { name: String, message: String },

    #[error("event was not published: {0}")]
    Publish(String),

    #[error("fixture record {match_id} is malformed: {message}")]
    MalformedRecord { match_id: i64, message: String },

    #[error("rotation failed: {0}")]
    Rotation(String),

    #[error("unexpected event: {0}")]
    UnexpectedEvent(String),
}

impl Error {
    pub fn secret(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Secret { name: name.into(), message: message.into() }
    }

    pub fn malformed_record(match_id: i64, message: impl Into<String>) -> Self {
        Self::MalformedRecord { match_id, message: message.into() }
    }
}

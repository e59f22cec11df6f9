use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};

use crate::error::Result;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends a text message to one phone number.
pub trait SmsSender {
    fn send(&self, to: &str, body: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Twilio REST client sending from a fixed number.
#[derive(Debug, Clone)]
pub struct Twilio {
    account_sid: String,
    auth_token: SecretString,
    from: String,
}

impl Twilio {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: SecretString,
        from: impl Into<String>,
    ) -> Self {
        Self { account_sid: account_sid.into(), auth_token, from: from.into() }
    }

    /// Create a message resource. Twilio queues it and delivers asynchronously.
    pub fn post_message(&self, to: &str, body: &str) -> Result<()> {
        let url = format!("{}/Accounts/{}/Messages.json", API_BASE, self.account_sid);
        let credentials =
            BASE64.encode(format!("{}:{}", self.account_sid, self.auth_token.expose_secret()));
        let result = ureq::post(&url)
            .header("Authorization", &format!("Basic {}", credentials))
            .send_form([("To", to), ("From", self.from.as_str()), ("Body", body)]);
        match result {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), to = %to, "Queued SMS with Twilio");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, to = %to, "Failed to queue SMS with Twilio");
                Err(e.into())
            }
        }
    }
}

impl SmsSender for Twilio {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        let client = self.clone();
        let to = to.to_string();
        let body = body.to_string();
        tokio::task::spawn_blocking(move || client.post_message(&to, &body)).await?
    }
}

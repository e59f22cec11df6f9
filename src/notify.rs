use futures::future::try_join_all;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::model::fixture::LineupSet;
use crate::twilio::{SmsSender, Twilio};

/// Messaging credentials and recipients, as stored in Secrets Manager.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioSecret {
    #[serde(rename = "TWILIO_ACCOUNT_SID")]
    pub account_sid: String,
    #[serde(rename = "TWILIO_AUTH_TOKEN")]
    pub auth_token: SecretString,
    #[serde(rename = "PHONE_FROM")]
    pub phone_from: String,
    #[serde(rename = "PHONE_TO")]
    pub phone_to: Recipients,
}

impl TwilioSecret {
    pub fn client(&self) -> Twilio {
        Twilio::new(self.account_sid.clone(), self.auth_token.clone(), self.phone_from.clone())
    }

    /// Destination numbers. A bundle without any is misconfigured.
    pub fn recipients(&self, secret_name: &str) -> Result<Vec<String>> {
        let numbers = self.phone_to.numbers();
        if numbers.is_empty() {
            return Err(Error::secret(secret_name, "PHONE_TO has no numbers"));
        }
        Ok(numbers)
    }
}

/// One number, a comma separated list, or a JSON array of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    pub fn numbers(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Recipients::One(numbers) => numbers.split(',').collect(),
            Recipients::Many(numbers) => numbers.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Plain text body: starters, a gap, then the bench, one name per line.
pub fn format_message(event: &LineupSet) -> String {
    let mut body = String::from("Starters:\n");
    for name in &event.starters {
        body.push_str(name);
        body.push('\n');
    }
    body.push_str("\n\n");
    body.push_str("Bench:\n");
    for name in &event.bench {
        body.push_str(name);
        body.push('\n');
    }
    body
}

/// Text the lineup to every recipient at once.
///
/// Fails if any send fails; messages already accepted for other recipients stay sent.
#[instrument(
    level = "info",
    skip(sender, recipients, event),
    fields(match_id = event.match_id, recipients = recipients.len())
)]
pub async fn dispatch<S: SmsSender>(
    sender: &S,
    recipients: &[String],
    event: &LineupSet,
) -> Result<usize> {
    let body = format_message(event);
    try_join_all(recipients.iter().map(|to| sender.send(to, &body))).await?;
    info!("Sent lineup SMS to all recipients");
    Ok(recipients.len())
}

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info_span};

use crate::error::Result;

const CHAT_COMPLETIONS_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// A language model that can look at an image.
pub trait VisionModel {
    /// Ask `prompt` about the image at `image_url`.
    /// Returns `None` when the model gave no usable text answer.
    fn complete(
        &self,
        image_url: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    // Either a string or a list of content chunks
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct MistralClient {
    api_key: SecretString,
    model: String,
}

impl MistralClient {
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self { api_key, model: model.into() }
    }

    pub fn chat(&self, image_url: &str, prompt: &str) -> Result<Option<String>> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": image_url },
                ],
            }],
            "response_format": { "type": "json_object" },
        });

        let response = {
            let _span = info_span!("mistral_chat", model = %self.model).entered();
            ureq::post(CHAT_COMPLETIONS_URL)
                .header("Authorization", &format!("Bearer {}", self.api_key.expose_secret()))
                .send_json(request)?
        };
        let chat = response.into_body().read_json::<ChatResponse>()?;

        let Some(choice) = chat.choices.into_iter().next() else {
            debug!("Mistral returned no choices");
            return Ok(None);
        };
        match choice.message.content {
            serde_json::Value::String(text) => Ok(Some(text)),
            other => {
                debug!(content = %other, "Mistral returned non-text content");
                Ok(None)
            }
        }
    }
}

impl VisionModel for MistralClient {
    async fn complete(&self, image_url: &str, prompt: &str) -> Result<Option<String>> {
        let client = self.clone();
        let image_url = image_url.to_string();
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || client.chat(&image_url, &prompt)).await?
    }
}

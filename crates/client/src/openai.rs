//! Direct chat-completions client for slide rewrites.

use crate::backend::transport_error;
use crate::config::{ClientConfig, OPENAI_CHAT_URL};
use crate::{EnhanceRequest, Enhancer};
use async_trait::async_trait;
use deck_core::enhance::{build_prompt, SYSTEM_PROMPT};
use deck_core::{EnhanceSettings, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Rewrites slides by calling the chat completions API directly.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    settings: EnhanceSettings,
    endpoint: String,
    http: Client,
}

impl OpenAiClient {
    pub fn new(settings: EnhanceSettings, config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::RemoteCallFailure(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            settings,
            endpoint: OPENAI_CHAT_URL.to_string(),
            http,
        })
    }

    /// Send requests somewhere other than the public endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send one prompt and return the trimmed reply.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        if !self.settings.has_api_key() {
            return Err(Error::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("OpenAI", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(Error::RemoteCallFailure(format!(
                    "OpenAI API error: {}",
                    api_error.error.message
                )));
            }
            return Err(Error::RemoteCallFailure(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteCallFailure(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| Error::RemoteCallFailure("OpenAI response had no content".to_string()))
    }
}

#[async_trait]
impl Enhancer for OpenAiClient {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<String> {
        request.options.validate()?;
        let prompt = build_prompt(
            request.kind,
            &request.content,
            &request.options,
            &self.settings.default_prompt,
        );
        log::debug!("Requesting {} rewrite from {}", request.kind, self.settings.model);
        self.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::serve_once;
    use deck_core::{EnhancementOptions, EnhancementType};

    fn settings(key: &str) -> EnhanceSettings {
        EnhanceSettings {
            api_key: key.to_string(),
            model: "gpt-4o-mini".to_string(),
            default_prompt: "Keep the title.".to_string(),
        }
    }

    fn request() -> EnhanceRequest {
        EnhanceRequest::new(0, "Title: Demo\nBody", EnhancementType::Academic)
            .with_options(EnhancementOptions::default().with_tone_level(3))
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = OpenAiClient::new(settings(""), &ClientConfig::default()).unwrap();
        let err = client.enhance(&request()).await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[tokio::test]
    async fn test_enhance_sends_prompt_and_reads_reply() {
        let reply = r#"{"choices":[{"message":{"role":"assistant","content":"  Rewritten slide \n"}}]}"#;
        let (url, server) = serve_once(200, reply).await;

        let client = OpenAiClient::new(settings("sk-test"), &ClientConfig::default())
            .unwrap()
            .with_endpoint(format!("{}/v1/chat/completions", url));
        let result = client.enhance(&request()).await.unwrap();
        assert_eq!(result, "Rewritten slide");

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /v1/chat/completions "));
        assert!(captured
            .head
            .to_lowercase()
            .contains("authorization: bearer sk-test"));

        let body = captured.body_json();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "system");
        let prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("academic style"));
        assert!(prompt.contains("3/10"));
        assert!(prompt.contains("Keep the title."));
        assert!(prompt.ends_with("Slide content:\nTitle: Demo\nBody\n\nEnhanced version:"));
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let (url, _server) =
            serve_once(401, r#"{"error":{"message":"Incorrect API key provided"}}"#).await;
        let client = OpenAiClient::new(settings("sk-bad"), &ClientConfig::default())
            .unwrap()
            .with_endpoint(url);
        let err = client.complete("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API error: Incorrect API key provided");
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let (url, _server) = serve_once(200, r#"{"choices":[]}"#).await;
        let client = OpenAiClient::new(settings("sk-test"), &ClientConfig::default())
            .unwrap()
            .with_endpoint(url);
        assert!(client.complete("hi").await.is_err());
    }
}

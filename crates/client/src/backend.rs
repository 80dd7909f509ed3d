//! Client for the companion backend (`/health`, `/upload-ppt`, `/enhance-slide`).

use crate::config::ClientConfig;
use crate::{EnhanceRequest, Enhancer};
use async_trait::async_trait;
use deck_core::{EnhanceSettings, EnhancementOptions, EnhancementType, Error, Presentation, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options block of an `/enhance-slide` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOptions<'a> {
    custom_instructions: &'a str,
    tone_level: u8,
    target_audience: &'a str,
    api_key: &'a str,
    model: &'a str,
    default_prompt: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct EnhanceSlideBody<'a> {
    slide_index: usize,
    enhancement_type: EnhancementType,
    options: WireOptions<'a>,
}

#[derive(Debug, Deserialize)]
struct EnhanceSlideResponse {
    enhanced_content: String,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Result of `/upload-ppt`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// One entry per slide; may be empty for slides without text.
    pub slides: Vec<String>,
    #[serde(default)]
    pub presentation_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl UploadResponse {
    /// Build a local presentation from the uploaded slide texts.
    pub fn into_presentation(self, name: impl Into<String>) -> Presentation {
        let mut presentation = Presentation::new(name);
        for (idx, text) in self.slides.into_iter().enumerate() {
            presentation.push_slide(format!("Slide {}", idx + 1), text);
        }
        presentation
    }
}

/// HTTP client for the companion backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: ClientConfig,
    http: Client,
    settings: EnhanceSettings,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::RemoteCallFailure(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http,
            settings: EnhanceSettings::default(),
        })
    }

    /// Provider settings forwarded with enhancement requests.
    pub fn with_settings(mut self, settings: EnhanceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether the backend answers `/health` with a 2xx in time.
    pub async fn health(&self) -> bool {
        let result = self
            .http
            .get(self.config.endpoint("health"))
            .timeout(self.config.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Upload a file for server-side extraction.
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<UploadResponse> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.upload_bytes(bytes, file_name).await
    }

    /// Upload already read file bytes as the multipart field `file`.
    pub async fn upload_bytes(&self, bytes: Vec<u8>, file_name: String) -> Result<UploadResponse> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.config.endpoint("upload-ppt"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("Upload", e))?;

        let response = check_status(response, "Error uploading file").await?;
        response
            .json()
            .await
            .map_err(|e| Error::RemoteCallFailure(format!("Failed to parse upload response: {}", e)))
    }

    /// Ask the backend to rewrite one of its stored slides.
    pub async fn enhance_slide(
        &self,
        slide_index: usize,
        kind: EnhancementType,
        options: &EnhancementOptions,
    ) -> Result<String> {
        options.validate()?;

        let body = EnhanceSlideBody {
            slide_index,
            enhancement_type: kind,
            options: WireOptions {
                custom_instructions: &options.custom_instructions,
                tone_level: options.tone_level,
                target_audience: &options.target_audience,
                api_key: &self.settings.api_key,
                model: &self.settings.model,
                default_prompt: &self.settings.default_prompt,
            },
        };

        let response = self
            .http
            .post(self.config.endpoint("enhance-slide"))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Enhancement", e))?;

        let response = check_status(response, "Error enhancing slide").await?;
        let parsed: EnhanceSlideResponse = response.json().await.map_err(|e| {
            Error::RemoteCallFailure(format!("Failed to parse enhancement response: {}", e))
        })?;

        Ok(parsed.enhanced_content)
    }
}

#[async_trait]
impl Enhancer for BackendClient {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<String> {
        self.enhance_slide(request.slide_index, request.kind, &request.options)
            .await
    }
}

/// Map a non-2xx response to an error carrying the server's `detail`.
async fn check_status(response: reqwest::Response, fallback: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty());

    log::warn!("Backend returned {}: {}", status, text);
    Err(Error::RemoteCallFailure(
        detail.unwrap_or_else(|| format!("{} ({})", fallback, status)),
    ))
}

pub(crate) fn transport_error(what: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::RemoteCallFailure(format!("{} request timed out", what))
    } else if err.is_connect() {
        Error::RemoteCallFailure(format!("{} failed: backend is not reachable", what))
    } else {
        Error::RemoteCallFailure(format!("{} request failed: {}", what, err))
    }
}

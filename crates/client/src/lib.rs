//! Remote collaborators for slide enhancement.
//!
//! [`BackendClient`] talks to the companion backend, [`OpenAiClient`] calls
//! the chat completions API directly and [`Simulator`] answers offline. All
//! three implement [`Enhancer`]. Every request is bounded by a client-side
//! timeout and never retried.

pub mod backend;
pub mod config;
pub mod health;
pub mod openai;

#[cfg(test)]
mod stub;

pub use backend::{BackendClient, UploadResponse};
pub use config::ClientConfig;
pub use health::HealthMonitor;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use deck_core::{EnhancementOptions, EnhancementType, Result};

/// One slide rewrite request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceRequest {
    /// 0-based slide position, used by the backend to find its copy.
    pub slide_index: usize,
    /// Current slide text, used by providers that receive the content.
    pub content: String,
    pub kind: EnhancementType,
    pub options: EnhancementOptions,
}

impl EnhanceRequest {
    pub fn new(slide_index: usize, content: impl Into<String>, kind: EnhancementType) -> Self {
        Self {
            slide_index,
            content: content.into(),
            kind,
            options: EnhancementOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EnhancementOptions) -> Self {
        self.options = options;
        self
    }
}

/// Something that can rewrite slide text.
#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<String>;
}

/// Offline enhancer that annotates the content instead of rewriting it.
#[derive(Debug, Clone, Default)]
pub struct Simulator;

#[async_trait]
impl Enhancer for Simulator {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<String> {
        request.options.validate()?;
        Ok(deck_core::enhance::simulate(request.kind, &request.content))
    }
}

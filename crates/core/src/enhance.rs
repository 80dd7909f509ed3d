//! Enhancement requests: kinds, options, settings and prompt construction.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Tone level used when none is given.
pub const DEFAULT_TONE_LEVEL: u8 = 5;

/// System message sent with every chat completion.
pub const SYSTEM_PROMPT: &str = "You are an expert presentation writer and editor. \
Your task is to enhance presentation slide content based on specific requirements.";

/// The style of rewrite to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementType {
    Simplify,
    Storytelling,
    Professional,
    Accessible,
    Engaging,
    Concise,
    Elaborate,
    Academic,
    Creative,
}

impl EnhancementType {
    pub const ALL: [EnhancementType; 9] = [
        Self::Simplify,
        Self::Storytelling,
        Self::Professional,
        Self::Accessible,
        Self::Engaging,
        Self::Concise,
        Self::Elaborate,
        Self::Academic,
        Self::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simplify => "simplify",
            Self::Storytelling => "storytelling",
            Self::Professional => "professional",
            Self::Accessible => "accessible",
            Self::Engaging => "engaging",
            Self::Concise => "concise",
            Self::Elaborate => "elaborate",
            Self::Academic => "academic",
            Self::Creative => "creative",
        }
    }

    /// Clause appended to the base instruction.
    fn instruction(&self) -> &'static str {
        match self {
            Self::Simplify => "by simplifying the language and making it easier to understand",
            Self::Storytelling => "by adding storytelling elements and narrative structure",
            Self::Professional => "by making it more professional and business-appropriate",
            Self::Accessible => "by improving accessibility and inclusivity",
            Self::Engaging => "by making it more engaging and captivating for the audience",
            Self::Concise => "by making it more concise and focused on key points",
            Self::Elaborate => "by elaborating on the content with more details and explanation",
            Self::Academic => {
                "by giving it an academic style appropriate for research or educational settings"
            }
            Self::Creative => "by adding creative elements and unique perspectives",
        }
    }

    /// Placeholder note appended by the offline simulator.
    fn simulated_note(&self) -> &'static str {
        match self {
            Self::Simplify => "Simplified version would appear here with easier language and clearer explanations",
            Self::Storytelling => "Storytelling version would include a narrative arc, characters, and emotional elements",
            Self::Professional => "Professional version would use business terminology, formal language, and structured points",
            Self::Accessible => "Accessible version would use inclusive language, clear structure, and avoid jargon",
            Self::Engaging => "Engaging version would include questions, interactive elements, and captivating language",
            Self::Concise => "Concise version would eliminate redundancy and focus on key messages",
            Self::Elaborate => "Elaborate version would add details, examples, and expanded explanations",
            Self::Academic => "Academic version would include citations, technical language, and research-based structure",
            Self::Creative => "Creative version would incorporate metaphors, unique perspectives, and innovative presentation styles",
        }
    }
}

impl fmt::Display for EnhancementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnhancementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| Error::InvalidOption(format!("unknown enhancement type '{}'", s)))
    }
}

/// Per-request tuning supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementOptions {
    /// Free-form extra instructions.
    pub custom_instructions: String,
    /// Tone intensity, 1 to 10.
    pub tone_level: u8,
    /// Who the slide is for.
    pub target_audience: String,
}

impl Default for EnhancementOptions {
    fn default() -> Self {
        Self {
            custom_instructions: String::new(),
            tone_level: DEFAULT_TONE_LEVEL,
            target_audience: String::new(),
        }
    }
}

impl EnhancementOptions {
    pub fn with_tone_level(mut self, level: u8) -> Self {
        self.tone_level = level;
        self
    }

    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = instructions.into();
        self
    }

    /// Reject tone levels outside 1..=10.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.tone_level) {
            return Err(Error::InvalidOption(format!(
                "tone level must be between 1 and 10, got {}",
                self.tone_level
            )));
        }
        Ok(())
    }
}

/// Provider credentials and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceSettings {
    pub api_key: String,
    pub model: String,
    /// Appended to every prompt when non-empty.
    pub default_prompt: String,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            default_prompt: String::new(),
        }
    }
}

impl EnhanceSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Build the user prompt for a rewrite request.
pub fn build_prompt(
    kind: EnhancementType,
    content: &str,
    options: &EnhancementOptions,
    default_prompt: &str,
) -> String {
    let mut prompt = format!(
        "Enhance the following presentation slide content {}",
        kind.instruction()
    );

    if !options.target_audience.is_empty() {
        prompt.push_str(&format!(". The target audience is: {}", options.target_audience));
    }

    prompt.push_str(&format!(
        ". Use a tone intensity of {}/10 (where 10 is the strongest).",
        options.tone_level
    ));

    if !options.custom_instructions.is_empty() {
        prompt.push_str(&format!(" Additional instructions: {}", options.custom_instructions));
    }

    if !default_prompt.is_empty() {
        prompt.push(' ');
        prompt.push_str(default_prompt);
    }

    prompt.push_str("\n\nSlide content:\n");
    prompt.push_str(content);
    prompt.push_str("\n\nEnhanced version:");

    prompt
}

/// Offline stand-in for a provider response.
pub fn simulate(kind: EnhancementType, content: &str) -> String {
    format!("{}\n\n[{}]", content, kind.simulated_note())
}

//! # Schemas Module
//!
//! OpenAI-compatible chat completion structures with multimodal content
//! support. Requests carry an ordered list of content parts (prompt text
//! followed by one inline base64 image per frame), which is the wire
//! format vLLM expects for image and video-frame understanding.

use serde::{Deserialize, Serialize};

/// # Chat Completion Request
///
/// The request body sent to `/v1/chat/completions`. Only the fields the
/// load driver actually populates are modeled; the pool serializes each
/// request exactly once during preload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier, e.g. "Qwen2.5-VL"
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// A single chat message. Content is either plain text or an ordered
/// list of multimodal parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

/// Message content: a bare string or multimodal parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// # Content Part
///
/// One element of a multimodal message. Serializes to the OpenAI
/// tagged form: `{"type": "text", ...}` or `{"type": "image_url", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// Text part from a prompt string.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Image part from an already-encoded data URI.
    pub fn image_data_uri(uri: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: uri.into() },
        }
    }
}

/// Inline image reference, a `data:image/...;base64,` URI here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// # Chat Completion Response
///
/// Lenient response model: the driver only reads it to log token usage,
/// so every field a backend might omit is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

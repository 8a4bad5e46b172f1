use serde::{Deserialize, Serialize};

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_speed() -> f64 {
    1.0
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_duration() -> u32 {
    5
}

fn default_fps() -> u32 {
    24
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Display name of the model, or an already provider-qualified id.
    pub model: String,
    /// Explicit provider-qualified id, bypasses or narrows catalog lookup.
    #[serde(default)]
    pub provider_id: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Inline credential, overrides the stored one.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
    pub usage: Usage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    /// Explicit WxH size; wins over `aspect_ratio` when both are set.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReply {
    pub success: bool,
    pub image_url: String,
    pub model: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioRequest {
    pub model: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    /// Text to synthesize.
    pub input: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_audio_format")]
    pub response_format: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioReply {
    pub success: bool,
    pub audio_url: String,
    pub model: String,
    pub voice: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub model: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Seconds.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoReply {
    pub success: bool,
    pub video_url: String,
    pub model: String,
    pub prompt: String,
    pub resolution: String,
    pub duration: u32,
    pub fps: u32,
}

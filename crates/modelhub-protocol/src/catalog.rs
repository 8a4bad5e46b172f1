use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Subscription tier of the upstream aggregator. Gates which models the
/// catalog endpoint lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Basic,
    Pro,
}

impl Tier {
    /// Scan order used everywhere a tier sweep happens.
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Basic, Tier::Pro];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Basic => "basic",
            Tier::Pro => "pro",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free" => Some(Tier::Free),
            "basic" => Some(Tier::Basic),
            "pro" => Some(Tier::Pro),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a model descriptor lands in after modality inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Audio,
    Video,
    Other,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
            Modality::Audio => "audio",
            Modality::Video => "video",
            Modality::Other => "other",
        }
    }
}

/// Model descriptors grouped per modality. Descriptors stay raw JSON; the
/// upstream owns their schema and we only ever read `name`, `type` and
/// `proxy_providers` out of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorizedModels {
    pub text: Vec<JsonValue>,
    pub image: Vec<JsonValue>,
    pub audio: Vec<JsonValue>,
    pub video: Vec<JsonValue>,
    pub other: Vec<JsonValue>,
}

impl CategorizedModels {
    pub fn push(&mut self, modality: Modality, model: JsonValue) {
        match modality {
            Modality::Text => self.text.push(model),
            Modality::Image => self.image.push(model),
            Modality::Audio => self.audio.push(model),
            Modality::Video => self.video.push(model),
            Modality::Other => self.other.push(model),
        }
    }
}

/// Cross-tier aggregation returned by `GET /api/models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedCatalog {
    pub total_models: usize,
    pub models: Vec<JsonValue>,
    pub categorized: CategorizedModels,
}

use serde_json::Value as JsonValue;

use modelhub_protocol::Modality;

/// Infer the modality of a catalog model descriptor from its `type` and
/// `name` fields. First match wins; substring tests are case-insensitive.
pub fn categorize_model(model: &JsonValue) -> Modality {
    let model_type = lower(model, "type");
    let model_name = lower(model, "name");

    if contains_any(&model_type, &["chat", "completion", "text"]) {
        Modality::Text
    } else if contains_any(&model_type, &["image", "vision"])
        || contains_any(&model_name, &["dall", "imagen"])
    {
        Modality::Image
    } else if contains_any(&model_type, &["audio", "speech"]) || model_name.contains("whisper") {
        Modality::Audio
    } else if model_type.contains("video") || model_name.contains("sora") {
        Modality::Video
    } else {
        Modality::Other
    }
}

fn lower(model: &JsonValue, key: &str) -> String {
    model
        .get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

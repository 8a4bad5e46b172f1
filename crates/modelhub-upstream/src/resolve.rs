use serde_json::Value as JsonValue;
use tracing::warn;

use modelhub_protocol::Tier;

use crate::client::Upstream;

/// Provider-qualified ids look like `provider-3/gpt-4o`.
pub const PROVIDER_SEPARATOR: char = '/';

impl Upstream {
    /// Turn a display name into a provider-qualified model id by scanning
    /// the tier catalogs. Degrades to the input name on any failure: the
    /// upstream may still accept it, or will report "not found" itself.
    pub async fn resolve_model_id(&self, name: &str, explicit: Option<&str>) -> String {
        if let Some(explicit) = explicit
            && explicit.contains(PROVIDER_SEPARATOR)
        {
            return explicit.to_string();
        }

        for tier in Tier::ALL {
            let body = match self.fetch_tier(tier).await {
                Ok(body) => body,
                Err(err) => {
                    warn!(event = "resolve_tier_skipped", tier = %tier, error = %err, "continuing scan");
                    continue;
                }
            };
            let Some(models) = body.get("models").and_then(JsonValue::as_array) else {
                continue;
            };
            for model in models {
                if model.get("name").and_then(JsonValue::as_str) != Some(name) {
                    continue;
                }
                let ids: Vec<&str> = model
                    .get("proxy_providers")
                    .and_then(JsonValue::as_array)
                    .map(|providers| {
                        providers
                            .iter()
                            .filter_map(|p| p.get("id").and_then(JsonValue::as_str))
                            .collect()
                    })
                    .unwrap_or_default();
                if ids.is_empty() {
                    // Listed but unroutable; keep scanning.
                    continue;
                }
                if let Some(explicit) = explicit
                    && let Some(id) = ids.iter().find(|id| provider_matches(id, explicit))
                {
                    return (*id).to_string();
                }
                return ids[0].to_string();
            }
        }

        name.to_string()
    }
}

/// `provider-1` must not claim `provider-10/gpt-4o`; the match is either
/// exact or ends at the separator.
fn provider_matches(id: &str, explicit: &str) -> bool {
    id == explicit
        || id
            .strip_prefix(explicit)
            .is_some_and(|rest| rest.starts_with(PROVIDER_SEPARATOR))
}

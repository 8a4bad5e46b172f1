use std::time::Duration;

use http::StatusCode;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use modelhub_classify::categorize_model;
use modelhub_protocol::{AggregatedCatalog, CategorizedModels, Tier};

use crate::client::{browser_headers, Upstream};
use crate::error::UpstreamError;

const CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

impl Upstream {
    /// Fetch the raw display-model listing for one tier. The body is passed
    /// through undecoded beyond JSON; its schema belongs to the upstream.
    pub async fn fetch_tier(&self, tier: Tier) -> Result<JsonValue, UpstreamError> {
        let url = format!(
            "{}/api/get-display-models?plan={}",
            self.catalog_base,
            tier.as_str()
        );
        info!(event = "catalog_request", tier = %tier, "fetching tier catalog");
        let response = self
            .client
            .get(&url)
            .headers(browser_headers())
            .timeout(CATALOG_TIMEOUT)
            .send()
            .await
            .map_err(UpstreamError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(event = "catalog_response", tier = %tier, status = status.as_u16(), "tier fetch failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(UpstreamError::Decode)
    }

    /// Sweep all tiers, tag each model with its originating tier, and bucket
    /// by inferred modality. A failing tier is skipped, not fatal.
    pub async fn fetch_all(&self) -> AggregatedCatalog {
        let mut models = Vec::new();
        for tier in Tier::ALL {
            let body = match self.fetch_tier(tier).await {
                Ok(body) => body,
                Err(err) => {
                    warn!(event = "catalog_tier_skipped", tier = %tier, error = %err, "continuing without tier");
                    continue;
                }
            };
            let Some(list) = body.get("models").and_then(JsonValue::as_array) else {
                continue;
            };
            for model in list {
                let mut model = model.clone();
                if let Some(object) = model.as_object_mut() {
                    object.insert(
                        "plan".to_string(),
                        JsonValue::String(tier.as_str().to_string()),
                    );
                }
                models.push(model);
            }
        }

        let mut categorized = CategorizedModels::default();
        for model in &models {
            categorized.push(categorize_model(model), model.clone());
        }

        AggregatedCatalog {
            total_models: models.len(),
            models,
            categorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tier_body(models: JsonValue) -> JsonValue {
        json!({ "models": models })
    }

    #[tokio::test]
    async fn fetch_tier_returns_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-display-models"))
            .and(query_param("plan", "free"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tier_body(json!([
                { "name": "GPT-4o", "type": "chat" }
            ]))))
            .mount(&server)
            .await;

        let upstream = Upstream::with_base_urls(server.uri(), server.uri());
        let body = upstream.fetch_tier(Tier::Free).await.unwrap();
        assert_eq!(body["models"][0]["name"], "GPT-4o");
    }

    #[tokio::test]
    async fn fetch_tier_surfaces_non_200_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-display-models"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let upstream = Upstream::with_base_urls(server.uri(), server.uri());
        match upstream.fetch_tier(Tier::Pro).await {
            Err(UpstreamError::Status { status }) => assert_eq!(status, 503),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_all_tags_tiers_and_skips_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-display-models"))
            .and(query_param("plan", "free"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tier_body(json!([
                { "name": "GPT-4o", "type": "chat-completion" },
                { "name": "DALL-E 3", "type": "generation" }
            ]))))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/get-display-models"))
            .and(query_param("plan", "basic"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/get-display-models"))
            .and(query_param("plan", "pro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tier_body(json!([
                { "name": "sora-hd", "type": "generation" }
            ]))))
            .mount(&server)
            .await;

        let upstream = Upstream::with_base_urls(server.uri(), server.uri());
        let catalog = upstream.fetch_all().await;

        assert_eq!(catalog.total_models, 3);
        assert_eq!(catalog.models[0]["plan"], "free");
        assert_eq!(catalog.models[2]["plan"], "pro");
        assert_eq!(catalog.categorized.text.len(), 1);
        assert_eq!(catalog.categorized.image.len(), 1);
        assert_eq!(catalog.categorized.video.len(), 1);
        assert!(catalog.categorized.audio.is_empty());
    }
}

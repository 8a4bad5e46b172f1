use std::time::{Duration, Instant};

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use modelhub_classify::{
    classify_error_body, image_size_for_ratio, parse_size, video_resolution_for_ratio,
};
use modelhub_protocol::{
    AudioReply, AudioRequest, ChatReply, ChatRequest, ClassifiedError, ErrorEnvelope, ImageReply,
    ImageRequest, Usage, VideoReply, VideoRequest,
};

use crate::client::Upstream;

const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);
const AUDIO_TIMEOUT: Duration = Duration::from_secs(60);
const VIDEO_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
const DEFAULT_VIDEO_RESOLUTION: &str = "1280x720";

impl Upstream {
    pub async fn chat(&self, request: &ChatRequest, api_key: &str) -> Result<ChatReply, ErrorEnvelope> {
        let model_id = self
            .resolve_model_id(&request.model, request.provider_id.as_deref())
            .await;

        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        for entry in &request.history {
            messages.push(json!({ "role": entry.role, "content": entry.content }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt }));

        let payload = json!({
            "model": model_id,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let body = self
            .post_generation("/v1/chat/completions", "chat", &payload, api_key, CHAT_TIMEOUT)
            .await?;

        let Some(content) = body
            .pointer("/choices/0/message/content")
            .and_then(JsonValue::as_str)
        else {
            return Err(ErrorEnvelope::local(ClassifiedError::no_response()));
        };

        let usage = body
            .get("usage")
            .and_then(|usage| serde_json::from_value::<Usage>(usage.clone()).ok())
            .unwrap_or_else(|| estimate_usage(&request.prompt));
        let finish_reason = body
            .pointer("/choices/0/finish_reason")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        Ok(ChatReply {
            response: content.to_string(),
            model: request.model.clone(),
            usage,
            finish_reason,
        })
    }

    pub async fn generate_image(
        &self,
        request: &ImageRequest,
        api_key: &str,
    ) -> Result<ImageReply, ErrorEnvelope> {
        let model_id = self
            .resolve_model_id(&request.model, request.provider_id.as_deref())
            .await;

        let mut prompt = request.prompt.clone();
        if let Some(style) = &request.style {
            prompt.push_str(&format!(", {style} style"));
        }
        if let Some(negative) = &request.negative_prompt {
            prompt.push_str(&format!(". Avoid: {negative}"));
        }

        let size = match (&request.size, &request.aspect_ratio) {
            (Some(size), _) => size.clone(),
            (None, Some(ratio)) => image_size_for_ratio(ratio, DEFAULT_IMAGE_SIZE).to_string(),
            (None, None) => DEFAULT_IMAGE_SIZE.to_string(),
        };

        let mut payload = json!({
            "model": model_id,
            "prompt": prompt,
            "n": 1,
            "size": size,
        });
        if is_diffusion_model(&model_id) {
            payload["guidance_scale"] = json!(7.5);
            payload["num_inference_steps"] = json!(30);
        }

        let body = self
            .post_generation(
                "/v1/images/generations",
                "image.generate",
                &payload,
                api_key,
                IMAGE_TIMEOUT,
            )
            .await?;

        let Some(url) = body.pointer("/data/0/url").and_then(JsonValue::as_str) else {
            return Err(ErrorEnvelope::local(ClassifiedError::no_image_generated()));
        };
        let (width, height) = parse_size(&size).unwrap_or((1024, 1024));

        Ok(ImageReply {
            success: true,
            image_url: url.to_string(),
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            width,
            height,
            size,
            aspect_ratio: request.aspect_ratio.clone(),
        })
    }

    pub async fn generate_audio(
        &self,
        request: &AudioRequest,
        api_key: &str,
    ) -> Result<AudioReply, ErrorEnvelope> {
        let model_id = self
            .resolve_model_id(&request.model, request.provider_id.as_deref())
            .await;

        let payload = json!({
            "model": model_id,
            "input": request.input,
            "voice": request.voice,
            "speed": request.speed,
            "response_format": request.response_format,
        });

        let body = self
            .post_generation("/v1/audio/speech", "audio.speech", &payload, api_key, AUDIO_TIMEOUT)
            .await?;

        let Some(url) = extract_media_url(&body, "audio_url") else {
            return Err(ErrorEnvelope::local(ClassifiedError::no_audio_generated()));
        };

        Ok(AudioReply {
            success: true,
            audio_url: url,
            model: request.model.clone(),
            voice: request.voice.clone(),
            format: request.response_format.clone(),
        })
    }

    pub async fn generate_video(
        &self,
        request: &VideoRequest,
        api_key: &str,
    ) -> Result<VideoReply, ErrorEnvelope> {
        let model_id = self
            .resolve_model_id(&request.model, request.provider_id.as_deref())
            .await;

        let resolution = match &request.aspect_ratio {
            Some(ratio) => video_resolution_for_ratio(ratio, DEFAULT_VIDEO_RESOLUTION).to_string(),
            None => DEFAULT_VIDEO_RESOLUTION.to_string(),
        };

        let mut payload = json!({
            "model": model_id,
            "prompt": request.prompt,
            "resolution": resolution,
            "duration": request.duration,
            "fps": request.fps,
        });
        if let Some(style) = &request.style {
            payload["style"] = json!(style);
        }

        let body = self
            .post_generation(
                "/v1/video/generations",
                "video.generate",
                &payload,
                api_key,
                VIDEO_TIMEOUT,
            )
            .await?;

        let Some(url) = extract_media_url(&body, "video_url") else {
            return Err(ErrorEnvelope::local(ClassifiedError::no_video_generated()));
        };

        Ok(VideoReply {
            success: true,
            video_url: url,
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            resolution,
            duration: request.duration,
            fps: request.fps,
        })
    }

    /// One attempt, bearer auth, bounded timeout. 200 decodes to JSON; any
    /// other status is read as text and classified; transport failures map
    /// to the network_error kind.
    async fn post_generation(
        &self,
        path: &str,
        op: &str,
        payload: &JsonValue,
        api_key: &str,
        timeout: Duration,
    ) -> Result<JsonValue, ErrorEnvelope> {
        let url = format!("{}{}", self.api_base, path);
        let started = Instant::now();
        info!(event = "upstream_request", op, path, "forwarding generation request");

        let response = match self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(event = "upstream_response", op, error = %err, "network failure");
                return Err(ErrorEnvelope::local(ClassifiedError::network_error()));
            }
        };

        let status = response.status();
        let latency_ms = started.elapsed().as_millis() as u64;
        if status != StatusCode::OK {
            let raw = response.text().await.unwrap_or_default();
            warn!(
                event = "upstream_response",
                op,
                status = status.as_u16(),
                latency_ms,
                "upstream rejected request"
            );
            return Err(ErrorEnvelope::upstream(
                classify_error_body(&raw),
                status.as_u16(),
            ));
        }

        info!(event = "upstream_response", op, status = status.as_u16(), latency_ms, "ok");
        match response.json::<JsonValue>().await {
            Ok(body) => Ok(body),
            Err(err) => {
                warn!(event = "upstream_decode_failed", op, error = %err, "success body was not JSON");
                Err(ErrorEnvelope::local(ClassifiedError::unexpected(
                    "upstream success body was not valid JSON",
                )))
            }
        }
    }
}

/// The aggregator fronts diffusion backends that honor sampler knobs the
/// DALL-E-style ones ignore.
fn is_diffusion_model(model_id: &str) -> bool {
    let id = model_id.to_lowercase();
    ["stable-diffusion", "sdxl", "flux"]
        .iter()
        .any(|marker| id.contains(marker))
}

/// Upstream omits usage for some models; fall back to a whitespace token
/// estimate so the reply shape stays stable.
fn estimate_usage(prompt: &str) -> Usage {
    let prompt_tokens = prompt.split_whitespace().count() as u64;
    Usage {
        prompt_tokens,
        completion_tokens: 50,
        total_tokens: prompt_tokens + 50,
    }
}

/// Media endpoints are inconsistent about where the URL lives: top-level
/// `url`, a modality-specific alias, or an images-style `data[0].url`.
fn extract_media_url(body: &JsonValue, alias: &str) -> Option<String> {
    body.get("url")
        .and_then(JsonValue::as_str)
        .or_else(|| body.get(alias).and_then(JsonValue::as_str))
        .or_else(|| body.pointer("/data/0/url").and_then(JsonValue::as_str))
        .map(str::to_string)
}

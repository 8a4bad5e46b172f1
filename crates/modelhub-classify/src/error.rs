use serde_json::Value as JsonValue;

use modelhub_protocol::{ClassifiedError, ErrorAction, ErrorKind};

const RAW_ECHO_LIMIT: usize = 160;

/// Fold an upstream error body into a user-facing error. Pure and total:
/// any byte sequence classifies into exactly one kind, and the predicate
/// order below is the precedence order.
pub fn classify_error_body(raw: &str) -> ClassifiedError {
    let Ok(body) = serde_json::from_str::<JsonValue>(raw) else {
        return parsing_error(raw);
    };

    if let Some(error) = body.get("detail").and_then(|detail| detail.get("error")) {
        return classify_detail_error(error);
    }

    if let Some(flat) = body.get("error") {
        let message = flat
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| flat.to_string());
        return ClassifiedError::new(
            ErrorKind::HttpError,
            format!("API error: {message}"),
            "The upstream rejected the request without a structured error body.",
            ErrorAction::RetryLater,
        );
    }

    // Parsed but in none of the known shapes. Still an HTTP-level error
    // report; parsing_error is reserved for bodies that are not JSON at all.
    ClassifiedError::new(
        ErrorKind::HttpError,
        format!("API error: {}", truncate(raw, RAW_ECHO_LIMIT)),
        "The upstream rejected the request without a structured error body.",
        ErrorAction::RetryLater,
    )
}

fn classify_detail_error(error: &JsonValue) -> ClassifiedError {
    let code = lower_field(error, "code");
    let message = lower_field(error, "message");
    let kind = lower_field(error, "type");
    let original_message = str_field(error, "message");
    let param = str_field(error, "param");

    if code.contains("provider_prefix_missing_or_model_not_found") {
        let model = if param.is_empty() { "unknown" } else { &param };
        return ClassifiedError::new(
            ErrorKind::ModelNotFound,
            format!("Model '{model}' not found or unavailable."),
            "Pick a different model from the catalog.",
            ErrorAction::SelectDifferentModel,
        );
    }

    if code.contains("rate_limit")
        || message.contains("quota")
        || message.contains("requests per day")
    {
        return ClassifiedError::new(
            ErrorKind::RateLimit,
            "Rate limit exceeded for this model.",
            "Wait before retrying, or switch to a model with spare quota.",
            ErrorAction::RetryLater,
        );
    }

    if message.contains("unavailable") || message.contains("down") || message.contains("maintenance")
    {
        return ClassifiedError::new(
            ErrorKind::ModelUnavailable,
            "This model is temporarily unavailable or under maintenance.",
            "Try a different model for now.",
            ErrorAction::SelectDifferentModel,
        );
    }

    if kind.contains("unauthorized") || code.contains("auth") || code.contains("invalid_api_key") {
        return ClassifiedError::new(
            ErrorKind::AuthError,
            "Authentication with the upstream failed.",
            "Check the API key saved in settings.",
            ErrorAction::CheckApiKey,
        );
    }

    if message.contains("credit")
        || message.contains("payment")
        || message.contains("billing")
        || code.contains("insufficient_quota")
    {
        return ClassifiedError::new(
            ErrorKind::InsufficientCredits,
            "Insufficient credits or payment required.",
            "Check the billing status of the upstream account.",
            ErrorAction::CheckBilling,
        );
    }

    if message.contains("access") || message.contains("permission") || message.contains("plan") {
        return ClassifiedError::new(
            ErrorKind::AccessDenied,
            "Access to this model is denied on the current plan.",
            "Upgrading the upstream plan may unlock this model.",
            ErrorAction::UpgradePlan,
        );
    }

    if code.contains("internal_server_error") || code.contains("server_error") || kind == "api_error"
    {
        return ClassifiedError::new(
            ErrorKind::ServerError,
            "The upstream service is experiencing issues.",
            "Try again in a few minutes.",
            ErrorAction::RetryLater,
        );
    }

    if kind.contains("invalid_request_error") || message.contains("parameter") {
        return ClassifiedError::new(
            ErrorKind::InvalidParameters,
            "The request parameters were rejected.",
            "Adjust the request parameters and retry.",
            ErrorAction::FixParameters,
        );
    }

    if message.contains("context_length") || (message.contains("token") && message.contains("limit"))
    {
        return ClassifiedError::new(
            ErrorKind::ContextLimit,
            "The input exceeds the model's context window.",
            "Shorten the prompt or conversation history.",
            ErrorAction::ShortenInput,
        );
    }

    ClassifiedError::new(
        ErrorKind::UnknownError,
        format!("Error: {original_message}"),
        "The upstream returned an unrecognized error.",
        ErrorAction::ContactSupport,
    )
}

fn parsing_error(raw: &str) -> ClassifiedError {
    ClassifiedError::new(
        ErrorKind::ParsingError,
        format!("Unexpected error: {}", truncate(raw, RAW_ECHO_LIMIT)),
        "The upstream returned a body this service could not parse.",
        ErrorAction::RetryLater,
    )
}

fn lower_field(value: &JsonValue, key: &str) -> String {
    value
        .get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

fn str_field(value: &JsonValue, key: &str) -> String {
    value
        .get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn truncate(raw: &str, limit: usize) -> &str {
    if raw.len() <= limit {
        return raw;
    }
    // Back off to a char boundary so slicing never panics on multibyte text.
    let mut end = limit;
    while end > 0 && !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(code: &str, message: &str, kind: &str) -> String {
        serde_json::json!({
            "detail": {
                "error": { "code": code, "message": message, "type": kind }
            }
        })
        .to_string()
    }

    #[test]
    fn model_not_found_wins_over_everything() {
        let raw = serde_json::json!({
            "detail": {
                "error": {
                    "code": "provider_prefix_missing_or_model_not_found",
                    "message": "rate_limit quota auth",
                    "type": "unauthorized",
                    "param": "gpt-4o",
                }
            }
        })
        .to_string();
        let classified = classify_error_body(&raw);
        assert_eq!(classified.kind, ErrorKind::ModelNotFound);
        assert!(classified.message.contains("gpt-4o"));
    }

    #[test]
    fn rate_limit_beats_auth() {
        // Both predicates match; rate_limit is checked first.
        let raw = detail("rate_limit_exceeded", "auth problem", "unauthorized");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::RateLimit);
    }

    #[test]
    fn quota_in_message_is_rate_limit() {
        let raw = detail("", "daily quota exhausted", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::RateLimit);
    }

    #[test]
    fn unavailable_message() {
        let raw = detail("", "model is temporarily unavailable", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::ModelUnavailable);
    }

    #[test]
    fn auth_from_type_or_code() {
        let raw = detail("invalid_api_key", "", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::AuthError);
        let raw = detail("", "", "unauthorized");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::AuthError);
    }

    #[test]
    fn billing_terms_mean_insufficient_credits() {
        for term in ["credit exhausted", "payment required", "billing hold"] {
            let raw = detail("", term, "");
            assert_eq!(classify_error_body(&raw).kind, ErrorKind::InsufficientCredits);
        }
        let raw = detail("insufficient_quota", "", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::InsufficientCredits);
    }

    #[test]
    fn plan_restriction_is_access_denied() {
        let raw = detail("", "your plan does not include this model", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::AccessDenied);
    }

    #[test]
    fn api_error_type_is_server_error() {
        let raw = detail("", "", "api_error");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::ServerError);
    }

    #[test]
    fn invalid_request_and_context_limit() {
        let raw = detail("", "", "invalid_request_error");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::InvalidParameters);
        let raw = detail("", "context_length exceeded", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::ContextLimit);
        let raw = detail("", "token count above limit", "");
        assert_eq!(classify_error_body(&raw).kind, ErrorKind::ContextLimit);
    }

    #[test]
    fn unknown_error_echoes_message() {
        let raw = detail("weird_code", "something odd happened", "");
        let classified = classify_error_body(&raw);
        assert_eq!(classified.kind, ErrorKind::UnknownError);
        assert!(classified.message.contains("something odd happened"));
    }

    #[test]
    fn flat_error_field_is_http_error() {
        let raw = r#"{"error": "bad gateway"}"#;
        let classified = classify_error_body(raw);
        assert_eq!(classified.kind, ErrorKind::HttpError);
        assert!(classified.message.contains("bad gateway"));
    }

    #[test]
    fn unrecognized_json_shape_is_http_error() {
        let raw = r#"{"message": "internal failure"}"#;
        let classified = classify_error_body(raw);
        assert_eq!(classified.kind, ErrorKind::HttpError);
        assert!(classified.message.contains("internal failure"));
    }

    #[test]
    fn garbage_is_parsing_error_and_truncated() {
        let raw = "x".repeat(500);
        let classified = classify_error_body(&raw);
        assert_eq!(classified.kind, ErrorKind::ParsingError);
        assert!(classified.message.len() < 250);
    }

    #[test]
    fn classification_is_deterministic() {
        let raw = detail("rate_limit", "quota", "unauthorized");
        assert_eq!(classify_error_body(&raw), classify_error_body(&raw));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let raw = "é".repeat(200);
        // Must not panic.
        let classified = classify_error_body(&raw);
        assert_eq!(classified.kind, ErrorKind::ParsingError);
    }
}

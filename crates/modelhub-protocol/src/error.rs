use serde::{Deserialize, Serialize};

/// Every way a generation call can fail from the caller's point of view.
/// Upstream failures never escape as raw bodies; they are folded into one
/// of these tags first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoApiKey,
    ModelNotFound,
    RateLimit,
    ModelUnavailable,
    AuthError,
    InsufficientCredits,
    AccessDenied,
    ServerError,
    InvalidParameters,
    ContextLimit,
    HttpError,
    ParsingError,
    UnknownError,
    NetworkError,
    NoResponse,
    NoImageGenerated,
    NoAudioGenerated,
    NoVideoGenerated,
    UnexpectedError,
}

/// What the front-end should offer the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorAction {
    SelectDifferentModel,
    RetryLater,
    CheckApiKey,
    CheckBilling,
    UpgradePlan,
    FixParameters,
    ShortenInput,
    CheckConnection,
    ContactSupport,
    Retry,
}

/// User-facing error: a tag plus human-readable message, suggestion and a
/// recommended action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: String,
    pub action: ErrorAction,
}

impl ClassifiedError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        action: ErrorAction,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: suggestion.into(),
            action,
        }
    }
}

/// Canned errors raised by this service itself, as opposed to ones
/// classified out of an upstream body.
impl ClassifiedError {
    pub fn no_api_key() -> Self {
        Self::new(
            ErrorKind::NoApiKey,
            "No API key provided.",
            "Save a provider API key in settings or pass one inline with the request.",
            ErrorAction::CheckApiKey,
        )
    }

    pub fn network_error() -> Self {
        Self::new(
            ErrorKind::NetworkError,
            "Network error while contacting the upstream.",
            "Check the connection and try again.",
            ErrorAction::CheckConnection,
        )
    }

    pub fn no_response() -> Self {
        Self::new(
            ErrorKind::NoResponse,
            "No response from model.",
            "Retry, or pick a different model.",
            ErrorAction::Retry,
        )
    }

    pub fn no_image_generated() -> Self {
        Self::new(
            ErrorKind::NoImageGenerated,
            "No image generated.",
            "Retry, or pick a different model.",
            ErrorAction::Retry,
        )
    }

    pub fn no_audio_generated() -> Self {
        Self::new(
            ErrorKind::NoAudioGenerated,
            "No audio generated.",
            "Retry, or pick a different model.",
            ErrorAction::Retry,
        )
    }

    pub fn no_video_generated() -> Self {
        Self::new(
            ErrorKind::NoVideoGenerated,
            "No video generated.",
            "Retry, or pick a different model.",
            ErrorAction::Retry,
        )
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::UnexpectedError,
            format!("Unexpected error: {}", message.into()),
            "Retry; if the problem persists, report it.",
            ErrorAction::ContactSupport,
        )
    }
}

/// Failure body of a generation endpoint. The HTTP status of our own
/// response stays 200; `status_code` echoes the upstream status when one
/// was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ClassifiedError,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorEnvelope {
    pub fn local(error: ClassifiedError) -> Self {
        Self {
            error,
            status_code: None,
        }
    }

    pub fn upstream(error: ClassifiedError, status_code: u16) -> Self {
        Self {
            error,
            status_code: Some(status_code),
        }
    }
}

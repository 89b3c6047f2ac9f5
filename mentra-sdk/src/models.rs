use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the app server runtime
#[derive(Debug, Clone)]
pub struct AppServerConfig {
    /// Package name the app is registered under in the developer console
    pub package_name: String,
    /// API key issued for this package
    pub api_key: String,
    /// TCP port the runtime listens on
    pub port: u16,
    /// Directory served as static assets (webview pages)
    pub public_dir: PathBuf,
}

impl AppServerConfig {
    pub fn new(package_name: String, api_key: String, port: u16) -> Self {
        Self {
            package_name,
            api_key,
            port,
            public_dir: PathBuf::from("public"),
        }
    }

    pub fn with_public_dir(mut self, public_dir: impl Into<PathBuf>) -> Self {
        self.public_dir = public_dir.into();
        self
    }
}

/// Region of the glasses display a layout is rendered to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    Main,
    Dashboard,
}

/// Options for a text wall display request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextWallOptions {
    /// How long the layout stays visible. `None` leaves it up until replaced.
    pub duration_ms: Option<u64>,
    pub view: ViewType,
}

impl TextWallOptions {
    pub fn for_duration(duration_ms: u64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            ..Self::default()
        }
    }

    pub fn with_view(mut self, view: ViewType) -> Self {
        self.view = view;
        self
    }
}

/// A display request issued on a session, as published to layout subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRequest {
    pub session_id: String,
    pub text: String,
    pub view: ViewType,
    pub duration_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// Speech-to-text result delivered to a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionData {
    pub text: String,
    pub is_final: bool,
    #[serde(default)]
    pub transcribe_language: Option<String>,
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub end_time: Option<u64>,
}

/// Battery status reported by the glasses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlassesBatteryData {
    pub level: u8,
    pub charging: bool,
    #[serde(default)]
    pub time_remaining: Option<u32>,
}

/// Event pushed by the cloud to a running session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Transcription(TranscriptionData),
    GlassesBattery(GlassesBatteryData),
}

/// Session lifecycle webhook sent by the cloud
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum WebhookRequest {
    SessionRequest {
        session_id: String,
        user_id: String,
    },
    StopRequest {
        session_id: String,
        user_id: String,
        #[serde(default)]
        reason: String,
    },
}

/// Acknowledgement for webhook and event deliveries
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub message: String,
}

impl WebhookResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Liveness report of the runtime
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub package_name: String,
    pub active_sessions: usize,
    pub timestamp: DateTime<Utc>,
}

/// Error response returned by the runtime's endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

use async_trait::async_trait;
use mentra_sdk::{
    AppServerHandler, AppSession, GlassesBatteryData, Result as SdkResult, TextWallOptions,
    TranscriptionData, ViewType,
};
use std::sync::Arc;

use crate::storage::ActiveSessionRegistry;

pub const WELCOME_TEXT: &str = "Button App Ready! Open Webview to trigger.";
pub const WELCOME_DURATION_MS: u64 = 3000;
pub const BROADCAST_TEXT: &str = "hello there";
pub const BROADCAST_DURATION_MS: u64 = 5000;
pub const TRANSCRIPT_PREFIX: &str = "You said: ";
pub const TRANSCRIPT_DURATION_MS: u64 = 3000;

/// Button app: tracks running sessions and shows text walls on them
#[derive(Debug, Clone)]
pub struct ButtonApp {
    registry: ActiveSessionRegistry,
}

impl ButtonApp {
    pub fn new(registry: ActiveSessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActiveSessionRegistry {
        &self.registry
    }

    /// Show the broadcast text on every active session.
    /// Returns the number of sessions addressed.
    pub fn trigger_broadcast(&self) -> usize {
        let sessions = self.registry.handles();
        tracing::info!("Triggering display on {} sessions", sessions.len());

        for session in &sessions {
            session.show_text_wall(
                BROADCAST_TEXT,
                TextWallOptions::for_duration(BROADCAST_DURATION_MS).with_view(ViewType::Main),
            );
        }

        sessions.len()
    }

    /// 只回显最终结果，中间结果忽略
    pub fn handle_transcription(session: &dyn AppSession, data: &TranscriptionData) {
        if !data.is_final {
            return;
        }

        session.show_text_wall(
            &format!("{}{}", TRANSCRIPT_PREFIX, data.text),
            TextWallOptions::for_duration(TRANSCRIPT_DURATION_MS).with_view(ViewType::Main),
        );
    }

    pub fn handle_battery(session: &dyn AppSession, data: &GlassesBatteryData) {
        tracing::info!(
            "Glasses battery on session {}: {}% (charging: {})",
            session.session_id(),
            data.level,
            data.charging
        );
    }
}

#[async_trait]
impl AppServerHandler for ButtonApp {
    async fn on_session(
        &self,
        session: Arc<dyn AppSession>,
        session_id: &str,
        user_id: &str,
    ) -> SdkResult<()> {
        tracing::info!("New session: {} for user {}", session_id, user_id);
        self.registry.insert(session_id.to_string(), session.clone());

        // 欢迎消息
        session.show_text_wall(
            WELCOME_TEXT,
            TextWallOptions::for_duration(WELCOME_DURATION_MS),
        );

        session.on_transcription(Arc::new(Self::handle_transcription));
        session.on_glasses_battery(Arc::new(Self::handle_battery));

        Ok(())
    }

    async fn on_stop(&self, session_id: &str, user_id: &str, reason: &str) -> SdkResult<()> {
        tracing::info!("Session stopped: {} for user {} ({})", session_id, user_id, reason);

        if self.registry.remove(session_id).is_none() {
            tracing::debug!("Session {} was not active", session_id);
        }

        Ok(())
    }
}

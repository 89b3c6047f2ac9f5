use crate::{
    errors::Result,
    models::{GlassesBatteryData, TextWallOptions, TranscriptionData},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Callback invoked for every transcription event delivered to a session
pub type TranscriptionHandler = Arc<dyn Fn(&dyn AppSession, &TranscriptionData) + Send + Sync>;

/// Callback invoked for every glasses battery update delivered to a session
pub type BatteryHandler = Arc<dyn Fn(&dyn AppSession, &GlassesBatteryData) + Send + Sync>;

/// Handle to one user's running session
///
/// Handles are owned by the runtime; apps keep `Arc` clones for as long as
/// they want to address the session.
pub trait AppSession: Send + Sync {
    fn session_id(&self) -> &str;

    fn user_id(&self) -> &str;

    /// Show a text wall on the user's glasses. Fire-and-forget.
    fn show_text_wall(&self, text: &str, options: TextWallOptions);

    /// Register a handler for transcription events on this session
    fn on_transcription(&self, handler: TranscriptionHandler);

    /// Register a handler for glasses battery updates on this session
    fn on_glasses_battery(&self, handler: BatteryHandler);
}

/// Trait that apps implement to receive session lifecycle callbacks
#[async_trait]
pub trait AppServerHandler: Send + Sync {
    /// Called when the cloud starts a new session for this app
    ///
    /// The app should:
    /// 1. Keep the handle if it needs to address the session later
    /// 2. Register its per-session event handlers
    /// 3. Return Ok(()) once set up, or Err() to reject the session
    async fn on_session(
        &self,
        session: Arc<dyn AppSession>,
        session_id: &str,
        user_id: &str,
    ) -> Result<()>;

    /// Called when a session ends
    ///
    /// This is optional - apps can implement cleanup logic here
    async fn on_stop(&self, session_id: &str, user_id: &str, reason: &str) -> Result<()> {
        tracing::info!("Session {} for user {} stopped ({})", session_id, user_id, reason);
        Ok(())
    }
}

use crate::{
    models::{DisplayRequest, SessionEvent, TextWallOptions},
    traits::{AppSession, BatteryHandler, TranscriptionHandler},
};
use chrono::Utc;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;

const LAYOUT_CHANNEL_CAPACITY: usize = 100;

/// Session handle created by the runtime for every session webhook
///
/// Display requests are published on a per-session broadcast channel;
/// incoming events are fanned out to the handlers registered by the app.
pub struct LocalSession {
    session_id: String,
    user_id: String,
    layouts: broadcast::Sender<DisplayRequest>,
    transcription_handlers: Mutex<Vec<TranscriptionHandler>>,
    battery_handlers: Mutex<Vec<BatteryHandler>>,
}

impl LocalSession {
    pub fn new(session_id: String, user_id: String) -> Self {
        let (layouts, _) = broadcast::channel(LAYOUT_CHANNEL_CAPACITY);
        Self {
            session_id,
            user_id,
            layouts,
            transcription_handlers: Mutex::new(Vec::new()),
            battery_handlers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to the display requests issued on this session
    pub fn subscribe_layouts(&self) -> broadcast::Receiver<DisplayRequest> {
        self.layouts.subscribe()
    }

    /// Deliver an event to the handlers registered for its kind
    pub fn dispatch(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Transcription(data) => {
                // Snapshot so handlers may register further handlers
                let handlers = self
                    .transcription_handlers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                tracing::debug!(
                    "Delivering transcription to {} handler(s) on session {}",
                    handlers.len(),
                    self.session_id
                );
                for handler in handlers {
                    handler(self, data);
                }
            }
            SessionEvent::GlassesBattery(data) => {
                let handlers = self
                    .battery_handlers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                for handler in handlers {
                    handler(self, data);
                }
            }
        }
    }
}

impl AppSession for LocalSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn show_text_wall(&self, text: &str, options: TextWallOptions) {
        let request = DisplayRequest {
            session_id: self.session_id.clone(),
            text: text.to_string(),
            view: options.view,
            duration_ms: options.duration_ms,
            timestamp: Utc::now(),
        };

        tracing::info!(
            "Showing text wall on session {} ({:?}, {:?} ms): {}",
            self.session_id,
            request.view,
            request.duration_ms,
            request.text
        );

        // Dropped when nobody is subscribed
        let _ = self.layouts.send(request);
    }

    fn on_transcription(&self, handler: TranscriptionHandler) {
        self.transcription_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    fn on_glasses_battery(&self, handler: BatteryHandler) {
        self.battery_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}

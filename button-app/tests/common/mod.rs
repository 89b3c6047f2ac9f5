//! Recording session double shared by the integration tests

#![allow(dead_code)]

use mentra_sdk::{
    AppSession, BatteryHandler, GlassesBatteryData, TextWallOptions, TranscriptionData,
    TranscriptionHandler,
};
use std::sync::{Arc, Mutex};

/// Session handle that records every display call instead of rendering it
pub struct RecordingSession {
    session_id: String,
    user_id: String,
    displays: Mutex<Vec<(String, TextWallOptions)>>,
    transcription_handlers: Mutex<Vec<TranscriptionHandler>>,
    battery_handlers: Mutex<Vec<BatteryHandler>>,
}

impl RecordingSession {
    pub fn new(session_id: &str, user_id: &str) -> Arc<Self> {
        Arc::new(Self {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            displays: Mutex::new(Vec::new()),
            transcription_handlers: Mutex::new(Vec::new()),
            battery_handlers: Mutex::new(Vec::new()),
        })
    }

    pub fn displays(&self) -> Vec<(String, TextWallOptions)> {
        self.displays.lock().unwrap().clone()
    }

    pub fn display_texts(&self) -> Vec<String> {
        self.displays().into_iter().map(|(text, _)| text).collect()
    }

    pub fn clear_displays(&self) {
        self.displays.lock().unwrap().clear();
    }

    pub fn handler_counts(&self) -> (usize, usize) {
        (
            self.transcription_handlers.lock().unwrap().len(),
            self.battery_handlers.lock().unwrap().len(),
        )
    }

    pub fn emit_transcription(&self, text: &str, is_final: bool) {
        let data = TranscriptionData {
            text: text.to_string(),
            is_final,
            transcribe_language: Some("en-US".to_string()),
            start_time: None,
            end_time: None,
        };
        let handlers = self.transcription_handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(self, &data);
        }
    }

    pub fn emit_battery(&self, level: u8, charging: bool) {
        let data = GlassesBatteryData {
            level,
            charging,
            time_remaining: None,
        };
        let handlers = self.battery_handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(self, &data);
        }
    }
}

impl AppSession for RecordingSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn show_text_wall(&self, text: &str, options: TextWallOptions) {
        self.displays
            .lock()
            .unwrap()
            .push((text.to_string(), options));
    }

    fn on_transcription(&self, handler: TranscriptionHandler) {
        self.transcription_handlers.lock().unwrap().push(handler);
    }

    fn on_glasses_battery(&self, handler: BatteryHandler) {
        self.battery_handlers.lock().unwrap().push(handler);
    }
}

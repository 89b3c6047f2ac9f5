use crate::{api::models::*, services::ButtonApp};
use axum::{extract::State, response::Json};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<ButtonApp>,
}

// 向所有活跃会话广播
pub async fn trigger(State(state): State<AppState>) -> Json<TriggerResponse> {
    let count = state.app.trigger_broadcast();

    Json(TriggerResponse {
        success: true,
        count,
    })
}

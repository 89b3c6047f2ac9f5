use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use chrono::Utc;
use dashmap::DashMap;
use futures_util::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::broadcast};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    errors::{MentraError, Result},
    models::*,
    session::LocalSession,
    traits::AppServerHandler,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
struct RuntimeState {
    config: Arc<AppServerConfig>,
    handler: Arc<dyn AppServerHandler>,
    sessions: Arc<DashMap<String, Arc<LocalSession>>>,
}

/// App server that receives session webhooks and hosts the app's HTTP routes
pub struct AppServer {
    config: AppServerConfig,
    handler: Arc<dyn AppServerHandler>,
    sessions: Arc<DashMap<String, Arc<LocalSession>>>,
    routes: Router,
}

impl AppServer {
    /// Create a new app server
    pub fn new(config: AppServerConfig, handler: Arc<dyn AppServerHandler>) -> Result<Self> {
        if config.package_name.trim().is_empty() {
            return Err(MentraError::ConfigurationError(
                "package name must not be empty".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(MentraError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            config,
            handler,
            sessions: Arc::new(DashMap::new()),
            routes: Router::new(),
        })
    }

    /// Add app routes next to the runtime's own endpoints
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Get the server configuration
    pub fn config(&self) -> &AppServerConfig {
        &self.config
    }

    /// Look up a running session by id
    pub fn session(&self, session_id: &str) -> Option<Arc<LocalSession>> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    /// Assemble the full router: runtime endpoints, app routes, static assets
    pub fn router(&self) -> Router {
        let state = RuntimeState {
            config: Arc::new(self.config.clone()),
            handler: self.handler.clone(),
            sessions: self.sessions.clone(),
        };

        Router::new()
            .route("/health", get(health_check))
            .route("/webhook", post(handle_webhook))
            .route("/sessions/{session_id}/events", post(handle_session_event))
            .route("/sessions/{session_id}/layouts", get(layouts_stream))
            .with_state(state)
            .merge(self.routes.clone())
            .fallback_service(ServeDir::new(&self.config.public_dir))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    /// Bind the configured port and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            MentraError::StartupError(format!("Failed to bind to {}: {}", addr, e))
        })?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let app = self.router();

        match listener.local_addr() {
            Ok(addr) => info!("App server {} listening on {}", self.config.package_name, addr),
            Err(e) => warn!("App server listening on unknown address: {}", e),
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| MentraError::StartupError(format!("Server error: {}", e)))?;

        Ok(())
    }
}

async fn health_check(State(state): State<RuntimeState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        package_name: state.config.package_name.clone(),
        active_sessions: state.sessions.len(),
        timestamp: Utc::now(),
    })
}

async fn handle_webhook(
    State(state): State<RuntimeState>,
    headers: HeaderMap,
    Json(request): Json<WebhookRequest>,
) -> std::result::Result<Json<WebhookResponse>, ApiError> {
    authorize(&headers, &state.config.api_key).map_err(handle_error)?;

    match request {
        WebhookRequest::SessionRequest {
            session_id,
            user_id,
        } => {
            info!("Session request {} for user {}", session_id, user_id);

            let session = Arc::new(LocalSession::new(session_id.clone(), user_id.clone()));
            state.sessions.insert(session_id.clone(), session.clone());

            if let Err(e) = state
                .handler
                .on_session(session.clone(), &session_id, &user_id)
                .await
            {
                error!("Session handler rejected session {}: {}", session_id, e);
                // A restart under the same id may have replaced this handle meanwhile
                state
                    .sessions
                    .remove_if(&session_id, |_, current| Arc::ptr_eq(current, &session));
                return Err(handle_error(e));
            }

            Ok(Json(WebhookResponse::success(format!(
                "Session {} started",
                session_id
            ))))
        }
        WebhookRequest::StopRequest {
            session_id,
            user_id,
            reason,
        } => {
            info!("Stop request {} ({})", session_id, reason);

            if state.sessions.remove(&session_id).is_none() {
                warn!("Stop request for unknown session {}", session_id);
            }

            state
                .handler
                .on_stop(&session_id, &user_id, &reason)
                .await
                .map_err(handle_error)?;

            Ok(Json(WebhookResponse::success(format!(
                "Session {} stopped",
                session_id
            ))))
        }
    }
}

async fn handle_session_event(
    State(state): State<RuntimeState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(event): Json<SessionEvent>,
) -> std::result::Result<Json<WebhookResponse>, ApiError> {
    authorize(&headers, &state.config.api_key).map_err(handle_error)?;

    let session = lookup_session(&state, &session_id).map_err(handle_error)?;
    session.dispatch(&event);

    Ok(Json(WebhookResponse::success("Event delivered")))
}

/// SSE stream of the display requests issued on one session
async fn layouts_stream(
    State(state): State<RuntimeState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> std::result::Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>, ApiError>
{
    authorize(&headers, &state.config.api_key).map_err(handle_error)?;

    let session = lookup_session(&state, &session_id).map_err(handle_error)?;
    info!("Client subscribed to layouts of session {}", session_id);

    let receiver = session.subscribe_layouts();
    let event_stream = stream::unfold(receiver, |mut rx| async move {
        match rx.recv().await {
            Ok(request) => {
                let event = match serde_json::to_string(&request) {
                    Ok(json_data) => Event::default().event("display").data(json_data),
                    Err(e) => {
                        error!("Failed to serialize display request: {}", e);
                        Event::default().event("error").data("serialization_error")
                    }
                };
                Some((Ok(event), rx))
            }
            Err(broadcast::error::RecvError::Lagged(_)) => {
                Some((Ok(Event::default().event("system").data("lagged")), rx))
            }
            // Session stopped and its handle was dropped
            Err(broadcast::error::RecvError::Closed) => None,
        }
    });

    Ok(Sse::new(event_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

fn lookup_session(state: &RuntimeState, session_id: &str) -> Result<Arc<LocalSession>> {
    state
        .sessions
        .get(session_id)
        .map(|entry| entry.clone())
        .ok_or_else(|| MentraError::SessionNotFound {
            session_id: session_id.to_string(),
        })
}

fn authorize(headers: &HeaderMap, api_key: &str) -> Result<()> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| MentraError::Unauthorized("missing bearer token".to_string()))?;

    if token != api_key {
        return Err(MentraError::Unauthorized("invalid API key".to_string()));
    }
    Ok(())
}

fn handle_error(error: MentraError) -> ApiError {
    let (status_code, error_type) = match &error {
        MentraError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        MentraError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "SessionNotFound"),
        MentraError::ConfigurationError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Configuration")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
    };

    (
        status_code,
        Json(ErrorResponse {
            error: error_type.to_string(),
            message: error.to_string(),
            timestamp: Utc::now(),
        }),
    )
}

use axum::{routing::post, Router};
use mentra_sdk::{AppServer, AppServerConfig};
use std::sync::Arc;

use crate::{
    api::handlers::{self, AppState},
    config::AppConfig,
    services::ButtonApp,
    storage::ActiveSessionRegistry,
    utils::errors::Result,
};

pub struct Server {
    config: AppConfig,
    app: Arc<ButtonApp>,
}

impl Server {
    pub fn new(config: AppConfig) -> Self {
        // 会话表归应用实例所有
        let registry = ActiveSessionRegistry::new();
        let app = Arc::new(ButtonApp::new(registry));

        Self { config, app }
    }

    pub fn app(&self) -> Arc<ButtonApp> {
        self.app.clone()
    }

    /// Administrative routes added next to the runtime's endpoints
    pub fn admin_router(app: Arc<ButtonApp>) -> Router {
        Router::new()
            .route("/trigger", post(handlers::trigger))
            .with_state(AppState { app })
    }

    /// Wire the app into a MentraOS app server without starting it
    pub fn build(&self) -> Result<AppServer> {
        let sdk_config = AppServerConfig::new(
            self.config.package_name.clone(),
            self.config.api_key.clone(),
            self.config.port,
        )
        .with_public_dir(self.config.public_dir.clone());

        let app_server = AppServer::new(sdk_config, self.app.clone())?
            .with_routes(Self::admin_router(self.app.clone()));

        Ok(app_server)
    }

    pub async fn run(self) -> Result<()> {
        let app_server = self.build()?;
        tracing::info!(
            "Starting {} on port {}",
            self.config.package_name,
            self.config.port
        );

        if let Err(e) = app_server.start().await {
            tracing::error!("App server failed: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}

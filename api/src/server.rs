use crate::{create_router, AppState};
use authz::AuthzEngine;
use database::{BoardStorage, Database, ResourceStore};
use std::sync::Arc;
use tracing::{info, warn};
use user::{SessionConfig, SessionService};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to initialize test data (development only)
    pub init_test_data: bool,
    /// Whether to mount the trusting development login route
    pub dev_login: bool,
    /// Session cookie settings
    pub session: SessionConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3030,
            #[cfg(debug_assertions)]
            init_test_data: true,
            #[cfg(not(debug_assertions))]
            init_test_data: false,
            dev_login: cfg!(debug_assertions),
            session: SessionConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create a new API configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set whether to initialize test data
    pub fn with_test_data(mut self, init: bool) -> Self {
        self.init_test_data = init;
        self
    }

    /// Set whether the development login route is mounted
    pub fn with_dev_login(mut self, enabled: bool) -> Self {
        self.dev_login = enabled;
        self
    }

    /// Set the session cookie configuration
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Start the API server with the given configuration
pub async fn start_server_with_config(
    db: Arc<Database>,
    config: ApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn ResourceStore> = Arc::new(BoardStorage::new(db.clone()));

    // Initialize test data if requested
    #[cfg(debug_assertions)]
    if config.init_test_data {
        info!("Initializing test data for development");
        if let Err(e) = crate::test_data::init_test_data(store.as_ref()).await {
            warn!("Failed to initialize test data: {}", e);
        }
    }

    let authz = Arc::new(AuthzEngine::new()?);
    let sessions = SessionService::new(db.get_pool(), config.session.clone()).await?;

    if config.dev_login {
        warn!("Development login is enabled; POST /login trusts the submitted user id");
    }

    let state = AppState::new(store, authz).with_dev_login(config.dev_login);
    let app = create_router(state, sessions.layer());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on {}", addr);
    info!("Board available at http://localhost:{}/articles", config.port);

    let deletion_task = sessions.spawn_expired_deletion();
    let served = axum::serve(listener, app).await;
    deletion_task.abort();
    served?;

    Ok(())
}

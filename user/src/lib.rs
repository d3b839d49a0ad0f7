pub mod auth;
pub mod error;
pub mod feedback;

use tracing::info;

pub use auth::{
    CurrentCaller, RequiredCaller, SameSiteConfig, SessionConfig, SessionKeys, SessionManager,
    SqlxSessionStore, LOGIN_PATH,
};
pub use error::{Result as UserResult, UserError};
pub use feedback::FeedbackChannel;

/// Sessions for the board: persistent store plus cookie settings.
pub struct SessionService {
    store: SqlxSessionStore,
    config: SessionConfig,
}

impl SessionService {
    /// Create the session service over an existing database pool
    pub async fn new(pool: sqlx::SqlitePool, config: SessionConfig) -> error::Result<Self> {
        info!("Initializing session service");
        let store = SqlxSessionStore::new(pool).await?;

        Ok(Self { store, config })
    }

    /// Get a reference to the session store
    pub fn session_store(&self) -> &SqlxSessionStore {
        &self.store
    }

    /// Get the session configuration
    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    /// The tower-sessions layer to mount on a router
    pub fn layer(
        &self,
    ) -> tower_sessions::SessionManagerLayer<tower_sessions_sqlx_store::SqliteStore> {
        self.config.layer(self.store.inner().clone())
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> error::Result<()> {
        self.store.cleanup_expired().await
    }

    /// Start the background sweep of expired sessions at the configured interval
    pub fn spawn_expired_deletion(
        &self,
    ) -> tokio::task::JoinHandle<tower_sessions::session_store::Result<()>> {
        self.store.spawn_expired_deletion(self.config.cleanup_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_session_service_creation() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("board.db");
        std::fs::File::create(&db_path).unwrap();
        let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();

        let service = SessionService::new(pool, SessionConfig::new()).await.unwrap();
        assert_eq!(service.session_config().cookie_name, "board_session");
        service.cleanup_expired().await.unwrap();
        let _layer = service.layer();

        let task = service.spawn_expired_deletion();
        assert!(!task.is_finished());
        task.abort();
    }
}

use crate::logging;
use crate::utils::env_paths::{self, get_environment, EnvPaths};
use anyhow::{anyhow, Context, Result};
use api::ApiConfig;
use database::DatabaseConfig;
use tracing::info;
use user::SessionConfig;

/// Run the board server until it fails or Ctrl-C is received
pub async fn execute(port: Option<u16>, seed: bool, verbose: bool) -> Result<()> {
    let env_paths = EnvPaths::load()?;
    let _guard = logging::init_logging(&env_paths, verbose)?;

    info!("=== Board server starting (environment: {}) ===", get_environment());

    let db_path = env_paths.database_path();
    let db = database::initialize_database(DatabaseConfig::new_with_path(db_path.clone()))
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("Database ready at {:?}", db_path);

    let port = match port {
        Some(port) => port,
        None => env_paths::api_port()?,
    };
    let session = SessionConfig::from_env().context("Invalid session configuration")?;

    let config = ApiConfig::new()
        .with_port(port)
        .with_test_data(seed && cfg!(debug_assertions))
        .with_session(session);

    tokio::select! {
        result = api::start_server_with_config(db, config) => {
            result.map_err(|e| anyhow!("API server error: {}", e))?;
        }
        _ = tokio::signal::ctrl_c() => {
            logging::log_shutdown();
        }
    }

    Ok(())
}

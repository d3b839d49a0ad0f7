//! SQLx session store implementation for tower-sessions

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tower_sessions::{
    cookie::time::Duration, ExpiredDeletion, Expiry, SessionManagerLayer, SessionStore,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{debug, error, info};

use crate::error::{Result, UserError};

/// SQLx-based session store for tower-sessions
#[derive(Debug, Clone)]
pub struct SqlxSessionStore {
    store: SqliteStore,
}

impl SqlxSessionStore {
    /// Create a new SQLx session store, creating its table if needed
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        let store = SqliteStore::new(pool);
        store.migrate().await.map_err(|e| {
            error!("Failed to create session table: {}", e);
            UserError::Database(e)
        })?;

        info!("SQLx session store initialized");
        Ok(Self { store })
    }

    /// Get the underlying SqliteStore
    pub fn inner(&self) -> &SqliteStore {
        &self.store
    }

    /// Remove every session whose expiry has passed
    pub async fn cleanup_expired(&self) -> Result<()> {
        self.store.delete_expired().await.map_err(|e| {
            error!("Failed to clean up expired sessions: {}", e);
            UserError::from(e)
        })?;
        debug!("Expired sessions removed");
        Ok(())
    }

    /// Run expired-session deletion in the background every `period`.
    ///
    /// The task runs until aborted or until a deletion fails.
    pub fn spawn_expired_deletion(
        &self,
        period: std::time::Duration,
    ) -> JoinHandle<tower_sessions::session_store::Result<()>> {
        info!("Deleting expired sessions every {:?}", period);
        tokio::task::spawn(self.store.clone().continuously_delete_expired(period))
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// Inactivity timeout in seconds
    pub timeout_seconds: i64,
    /// Whether to use secure cookies (HTTPS only)
    pub secure: bool,
    /// SameSite cookie attribute
    pub same_site: SameSiteConfig,
    /// HTTP only cookie (not accessible via JavaScript)
    pub http_only: bool,
    /// Seconds between sweeps of expired sessions
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "board_session".to_string(),
            timeout_seconds: 86400, // 24 hours
            secure: false,
            same_site: SameSiteConfig::Lax,
            http_only: true,
            cleanup_interval_seconds: 60,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load session configuration, letting environment variables override defaults.
    ///
    /// `SESSION_SECURE` defaults to on when `ENVIRONMENT` is `prd`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SESSION_COOKIE_NAME") {
            config.cookie_name = name;
        }
        if let Ok(timeout) = env::var("SESSION_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.parse().map_err(|_| {
                UserError::Configuration(format!("Invalid SESSION_TIMEOUT_SECONDS: {}", timeout))
            })?;
        }

        if let Ok(interval) = env::var("SESSION_CLEANUP_INTERVAL_SECONDS") {
            config.cleanup_interval_seconds = match interval.parse() {
                Ok(seconds) if seconds > 0 => seconds,
                _ => {
                    return Err(UserError::Configuration(format!(
                        "Invalid SESSION_CLEANUP_INTERVAL_SECONDS: {}",
                        interval
                    )))
                }
            };
        }

        config.secure = match env::var("SESSION_SECURE") {
            Ok(value) => parse_flag(&value).ok_or_else(|| {
                UserError::Configuration(format!("Invalid SESSION_SECURE: {}", value))
            })?,
            Err(_) => env::var("ENVIRONMENT").map(|e| e == "prd").unwrap_or(false),
        };

        if let Ok(same_site) = env::var("SESSION_SAME_SITE") {
            config.same_site = same_site.parse()?;
        }

        Ok(config)
    }

    /// Build the tower-sessions layer for a store
    pub fn layer<S>(&self, store: S) -> SessionManagerLayer<S>
    where
        S: SessionStore + Clone,
    {
        SessionManagerLayer::new(store)
            .with_name(self.cookie_name.clone())
            .with_secure(self.secure)
            .with_http_only(self.http_only)
            .with_same_site(self.same_site.into())
            .with_expiry(Expiry::OnInactivity(Duration::seconds(self.timeout_seconds)))
    }

    pub fn cleanup_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cleanup_interval_seconds)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// SameSite cookie configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSiteConfig {
    Strict,
    Lax,
    None,
}

impl FromStr for SameSiteConfig {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSiteConfig::Strict),
            "lax" => Ok(SameSiteConfig::Lax),
            "none" => Ok(SameSiteConfig::None),
            other => Err(UserError::Configuration(format!(
                "Invalid SameSite value: {}",
                other
            ))),
        }
    }
}

impl From<SameSiteConfig> for tower_sessions::cookie::SameSite {
    fn from(config: SameSiteConfig) -> Self {
        match config {
            SameSiteConfig::Strict => tower_sessions::cookie::SameSite::Strict,
            SameSiteConfig::Lax => tower_sessions::cookie::SameSite::Lax,
            SameSiteConfig::None => tower_sessions::cookie::SameSite::None,
        }
    }
}

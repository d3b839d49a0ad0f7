use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered page: the view plus the feedback message taken for it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<V> {
    pub message: Option<String>,
    pub view: V,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub message: String,
}

/// What the login page offers.
///
/// Credentials are checked by the identity provider in front of the board;
/// `dev_login` says whether this server accepts a bare user id instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginView {
    pub dev_login: bool,
}

/// Development login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub user_id: String,
}

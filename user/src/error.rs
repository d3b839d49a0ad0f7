use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<tower_sessions::session::Error> for UserError {
    fn from(err: tower_sessions::session::Error) -> Self {
        UserError::Session(err.to_string())
    }
}

impl From<tower_sessions::session_store::Error> for UserError {
    fn from(err: tower_sessions::session_store::Error) -> Self {
        UserError::Session(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UserError>;

//! Identity adapter for the board.
//!
//! The board does not issue credentials. Whatever login flow sits in front of
//! it calls [`SessionManager::establish`] once a user is authenticated; from
//! then on every request resolves its [`Caller`](authz::Caller) from the
//! session cookie.
//!
//! - `session`: session keys, caller resolution and the axum extractors
//! - `store`: SQLite-backed session persistence and cookie configuration

pub mod session;
pub mod store;

pub use session::{CurrentCaller, RequiredCaller, SessionKeys, SessionManager, LOGIN_PATH};
pub use store::{SameSiteConfig, SessionConfig, SqlxSessionStore};

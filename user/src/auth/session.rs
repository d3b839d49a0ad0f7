//! Session management for authenticated callers

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use authz::{Caller, Role};
use tower_sessions::Session;
use tracing::{debug, error};

use crate::error::Result;

/// Where unauthenticated callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Session keys used for storing data
pub struct SessionKeys;

impl SessionKeys {
    pub const USER_ID: &'static str = "user_id";
    pub const ROLES: &'static str = "roles";
    pub const FEEDBACK: &'static str = "feedback";
}

/// Binds an authenticated identity to a session and reads it back.
pub struct SessionManager;

impl SessionManager {
    /// Record an authenticated user in the session.
    ///
    /// The session id is cycled so an id issued before login cannot be
    /// replayed afterwards.
    pub async fn establish(session: &Session, user_id: &str, roles: &[Role]) -> Result<()> {
        session.cycle_id().await?;
        session.insert(SessionKeys::USER_ID, user_id).await?;
        session.insert(SessionKeys::ROLES, roles.to_vec()).await?;
        session.save().await?;

        debug!("Session established for user: {}", user_id);
        Ok(())
    }

    /// Destroy a session (logout)
    pub async fn destroy(session: &Session) -> Result<()> {
        session.flush().await?;
        debug!("Session destroyed");
        Ok(())
    }

    /// The caller bound to this session, anonymous when nobody logged in.
    pub async fn caller(session: &Session) -> Result<Caller> {
        let user_id: Option<String> = session.get(SessionKeys::USER_ID).await?;
        let Some(user_id) = user_id else {
            return Ok(Caller::anonymous());
        };

        let roles: Vec<Role> = session.get(SessionKeys::ROLES).await?.unwrap_or_default();
        Ok(Caller::new(user_id, roles))
    }
}

async fn session_from_parts<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> std::result::Result<Session, StatusCode> {
    let Extension(session): Extension<Session> = Extension::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            error!("Session layer missing from the router");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(session)
}

/// Extractor for the caller, anonymous when not logged in
pub struct CurrentCaller(pub Caller);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;

        let caller = SessionManager::caller(&session).await.map_err(|e| {
            error!("Failed to read caller from session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(CurrentCaller(caller))
    }
}

/// Extractor for an authenticated caller (redirects to the login page otherwise)
pub struct RequiredCaller(pub Caller);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequiredCaller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let CurrentCaller(caller) = CurrentCaller::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if caller.is_authenticated() {
            Ok(RequiredCaller(caller))
        } else {
            debug!("Unauthenticated request to {}", parts.uri.path());
            Err(Redirect::to(LOGIN_PATH).into_response())
        }
    }
}

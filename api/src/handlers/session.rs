//! Session entry and exit.
//!
//! Credential checks belong to the identity provider in front of the board.
//! `GET /login` is always served; `POST /login` trusts the submitted user id
//! and is only mounted when development login is enabled.

use authz::Role;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use tower_sessions::Session;
use tracing::{info, warn};
use user::{FeedbackChannel, SessionManager, LOGIN_PATH};

use crate::{
    error::{ApiError, ApiResult},
    models::{LoginForm, LoginView, Page},
    AppState,
};

/// GET /login
///
/// Where unauthenticated callers land.
pub async fn login_page(State(state): State<AppState>, session: Session) -> ApiResult<Response> {
    let message = FeedbackChannel::take_if_present(&session).await?;
    let view = LoginView {
        dev_login: state.dev_login,
    };
    Ok(Json(Page { message, view }).into_response())
}

/// POST /login
pub async fn dev_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let Some(user) = state.store.find_user(&form.user_id).await? else {
        warn!("Development login for unknown user {}", form.user_id);
        return Err(ApiError::Unauthorized);
    };

    let roles: Vec<Role> = state
        .store
        .user_roles(&user.id)
        .await?
        .iter()
        .filter_map(|name| name.parse().ok())
        .collect();

    SessionManager::establish(&session, &user.id, &roles).await?;
    info!("Development login for {} with roles {:?}", user.username, roles);

    Ok(Redirect::to("/articles").into_response())
}

/// POST /logout
pub async fn logout(session: Session) -> ApiResult<Response> {
    SessionManager::destroy(&session).await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

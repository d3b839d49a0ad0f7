pub mod articles;
pub mod comments;
pub mod health;
pub mod session;

use axum::{
    response::{IntoResponse, Redirect, Response},
    Json,
};
use content::Outcome;
use serde::Serialize;
use tower_sessions::Session;
use tracing::debug;
use user::FeedbackChannel;

use crate::{error::ApiResult, models::Page};

/// Turn a lifecycle outcome into a response.
///
/// A render takes whatever message is waiting in the feedback slot; a
/// redirect leaves its own message there for the next render.
pub(crate) async fn respond<V: Serialize>(
    session: &Session,
    outcome: Outcome<V>,
) -> ApiResult<Response> {
    match outcome {
        Outcome::Render(view) => {
            let message = FeedbackChannel::take_if_present(session).await?;
            Ok(Json(Page { message, view }).into_response())
        }
        Outcome::Redirect(redirect) => {
            if let Some(message) = &redirect.feedback {
                FeedbackChannel::set_once(session, message).await?;
            }
            let path = redirect.to.path();
            debug!("Redirecting to {}", path);
            Ok(Redirect::to(&path).into_response())
        }
    }
}

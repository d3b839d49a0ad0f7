use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use entities::{ArticleId, CommentId, CommentInput};
use tower_sessions::Session;
use user::RequiredCaller;

use super::respond;
use crate::{error::ApiResult, AppState};

/// POST /articles/:id
pub async fn post_comment(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(article_id): Path<ArticleId>,
    Form(input): Form<CommentInput>,
) -> ApiResult<Response> {
    let outcome = state.board.comments.create(&caller, article_id, input).await?;
    respond(&session, outcome).await
}

/// GET /comments/:id/edit
pub async fn edit_comment_form(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<CommentId>,
) -> ApiResult<Response> {
    let outcome = state.board.comments.edit_form(&caller, id).await?;
    respond(&session, outcome).await
}

/// POST /comments/:id/edit
pub async fn update_comment(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<CommentId>,
    Form(input): Form<CommentInput>,
) -> ApiResult<Response> {
    let outcome = state.board.comments.update(&caller, id, input).await?;
    respond(&session, outcome).await
}

/// POST /comments/:id/delete
pub async fn delete_comment(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<CommentId>,
) -> ApiResult<Response> {
    let outcome = state.board.comments.delete(&caller, id).await?;
    respond(&session, outcome).await
}

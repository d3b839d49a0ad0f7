use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use entities::{ArticleId, ArticleInput};
use tower_sessions::Session;
use tracing::info;
use user::RequiredCaller;

use super::respond;
use crate::{error::ApiResult, AppState};

/// GET /articles
pub async fn list_articles(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
) -> ApiResult<Response> {
    let outcome = state.board.articles.list(&caller).await?;
    respond(&session, outcome).await
}

/// GET /articles/:id
pub async fn show_article(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<ArticleId>,
) -> ApiResult<Response> {
    let outcome = state.board.articles.show(&caller, id).await?;
    respond(&session, outcome).await
}

/// GET /articles/new
pub async fn new_article_form(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
) -> ApiResult<Response> {
    let outcome = state.board.articles.new_form(&caller).await?;
    respond(&session, outcome).await
}

/// POST /articles/new
pub async fn create_article(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Form(input): Form<ArticleInput>,
) -> ApiResult<Response> {
    info!("Article submission from {:?}", caller.id);
    let outcome = state.board.articles.create(&caller, input).await?;
    respond(&session, outcome).await
}

/// GET /articles/:id/edit
pub async fn edit_article_form(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<ArticleId>,
) -> ApiResult<Response> {
    let outcome = state.board.articles.edit_form(&caller, id).await?;
    respond(&session, outcome).await
}

/// POST /articles/:id/edit
pub async fn update_article(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<ArticleId>,
    Form(input): Form<ArticleInput>,
) -> ApiResult<Response> {
    let outcome = state.board.articles.update(&caller, id, input).await?;
    respond(&session, outcome).await
}

/// POST /articles/:id/delete
pub async fn delete_article(
    State(state): State<AppState>,
    session: Session,
    RequiredCaller(caller): RequiredCaller,
    Path(id): Path<ArticleId>,
) -> ApiResult<Response> {
    let outcome = state.board.articles.delete(&caller, id).await?;
    respond(&session, outcome).await
}

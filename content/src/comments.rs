//! Comment lifecycle: post, edit and delete.
//!
//! Denials always fall back to the article list, while successful edits and
//! deletes return to the article the comment belongs to.

use authz::{AuthzEngine, Caller, Capability};
use chrono::Utc;
use database::ResourceStore;
use entities::{ArticleId, ArticleRelations, Comment, CommentId, CommentInput, FieldErrors, NewComment};
use std::sync::Arc;
use tracing::info;

use crate::articles::ArticleLifecycle;
use crate::outcome::messages;
use crate::views::{ArticleShowView, CommentFormView};
use crate::{ContentError, Destination, Outcome, Result};

#[derive(Clone)]
pub struct CommentLifecycle {
    store: Arc<dyn ResourceStore>,
    authz: Arc<AuthzEngine>,
    articles: ArticleLifecycle,
}

impl CommentLifecycle {
    pub fn new(store: Arc<dyn ResourceStore>, authz: Arc<AuthzEngine>) -> Self {
        let articles = ArticleLifecycle::new(store.clone(), authz.clone());
        Self {
            store,
            authz,
            articles,
        }
    }

    /// Post a comment on an article.
    ///
    /// A rejected submission re-renders the article page, freshly loaded, with
    /// the submitted text and its field errors.
    pub async fn create(
        &self,
        caller: &Caller,
        article_id: ArticleId,
        input: CommentInput,
    ) -> Result<Outcome<ArticleShowView>> {
        if self
            .store
            .find_article(article_id, ArticleRelations::NONE)
            .await?
            .is_none()
        {
            return Err(ContentError::NotFound("Article", article_id));
        }

        let allowed = self
            .authz
            .decide(caller, Capability::CreateComment, None)
            .is_allowed();
        let owner = match (allowed, caller.id.clone()) {
            (true, Some(owner)) => owner,
            _ => {
                return Ok(Outcome::redirect_with(
                    Destination::ArticleList,
                    messages::POST_COMMENT_DENIED,
                ))
            }
        };

        let draft = match input.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                let form = CommentFormView {
                    comment_id: None,
                    article_id,
                    values: input,
                    errors,
                };
                let view = self.articles.show_view(caller, article_id, Some(form)).await?;
                return Ok(Outcome::Render(view));
            }
        };

        let id = self
            .store
            .insert_comment(&NewComment {
                content: draft.content,
                date: Utc::now(),
                article_id,
                user_id: owner.clone(),
            })
            .await?;

        info!("Comment {} posted on article {} by {}", id, article_id, owner);
        Ok(Outcome::redirect(Destination::ArticleShow(article_id)))
    }

    pub async fn edit_form(
        &self,
        caller: &Caller,
        id: CommentId,
    ) -> Result<Outcome<CommentFormView>> {
        let comment = self.load(id).await?;

        if !self.can_mutate(caller, &comment) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::EDIT_COMMENT_DENIED,
            ));
        }

        Ok(Outcome::Render(CommentFormView {
            comment_id: Some(comment.id),
            article_id: comment.article_id,
            values: CommentInput::new(&comment.content),
            errors: FieldErrors::new(),
        }))
    }

    /// Replace the comment text. Date, article and owner never change.
    pub async fn update(
        &self,
        caller: &Caller,
        id: CommentId,
        input: CommentInput,
    ) -> Result<Outcome<CommentFormView>> {
        let mut comment = self.load(id).await?;

        let draft = match input.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                return Ok(Outcome::Render(CommentFormView {
                    comment_id: Some(comment.id),
                    article_id: comment.article_id,
                    values: input,
                    errors,
                }))
            }
        };

        if !self.can_mutate(caller, &comment) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::EDIT_COMMENT_DENIED,
            ));
        }

        comment.content = draft.content;
        self.store.update_comment(&comment).await?;

        info!("Comment {} updated by {:?}", id, caller.id);
        Ok(Outcome::redirect(Destination::ArticleShow(comment.article_id)))
    }

    pub async fn delete(&self, caller: &Caller, id: CommentId) -> Result<Outcome<()>> {
        let comment = self.load(id).await?;

        if !self.can_mutate(caller, &comment) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::DELETE_COMMENT_DENIED,
            ));
        }

        self.store.delete_comment(id).await?;

        info!("Comment {} deleted by {:?}", id, caller.id);
        Ok(Outcome::redirect(Destination::ArticleShow(comment.article_id)))
    }

    async fn load(&self, id: CommentId) -> Result<Comment> {
        self.store
            .find_comment(id)
            .await?
            .ok_or(ContentError::NotFound("Comment", id))
    }

    fn can_mutate(&self, caller: &Caller, comment: &Comment) -> bool {
        self.authz
            .decide(caller, Capability::MutateComment, Some(&comment.user_id))
            .is_allowed()
    }
}

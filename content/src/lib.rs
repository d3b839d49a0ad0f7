//! # Content Crate
//!
//! Article and comment lifecycles for the publishing board. Each operation
//! loads what it needs from a [`ResourceStore`], asks the [`AuthzEngine`] for
//! a decision and answers with an [`Outcome`]:
//!
//! - `Outcome::Render(view)` when a page should be shown, including a form
//!   re-rendered with field errors,
//! - `Outcome::Redirect(..)` after a successful write or a denial, carrying
//!   the message for the caller's feedback slot.
//!
//! Missing records, callers without any board role and store failures are
//! [`ContentError`]s.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let board = Board::new(store, authz);
//! match board.articles.delete(&caller, id).await? {
//!     Outcome::Redirect(redirect) => { /* set feedback, navigate */ }
//!     Outcome::Render(()) => unreachable!(),
//! }
//! ```

pub mod articles;
pub mod comments;
pub mod error;
pub mod outcome;
pub mod views;

#[cfg(test)]
mod test_support;

use authz::AuthzEngine;
use database::ResourceStore;
use std::sync::Arc;

pub use articles::ArticleLifecycle;
pub use comments::CommentLifecycle;
pub use error::ContentError;
pub use outcome::{messages, Destination, Outcome, Redirect};
pub use views::{
    ArticleFormView, ArticleListView, ArticleShowView, CategoryOption, CommentFormView, FormMode,
    ShowAffordances,
};

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Both lifecycles over one store and one policy engine.
#[derive(Clone)]
pub struct Board {
    pub articles: ArticleLifecycle,
    pub comments: CommentLifecycle,
}

impl Board {
    pub fn new(store: Arc<dyn ResourceStore>, authz: Arc<AuthzEngine>) -> Self {
        Self {
            articles: ArticleLifecycle::new(store.clone(), authz.clone()),
            comments: CommentLifecycle::new(store, authz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use authz::{Caller, Role};
    use entities::{ArticleInput, CommentInput};

    #[tokio::test]
    async fn test_publish_then_moderate() {
        let fx = fixture().await;
        let x = Caller::new("editor", [Role::Editor]);
        let y = Caller::new("reader", [Role::User]);

        let created = fx
            .board
            .articles
            .create(&x, ArticleInput::new("Hello", "World", fx.category))
            .await
            .unwrap();
        assert_eq!(
            created.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::ARTICLE_CREATED)
        );

        let list = fx.board.articles.list(&x).await.unwrap().into_view().unwrap();
        assert_eq!(list.articles.len(), 1);
        let article = &list.articles[0].article;
        assert_eq!(article.user_id, "editor");
        let id = article.id;

        fx.board
            .comments
            .create(&y, id, CommentInput::new("First!"))
            .await
            .unwrap();

        let denied = fx.board.articles.delete(&y, id).await.unwrap();
        assert_eq!(
            denied.as_redirect().unwrap(),
            &Redirect {
                to: Destination::ArticleList,
                feedback: Some(messages::DELETE_ARTICLE_DENIED.to_string()),
            }
        );
        assert_eq!(fx.article_count().await, 1);

        let removed = fx.board.articles.delete(&admin(), id).await.unwrap();
        assert_eq!(removed.as_redirect().unwrap().to, Destination::ArticleList);
        assert_eq!(fx.comment_count(id).await, 0);

        let err = fx.board.articles.show(&x, id).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound("Article", _)));
    }
}

//! Article lifecycle: list, show, create, edit and delete.

use authz::{AuthzEngine, Caller, Capability};
use chrono::Utc;
use database::ResourceStore;
use entities::input::CATEGORY_UNKNOWN;
use entities::{ArticleDraft, ArticleId, ArticleInput, ArticleRelations, FieldErrors, NewArticle};
use std::sync::Arc;
use tracing::{info, warn};

use crate::outcome::messages;
use crate::views::{
    category_options, ArticleFormView, ArticleListView, ArticleShowView, CommentFormView,
    FormMode, ShowAffordances,
};
use crate::{ContentError, Destination, Outcome, Result};

#[derive(Clone)]
pub struct ArticleLifecycle {
    store: Arc<dyn ResourceStore>,
    authz: Arc<AuthzEngine>,
}

impl ArticleLifecycle {
    pub fn new(store: Arc<dyn ResourceStore>, authz: Arc<AuthzEngine>) -> Self {
        Self { store, authz }
    }

    /// Every article with its category and author.
    pub async fn list(&self, caller: &Caller) -> Result<Outcome<ArticleListView>> {
        self.require_board(caller)?;

        let articles = self.store.list_articles(ArticleRelations::LISTING).await?;
        Ok(Outcome::Render(ArticleListView { articles }))
    }

    pub async fn show(&self, caller: &Caller, id: ArticleId) -> Result<Outcome<ArticleShowView>> {
        self.require_board(caller)?;
        Ok(Outcome::Render(self.show_view(caller, id, None).await?))
    }

    pub async fn new_form(&self, caller: &Caller) -> Result<Outcome<ArticleFormView>> {
        if !self.can_create(caller) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::CREATE_ARTICLE_DENIED,
            ));
        }

        let view = self
            .form_view(FormMode::Create, ArticleInput::default(), FieldErrors::new())
            .await?;
        Ok(Outcome::Render(view))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: ArticleInput,
    ) -> Result<Outcome<ArticleFormView>> {
        let owner = match (self.can_create(caller), caller.id.clone()) {
            (true, Some(owner)) => owner,
            _ => {
                return Ok(Outcome::redirect_with(
                    Destination::ArticleList,
                    messages::CREATE_ARTICLE_DENIED,
                ))
            }
        };

        let draft = match self.check(&input).await? {
            Ok(draft) => draft,
            Err(errors) => {
                let view = self.form_view(FormMode::Create, input, errors).await?;
                return Ok(Outcome::Render(view));
            }
        };

        let id = self
            .store
            .insert_article(&NewArticle {
                title: draft.title,
                content: draft.content,
                date: Utc::now(),
                category_id: draft.category_id,
                user_id: owner.clone(),
            })
            .await?;

        info!("Article {} created by {}", id, owner);
        Ok(Outcome::redirect_with(
            Destination::ArticleList,
            messages::ARTICLE_CREATED,
        ))
    }

    pub async fn edit_form(
        &self,
        caller: &Caller,
        id: ArticleId,
    ) -> Result<Outcome<ArticleFormView>> {
        let article = self.load(id, ArticleRelations::NONE).await?.article;

        if !self.can_mutate(caller, &article.user_id) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::EDIT_ARTICLE_DENIED,
            ));
        }

        let values = ArticleInput::new(&article.title, &article.content, article.category_id);
        let view = self
            .form_view(FormMode::Edit(id), values, FieldErrors::new())
            .await?;
        Ok(Outcome::Render(view))
    }

    /// Replace the editable fields of an article.
    ///
    /// Invalid input is sent back to the form before ownership is checked, so
    /// the owner can correct mistakes. Valid input from a non-owner is refused.
    pub async fn update(
        &self,
        caller: &Caller,
        id: ArticleId,
        input: ArticleInput,
    ) -> Result<Outcome<ArticleFormView>> {
        let mut article = self.load(id, ArticleRelations::NONE).await?.article;

        let draft = match self.check(&input).await? {
            Ok(draft) => draft,
            Err(errors) => {
                let view = self.form_view(FormMode::Edit(id), input, errors).await?;
                return Ok(Outcome::Render(view));
            }
        };

        if !self.can_mutate(caller, &article.user_id) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::EDIT_ARTICLE_DENIED,
            ));
        }

        article.title = draft.title;
        article.content = draft.content;
        article.category_id = draft.category_id;
        article.date = Utc::now();
        self.store.update_article(&article).await?;

        info!("Article {} updated by {:?}", id, caller.id);
        Ok(Outcome::redirect_with(
            Destination::ArticleList,
            messages::ARTICLE_UPDATED,
        ))
    }

    /// Remove an article together with its comments.
    pub async fn delete(&self, caller: &Caller, id: ArticleId) -> Result<Outcome<()>> {
        let record = self.load(id, ArticleRelations::COMMENTS).await?;

        if !self.can_mutate(caller, &record.article.user_id) {
            return Ok(Outcome::redirect_with(
                Destination::ArticleList,
                messages::DELETE_ARTICLE_DENIED,
            ));
        }

        let removed = self.store.delete_article(id).await?;
        info!(
            "Article {} deleted by {:?} ({} of {} loaded comments removed)",
            id,
            caller.id,
            removed,
            record.comment_count()
        );
        Ok(Outcome::redirect_with(
            Destination::ArticleList,
            messages::ARTICLE_DELETED,
        ))
    }

    /// Build the article page, optionally carrying a rejected comment submission.
    pub(crate) async fn show_view(
        &self,
        caller: &Caller,
        id: ArticleId,
        comment_form: Option<CommentFormView>,
    ) -> Result<ArticleShowView> {
        let article = self.load(id, ArticleRelations::FULL).await?;
        let affordances = ShowAffordances::for_caller(caller, &article.article.user_id);

        Ok(ArticleShowView {
            article,
            affordances,
            comment_form,
        })
    }

    pub(crate) fn require_board(&self, caller: &Caller) -> Result<()> {
        if self
            .authz
            .decide(caller, Capability::ViewBoard, None)
            .is_allowed()
        {
            Ok(())
        } else {
            warn!("Caller {:?} holds no board role", caller.id);
            Err(ContentError::AccessDenied)
        }
    }

    async fn load(
        &self,
        id: ArticleId,
        with: ArticleRelations,
    ) -> Result<entities::ArticleRecord> {
        self.store
            .find_article(id, with)
            .await?
            .ok_or(ContentError::NotFound("Article", id))
    }

    fn can_create(&self, caller: &Caller) -> bool {
        self.authz
            .decide(caller, Capability::CreateArticle, None)
            .is_allowed()
    }

    fn can_mutate(&self, caller: &Caller, owner: &str) -> bool {
        self.authz
            .decide(caller, Capability::MutateArticle, Some(owner))
            .is_allowed()
    }

    /// Field rules plus a lookup of the selected category.
    async fn check(
        &self,
        input: &ArticleInput,
    ) -> Result<std::result::Result<ArticleDraft, FieldErrors>> {
        let mut checked = input.validate();

        let category_id = match &checked {
            Ok(draft) => Some(draft.category_id),
            Err(_) => input
                .category_id
                .as_deref()
                .and_then(|c| c.trim().parse::<i64>().ok()),
        };

        if let Some(category_id) = category_id {
            if self.store.find_category(category_id).await?.is_none() {
                let mut errors = checked.err().unwrap_or_default();
                errors.add("category_id", CATEGORY_UNKNOWN);
                checked = Err(errors);
            }
        }

        Ok(checked)
    }

    async fn form_view(
        &self,
        mode: FormMode,
        values: ArticleInput,
        errors: FieldErrors,
    ) -> Result<ArticleFormView> {
        let categories = self.store.list_categories().await?;
        Ok(ArticleFormView {
            mode,
            values,
            errors,
            categories: category_options(&categories),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use entities::input::{TITLE_TOO_SHORT, TITLE_REQUIRED};

    fn input(title: &str, category: i64) -> ArticleInput {
        ArticleInput::new(title, "Some content", category)
    }

    #[tokio::test]
    async fn test_list_shows_every_article_to_any_role() {
        let fx = fixture().await;
        fx.article_by("editor", "First article").await;
        fx.article_by("admin", "Second article").await;

        for caller in [reader(), editor(), admin()] {
            let view = fx.board.articles.list(&caller).await.unwrap().into_view().unwrap();
            assert_eq!(view.articles.len(), 2);
            assert!(view.articles[0].category.is_some());
            assert!(view.articles[0].author.is_some());
        }
    }

    #[tokio::test]
    async fn test_roleless_caller_is_denied_everything() {
        let fx = fixture().await;
        let article = fx.article_by("nobody", "Owned by nobody").await;
        let comment = fx.comment_by("nobody", article, "mine").await;
        let caller = roleless();

        assert!(matches!(
            fx.board.articles.list(&caller).await,
            Err(ContentError::AccessDenied)
        ));
        assert!(matches!(
            fx.board.articles.show(&caller, article).await,
            Err(ContentError::AccessDenied)
        ));
        for outcome in [
            fx.board.articles.new_form(&caller).await.unwrap().as_redirect().cloned(),
            fx.board.articles.create(&caller, input("Hello", fx.category)).await.unwrap().as_redirect().cloned(),
            fx.board.articles.edit_form(&caller, article).await.unwrap().as_redirect().cloned(),
            fx.board.articles.update(&caller, article, input("Changed", fx.category)).await.unwrap().as_redirect().cloned(),
            fx.board.articles.delete(&caller, article).await.unwrap().as_redirect().cloned(),
            fx.board.comments.create(&caller, article, entities::CommentInput::new("hi")).await.unwrap().as_redirect().cloned(),
            fx.board.comments.edit_form(&caller, comment).await.unwrap().as_redirect().cloned(),
            fx.board.comments.update(&caller, comment, entities::CommentInput::new("edited")).await.unwrap().as_redirect().cloned(),
            fx.board.comments.delete(&caller, comment).await.unwrap().as_redirect().cloned(),
        ] {
            let redirect = outcome.expect("denied operations redirect");
            assert_eq!(redirect.to, Destination::ArticleList);
            assert!(redirect.feedback.is_some());
        }

        assert_eq!(fx.article_count().await, 1);
        assert_eq!(fx.comment_count(article).await, 1);
        let stored = fx.store.find_comment(comment).await.unwrap().unwrap();
        assert_eq!(stored.content, "mine");
    }

    #[tokio::test]
    async fn test_show_missing_article_is_not_found() {
        let fx = fixture().await;
        let err = fx.board.articles.show(&reader(), 404).await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound("Article", 404)));
    }

    #[tokio::test]
    async fn test_show_attaches_comments_and_affordances() {
        let fx = fixture().await;
        let id = fx.article_by("reader", "Reader's article").await;
        fx.comment_by("editor", id, "first").await;
        fx.comment_by("admin", id, "second").await;

        let view = fx.board.articles.show(&reader(), id).await.unwrap().into_view().unwrap();
        let comments = view.article.comments.as_ref().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].comment.content, "first");
        assert_eq!(comments[1].author.as_ref().unwrap().id, "admin");
        assert!(view.affordances.show_controls);
        assert!(!view.affordances.is_admin);
        assert!(view.comment_form.is_none());

        let stranger = fx.board.articles.show(&Caller::new("s", [authz::Role::User]), id).await;
        assert!(!stranger.unwrap().into_view().unwrap().affordances.show_controls);
    }

    #[tokio::test]
    async fn test_new_form_requires_editor() {
        let fx = fixture().await;

        let denied = fx.board.articles.new_form(&reader()).await.unwrap();
        assert_eq!(
            denied.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::CREATE_ARTICLE_DENIED)
        );

        let form = fx.board.articles.new_form(&editor()).await.unwrap().into_view().unwrap();
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.categories.len(), 1);
        assert_eq!(form.categories[0].text, "General");
    }

    #[tokio::test]
    async fn test_create_sets_owner_and_redirects() {
        let fx = fixture().await;
        let outcome = fx
            .board
            .articles
            .create(&editor(), input("Hello", fx.category))
            .await
            .unwrap();

        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.to, Destination::ArticleList);
        assert_eq!(redirect.feedback.as_deref(), Some(messages::ARTICLE_CREATED));

        let list = fx.store.list_articles(ArticleRelations::NONE).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].article.user_id, "editor");
        assert_eq!(list[0].article.title, "Hello");
    }

    #[tokio::test]
    async fn test_create_title_boundary() {
        let fx = fixture().await;

        let outcome = fx
            .board
            .articles
            .create(&editor(), input("Four", fx.category))
            .await
            .unwrap();
        let form = outcome.into_view().expect("invalid input re-renders the form");
        assert_eq!(form.errors.get("title"), [TITLE_TOO_SHORT.to_string()]);
        assert_eq!(form.values.title.as_deref(), Some("Four"));
        assert_eq!(form.categories.len(), 1);
        assert_eq!(fx.article_count().await, 0);

        let outcome = fx
            .board
            .articles
            .create(&editor(), input("Fives", fx.category))
            .await
            .unwrap();
        assert!(outcome.as_redirect().is_some());
        assert_eq!(fx.article_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let fx = fixture().await;
        let form = fx
            .board
            .articles
            .create(&editor(), input("Hello", 999))
            .await
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(form.errors.get("category_id"), [CATEGORY_UNKNOWN.to_string()]);

        let mut blank = ArticleInput::new("", "x", 999);
        blank.title = None;
        let form = fx
            .board
            .articles
            .create(&editor(), blank)
            .await
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(form.errors.get("title"), [TITLE_REQUIRED.to_string()]);
        assert!(form.errors.has("category_id"));
        assert_eq!(fx.article_count().await, 0);
    }

    #[tokio::test]
    async fn test_edit_form_requires_ownership() {
        let fx = fixture().await;
        let id = fx.article_by("editor", "Editor's article").await;

        let denied = fx.board.articles.edit_form(&other_editor(), id).await.unwrap();
        assert_eq!(
            denied.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::EDIT_ARTICLE_DENIED)
        );

        let form = fx.board.articles.edit_form(&editor(), id).await.unwrap().into_view().unwrap();
        assert_eq!(form.mode, FormMode::Edit(id));
        assert_eq!(form.values.title.as_deref(), Some("Editor's article"));
        assert_eq!(form.values.category_id, Some(fx.category.to_string()));

        assert!(fx.board.articles.edit_form(&admin(), id).await.unwrap().view().is_some());
        assert!(fx.board.articles.edit_form(&admin(), 999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_validates_before_authorizing() {
        let fx = fixture().await;
        let id = fx.article_by("editor", "Editor's article").await;

        let outcome = fx
            .board
            .articles
            .update(&other_editor(), id, input("Bad", fx.category))
            .await
            .unwrap();
        assert!(outcome.view().unwrap().errors.has("title"));

        let outcome = fx
            .board
            .articles
            .update(&other_editor(), id, input("Hijacked", fx.category))
            .await
            .unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::EDIT_ARTICLE_DENIED)
        );

        let stored = fx.store.find_article(id, ArticleRelations::NONE).await.unwrap().unwrap();
        assert_eq!(stored.article.title, "Editor's article");
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_owner() {
        let fx = fixture().await;
        let id = fx.article_by("editor", "Editor's article").await;
        let before = fx.store.find_article(id, ArticleRelations::NONE).await.unwrap().unwrap();
        let second = fx.store.insert_category("Second").await.unwrap();

        let submitted: ArticleInput = serde_json::from_value(serde_json::json!({
            "id": 77,
            "user_id": "admin",
            "title": "Retitled",
            "content": "New body",
            "category_id": second.to_string()
        }))
        .unwrap();

        let outcome = fx.board.articles.update(&admin(), id, submitted).await.unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::ARTICLE_UPDATED)
        );

        let after = fx.store.find_article(id, ArticleRelations::NONE).await.unwrap().unwrap();
        assert_eq!(after.article.id, id);
        assert_eq!(after.article.user_id, "editor");
        assert_eq!(after.article.title, "Retitled");
        assert_eq!(after.article.category_id, second);
        assert!(after.article.date >= before.article.date);
        assert!(fx.store.find_article(77, ArticleRelations::NONE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutation_matrix() {
        let fx = fixture().await;
        let id = fx.article_by("reader", "Reader's article").await;

        // Owners hold only the User role here; ownership alone lets them edit.
        for (caller, allowed) in [
            (reader(), true),
            (admin(), true),
            (editor(), false),
            (Caller::new("other", [authz::Role::User]), false),
        ] {
            let outcome = fx.board.articles.edit_form(&caller, id).await.unwrap();
            assert_eq!(outcome.view().is_some(), allowed, "caller {:?}", caller.id);
        }
    }

    #[tokio::test]
    async fn test_delete_cascades_comments() {
        let fx = fixture().await;
        let id = fx.article_by("editor", "Doomed article").await;
        let comment = fx.comment_by("reader", id, "gone soon").await;
        fx.comment_by("admin", id, "also gone").await;

        let denied = fx.board.articles.delete(&other_editor(), id).await.unwrap();
        assert_eq!(
            denied.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::DELETE_ARTICLE_DENIED)
        );
        assert_eq!(fx.comment_count(id).await, 2);

        let done = fx.board.articles.delete(&editor(), id).await.unwrap();
        assert_eq!(
            done.as_redirect().unwrap().feedback.as_deref(),
            Some(messages::ARTICLE_DELETED)
        );
        assert!(fx.store.find_comment(comment).await.unwrap().is_none());
        assert!(fx.board.articles.show(&editor(), id).await.unwrap_err().is_not_found());
        assert!(fx.board.articles.delete(&editor(), id).await.unwrap_err().is_not_found());
    }
}

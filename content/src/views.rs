//! View models handed to the presentation layer.
//!
//! Everything here is plain serializable data; the presentation layer decides
//! how to turn it into a page.

use authz::{Caller, Role};
use entities::{
    ArticleId, ArticleInput, ArticleRecord, Category, CommentId, CommentInput, FieldErrors, UserId,
};
use serde::Serialize;

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub text: String,
}

impl From<&Category> for CategoryOption {
    fn from(category: &Category) -> Self {
        Self {
            value: category.id.to_string(),
            text: category.name.clone(),
        }
    }
}

pub fn category_options(categories: &[Category]) -> Vec<CategoryOption> {
    categories.iter().map(CategoryOption::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleListView {
    pub articles: Vec<ArticleRecord>,
}

/// Display hints for the article page.
///
/// These only decide which controls are drawn. Every mutation is authorized
/// again when it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowAffordances {
    pub show_controls: bool,
    pub current_user_id: Option<UserId>,
    pub is_admin: bool,
}

impl ShowAffordances {
    pub fn for_caller(caller: &Caller, owner_id: &str) -> Self {
        Self {
            show_controls: caller.has_role(Role::Editor) || caller.owns(owner_id),
            current_user_id: caller.id.clone(),
            is_admin: caller.is_admin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleShowView {
    pub article: ArticleRecord,
    pub affordances: ShowAffordances,
    /// Rejected comment submission, present when re-rendering after a failed post.
    pub comment_form: Option<CommentFormView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit(ArticleId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleFormView {
    pub mode: FormMode,
    pub values: ArticleInput,
    pub errors: FieldErrors,
    pub categories: Vec<CategoryOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentFormView {
    /// `None` while posting a new comment.
    pub comment_id: Option<CommentId>,
    pub article_id: ArticleId,
    pub values: CommentInput,
    pub errors: FieldErrors,
}

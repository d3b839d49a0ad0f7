//! Submitted form values and their validation.
//!
//! Inputs carry only the fields a caller is allowed to supply. Ids, owners and
//! timestamps are never read from a submission, so a form that posts them
//! anyway has no effect on those fields.

use fields::{FieldErrors, FieldValidator};
use serde::{Deserialize, Serialize};

use crate::model::CategoryId;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_SHORT: &str = "Title must be at least 5 characters";
pub const TITLE_TOO_LONG: &str = "Title may be at most 100 characters";
pub const ARTICLE_CONTENT_REQUIRED: &str = "Article content is required";
pub const CATEGORY_REQUIRED: &str = "Article must belong to a category";
pub const CATEGORY_UNKNOWN: &str = "Selected category does not exist";
pub const COMMENT_CONTENT_REQUIRED: &str = "Comment content is required";

/// Article form as submitted.
///
/// `category_id` is kept as text so an empty selection is reported as a
/// field error rather than rejected while decoding the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// A validated article submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category_id: CategoryId,
}

impl ArticleInput {
    pub fn new(title: &str, content: &str, category_id: CategoryId) -> Self {
        Self {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            category_id: Some(category_id.to_string()),
        }
    }

    /// Check the submission, reporting every failing field at once.
    pub fn validate(&self) -> Result<ArticleDraft, FieldErrors> {
        let mut v = FieldValidator::new();

        let title = v.required("title", self.title.as_deref(), TITLE_REQUIRED);
        if let Some(title) = title {
            v.min_length("title", title, TITLE_MIN_CHARS, TITLE_TOO_SHORT);
            v.max_length("title", title, TITLE_MAX_CHARS, TITLE_TOO_LONG);
        }
        let content = v.required("content", self.content.as_deref(), ARTICLE_CONTENT_REQUIRED);
        let category_id = v.integer("category_id", self.category_id.as_deref(), CATEGORY_REQUIRED);

        match (v.finish(), title, content, category_id) {
            (Ok(()), Some(title), Some(content), Some(category_id)) => Ok(ArticleDraft {
                title: title.to_string(),
                content: content.to_string(),
                category_id,
            }),
            (result, ..) => Err(result.err().map(|e| e.into_field_errors()).unwrap_or_default()),
        }
    }
}

/// Comment form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub content: Option<String>,
}

/// A validated comment submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
}

impl CommentInput {
    pub fn new(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
        }
    }

    pub fn validate(&self) -> Result<CommentDraft, FieldErrors> {
        let mut v = FieldValidator::new();
        let content = v.required("content", self.content.as_deref(), COMMENT_CONTENT_REQUIRED);

        match (v.finish(), content) {
            (Ok(()), Some(content)) => Ok(CommentDraft {
                content: content.to_string(),
            }),
            (result, _) => Err(result.err().map(|e| e.into_field_errors()).unwrap_or_default()),
        }
    }
}

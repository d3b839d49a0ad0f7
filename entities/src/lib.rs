//! Data model for the publishing board.
//!
//! Records mirror the store's tables one to one. Relations between them are
//! never traversed implicitly: reads state which related records they need
//! through [`ArticleRelations`] and get them back in an [`ArticleRecord`].

pub mod input;
pub mod model;
pub mod relations;

pub use input::{ArticleDraft, ArticleInput, CommentDraft, CommentInput};
pub use model::{
    Article, ArticleId, Category, CategoryId, Comment, CommentId, NewArticle, NewComment, User,
    UserId,
};
pub use relations::{ArticleRecord, ArticleRelations, CommentRecord};

// Re-export validation types from the fields crate
pub use fields::FieldErrors;

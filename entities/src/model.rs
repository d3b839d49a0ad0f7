use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type ArticleId = i64;
pub type CategoryId = i64;
pub type CommentId = i64;

/// Opaque user id issued by the identity provider.
pub type UserId = String;

/// A registered user, owned by the identity provider.
///
/// The board only ever reads users to show who wrote what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// An entry in the category lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A persisted article.
///
/// `id` and `user_id` are fixed at creation; edits only ever replace
/// `title`, `content`, `date` and `category_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub category_id: CategoryId,
    pub user_id: UserId,
}

/// A persisted comment attached to an article.
///
/// Only `content` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub date: DateTime<Utc>,
    pub article_id: ArticleId,
    pub user_id: UserId,
}

/// An article ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub category_id: CategoryId,
    pub user_id: UserId,
}

/// A comment ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
    pub date: DateTime<Utc>,
    pub article_id: ArticleId,
    pub user_id: UserId,
}

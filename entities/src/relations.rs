use serde::{Deserialize, Serialize};

use crate::model::{Article, Category, Comment, User};

/// Which related records an article read should load alongside the article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleRelations {
    pub category: bool,
    pub author: bool,
    pub comments: bool,
    pub comment_authors: bool,
}

impl ArticleRelations {
    /// The bare article row.
    pub const NONE: Self = Self {
        category: false,
        author: false,
        comments: false,
        comment_authors: false,
    };

    /// What the article list shows: category and author.
    pub const LISTING: Self = Self {
        category: true,
        author: true,
        comments: false,
        comment_authors: false,
    };

    /// What the article page shows: everything, including who wrote each comment.
    pub const FULL: Self = Self {
        category: true,
        author: true,
        comments: true,
        comment_authors: true,
    };

    /// Comments only, as needed before a cascading delete.
    pub const COMMENTS: Self = Self {
        category: false,
        author: false,
        comments: true,
        comment_authors: false,
    };
}

/// A comment with its author attached, when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: Option<User>,
}

/// An article with the related records requested through [`ArticleRelations`].
///
/// Relations that were not requested are `None`; `comments` is `Some(vec![])`
/// when requested for an article without comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub article: Article,
    pub category: Option<Category>,
    pub author: Option<User>,
    pub comments: Option<Vec<CommentRecord>>,
}

impl ArticleRecord {
    pub fn bare(article: Article) -> Self {
        Self {
            article,
            category: None,
            author: None,
            comments: None,
        }
    }

    /// Number of loaded comments, zero when comments were not requested.
    pub fn comment_count(&self) -> usize {
        self.comments.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_presets() {
        assert_eq!(ArticleRelations::default(), ArticleRelations::NONE);
        assert!(ArticleRelations::LISTING.category && ArticleRelations::LISTING.author);
        assert!(!ArticleRelations::LISTING.comments);
        assert!(ArticleRelations::FULL.comment_authors);
    }
}

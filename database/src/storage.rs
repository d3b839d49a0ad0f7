use crate::{Database, DatabaseError, Result};
use async_trait::async_trait;
use entities::{
    Article, ArticleId, ArticleRecord, ArticleRelations, Category, CategoryId, Comment, CommentId,
    CommentRecord, NewArticle, NewComment, User,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info};

const ARTICLE_COLUMNS: &str = "id, title, content, date, category_id, user_id";
const COMMENT_COLUMNS: &str = "id, content, date, article_id, user_id";

/// Durable storage for board records.
///
/// Reads take an explicit [`ArticleRelations`] set naming which related
/// records to load, so callers state their data needs up front. Writes never
/// retry; a failure is returned to the caller as-is.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<()>;

    async fn find_article(
        &self,
        id: ArticleId,
        with: ArticleRelations,
    ) -> Result<Option<ArticleRecord>>;

    /// All articles in creation order.
    async fn list_articles(&self, with: ArticleRelations) -> Result<Vec<ArticleRecord>>;

    async fn insert_article(&self, article: &NewArticle) -> Result<ArticleId>;

    /// Overwrite title, content, date and category. Id and owner are never written.
    async fn update_article(&self, article: &Article) -> Result<()>;

    /// Remove an article and all of its comments in one transaction.
    ///
    /// Returns the number of comments removed with it.
    async fn delete_article(&self, id: ArticleId) -> Result<u64>;

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    async fn insert_comment(&self, comment: &NewComment) -> Result<CommentId>;

    /// Overwrite the comment content only.
    async fn update_comment(&self, comment: &Comment) -> Result<()>;

    async fn delete_comment(&self, id: CommentId) -> Result<()>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn insert_category(&self, name: &str) -> Result<CategoryId>;

    /// Provision a user and its role names.
    async fn insert_user(&self, user: &User, roles: &[String]) -> Result<()>;

    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    async fn user_roles(&self, id: &str) -> Result<Vec<String>>;
}

/// SQLite implementation of [`ResourceStore`].
#[derive(Debug, Clone)]
pub struct BoardStorage {
    db: Arc<Database>,
}

impl BoardStorage {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    async fn comments_for(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE article_id = ? ORDER BY date, id",
            COMMENT_COLUMNS
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(article_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(comments)
    }

    async fn users_by_id(&self, ids: &BTreeSet<String>) -> Result<HashMap<String, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, username, email FROM users WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, User>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let users = query.fetch_all(self.db.pool()).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    /// Attach the requested relations to a batch of articles.
    async fn attach(
        &self,
        articles: Vec<Article>,
        with: ArticleRelations,
    ) -> Result<Vec<ArticleRecord>> {
        let categories: HashMap<CategoryId, Category> = if with.category {
            self.list_categories()
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        } else {
            HashMap::new()
        };

        let mut comments: HashMap<ArticleId, Vec<Comment>> = HashMap::new();
        if with.comments {
            for article in &articles {
                comments.insert(article.id, self.comments_for(article.id).await?);
            }
        }

        let mut user_ids = BTreeSet::new();
        if with.author {
            user_ids.extend(articles.iter().map(|a| a.user_id.clone()));
        }
        if with.comment_authors {
            user_ids.extend(comments.values().flatten().map(|c| c.user_id.clone()));
        }
        let users = self.users_by_id(&user_ids).await?;

        let records = articles
            .into_iter()
            .map(|article| {
                let comments = comments.remove(&article.id).map(|list| {
                    list.into_iter()
                        .map(|comment| CommentRecord {
                            author: if with.comment_authors {
                                users.get(&comment.user_id).cloned()
                            } else {
                                None
                            },
                            comment,
                        })
                        .collect()
                });

                ArticleRecord {
                    category: categories.get(&article.category_id).cloned(),
                    author: if with.author {
                        users.get(&article.user_id).cloned()
                    } else {
                        None
                    },
                    comments,
                    article,
                }
            })
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl ResourceStore for BoardStorage {
    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }

    async fn find_article(
        &self,
        id: ArticleId,
        with: ArticleRelations,
    ) -> Result<Option<ArticleRecord>> {
        let sql = format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS);
        let article = match sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
        {
            Some(article) => article,
            None => return Ok(None),
        };

        Ok(self.attach(vec![article], with).await?.pop())
    }

    async fn list_articles(&self, with: ArticleRelations) -> Result<Vec<ArticleRecord>> {
        let sql = format!("SELECT {} FROM articles ORDER BY id", ARTICLE_COLUMNS);
        let articles = sqlx::query_as::<_, Article>(&sql)
            .fetch_all(self.db.pool())
            .await?;

        debug!("Loaded {} articles", articles.len());
        self.attach(articles, with).await
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<ArticleId> {
        let result = sqlx::query(
            "INSERT INTO articles (title, content, date, category_id, user_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.date)
        .bind(article.category_id)
        .bind(&article.user_id)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert article: {}", e);
            DatabaseError::from(e)
        })?;

        let id = result.last_insert_rowid();
        info!("Created article with id: {}", id);
        Ok(id)
    }

    async fn update_article(&self, article: &Article) -> Result<()> {
        let result = sqlx::query(
            "UPDATE articles SET title = ?, content = ?, date = ?, category_id = ? WHERE id = ?",
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.date)
        .bind(article.category_id)
        .bind(article.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            error!("Failed to update article {}: {}", article.id, e);
            DatabaseError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Article", article.id));
        }

        info!("Updated article with id: {}", article.id);
        Ok(())
    }

    async fn delete_article(&self, id: ArticleId) -> Result<u64> {
        let mut tx = self.db.pool().begin().await?;

        let comments = sqlx::query("DELETE FROM comments WHERE article_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls back the comment removal.
            return Err(DatabaseError::not_found("Article", id));
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit delete of article {}: {}", id, e);
            DatabaseError::from(e)
        })?;

        info!("Deleted article {} with {} comments", id, comments);
        Ok(comments)
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let sql = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS);
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(comment)
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<CommentId> {
        let result = sqlx::query(
            "INSERT INTO comments (content, date, article_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&comment.content)
        .bind(comment.date)
        .bind(comment.article_id)
        .bind(&comment.user_id)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert comment: {}", e);
            DatabaseError::from(e)
        })?;

        let id = result.last_insert_rowid();
        info!(
            "Created comment with id: {} on article {}",
            id, comment.article_id
        );
        Ok(id)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<()> {
        let result = sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
            .bind(&comment.content)
            .bind(comment.id)
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                error!("Failed to update comment {}: {}", comment.id, e);
                DatabaseError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Comment", comment.id));
        }

        info!("Updated comment with id: {}", comment.id);
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Comment", id));
        }

        info!("Deleted comment with id: {}", id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(self.db.pool())
                .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(category)
    }

    async fn insert_category(&self, name: &str) -> Result<CategoryId> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(self.db.pool())
            .await?;

        let id = result.last_insert_rowid();
        info!("Created category '{}' with id: {}", name, id);
        Ok(id)
    }

    async fn insert_user(&self, user: &User, roles: &[String]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("INSERT INTO users (id, username, email) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.email)
            .execute(&mut *tx)
            .await?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(&user.id)
                .bind(role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Provisioned user {} with roles {:?}", user.username, roles);
        Ok(())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    async fn user_roles(&self, id: &str) -> Result<Vec<String>> {
        let roles: Vec<(String,)> =
            sqlx::query_as("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role")
                .bind(id)
                .fetch_all(self.db.pool())
                .await?;
        Ok(roles.into_iter().map(|(role,)| role).collect())
    }
}

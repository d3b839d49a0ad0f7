use authz::{AuthzEngine, Caller, Role};
use database::{initialize_database, BoardStorage, DatabaseConfig, ResourceStore};
use entities::{ArticleId, CategoryId, CommentId, NewArticle, NewComment, User};
use std::sync::Arc;
use tempfile::TempDir;

use crate::Board;

pub struct Fixture {
    _dir: TempDir,
    pub store: Arc<BoardStorage>,
    pub board: Board,
    pub category: CategoryId,
}

pub fn admin() -> Caller {
    Caller::new("admin", [Role::Admin])
}

pub fn editor() -> Caller {
    Caller::new("editor", [Role::Editor])
}

/// A second editor who owns nothing.
pub fn other_editor() -> Caller {
    Caller::new("editor-2", [Role::Editor])
}

pub fn reader() -> Caller {
    Caller::new("reader", [Role::User])
}

pub fn roleless() -> Caller {
    Caller::new("nobody", Vec::<Role>::new())
}

pub async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig::new_with_path(dir.path().join("board.db"));
    let store = Arc::new(BoardStorage::new(initialize_database(config).await.unwrap()));

    for (id, role) in [
        ("admin", "Admin"),
        ("editor", "Editor"),
        ("editor-2", "Editor"),
        ("reader", "User"),
        ("nobody", ""),
    ] {
        let roles: Vec<String> = if role.is_empty() {
            Vec::new()
        } else {
            vec![role.to_string()]
        };
        store
            .insert_user(
                &User {
                    id: id.into(),
                    username: id.into(),
                    email: format!("{}@example.com", id),
                },
                &roles,
            )
            .await
            .unwrap();
    }
    let category = store.insert_category("General").await.unwrap();

    let board = Board::new(store.clone(), Arc::new(AuthzEngine::new().unwrap()));

    Fixture {
        _dir: dir,
        store,
        board,
        category,
    }
}

impl Fixture {
    pub async fn article_by(&self, owner: &str, title: &str) -> ArticleId {
        self.store
            .insert_article(&NewArticle {
                title: title.into(),
                content: "Body text".into(),
                date: chrono::Utc::now(),
                category_id: self.category,
                user_id: owner.into(),
            })
            .await
            .unwrap()
    }

    pub async fn comment_by(&self, owner: &str, article_id: ArticleId, content: &str) -> CommentId {
        self.store
            .insert_comment(&NewComment {
                content: content.into(),
                date: chrono::Utc::now(),
                article_id,
                user_id: owner.into(),
            })
            .await
            .unwrap()
    }

    pub async fn article_count(&self) -> usize {
        self.store
            .list_articles(entities::ArticleRelations::NONE)
            .await
            .unwrap()
            .len()
    }

    pub async fn comment_count(&self, article_id: ArticleId) -> usize {
        self.store
            .find_article(article_id, entities::ArticleRelations::COMMENTS)
            .await
            .unwrap()
            .map(|r| r.comment_count())
            .unwrap_or(0)
    }
}

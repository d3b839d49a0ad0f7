//! Demo content for development builds.

use chrono::{Duration, Utc};
use database::ResourceStore;
use entities::{NewArticle, NewComment, User};
use tracing::info;

/// Demo users and their role names
pub fn demo_users() -> Vec<(User, Vec<String>)> {
    [
        ("admin", "Ada Admin", "Admin"),
        ("editor", "Eddie Editor", "Editor"),
        ("reader", "Rita Reader", "User"),
    ]
    .into_iter()
    .map(|(id, name, role)| {
        (
            User {
                id: id.to_string(),
                username: name.to_string(),
                email: format!("{}@board.local", id),
            },
            vec![role.to_string()],
        )
    })
    .collect()
}

pub const DEMO_CATEGORIES: &[&str] = &["News", "Sport", "Technology", "Culture"];

/// Seed an empty database with demo users, categories, one article and a comment.
///
/// Does nothing when any category already exists.
pub async fn init_test_data(
    store: &dyn ResourceStore,
) -> Result<(), Box<dyn std::error::Error>> {
    if !store.list_categories().await?.is_empty() {
        info!("Database already contains data, skipping test data initialization");
        return Ok(());
    }

    info!("Database is empty, initializing test data");

    for (user, roles) in demo_users() {
        store.insert_user(&user, &roles).await?;
    }

    let mut first_category = None;
    for name in DEMO_CATEGORIES {
        let id = store.insert_category(name).await?;
        first_category.get_or_insert(id);
    }
    let category_id = first_category.ok_or("no demo categories")?;

    let now = Utc::now();
    let article_id = store
        .insert_article(&NewArticle {
            title: "Welcome to the board".to_string(),
            content: "Editors publish articles here. Everyone with an account can comment."
                .to_string(),
            date: now - Duration::hours(1),
            category_id,
            user_id: "editor".to_string(),
        })
        .await?;

    store
        .insert_comment(&NewComment {
            content: "Looking forward to reading more.".to_string(),
            date: now,
            article_id,
            user_id: "reader".to_string(),
        })
        .await?;

    info!("Test data initialization complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{initialize_database, BoardStorage, DatabaseConfig};
    use entities::ArticleRelations;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::new_with_path(dir.path().join("seed.db"));
        let store = BoardStorage::new(initialize_database(config).await.unwrap());

        init_test_data(&store).await.unwrap();
        init_test_data(&store).await.unwrap();

        assert_eq!(store.list_categories().await.unwrap().len(), DEMO_CATEGORIES.len());
        let articles = store.list_articles(ArticleRelations::FULL).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].comment_count(), 1);
        assert_eq!(store.user_roles("admin").await.unwrap(), vec!["Admin"]);
    }
}

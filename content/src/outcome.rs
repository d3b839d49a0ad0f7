use entities::ArticleId;
use serde::Serialize;

/// Where a redirect sends the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id")]
pub enum Destination {
    ArticleList,
    ArticleShow(ArticleId),
}

impl Destination {
    pub fn path(&self) -> String {
        match self {
            Destination::ArticleList => "/articles".to_string(),
            Destination::ArticleShow(id) => format!("/articles/{}", id),
        }
    }
}

/// A navigation to another view, with an optional message for the feedback slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: Destination,
    pub feedback: Option<String>,
}

/// What a lifecycle operation asks the presentation layer to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V> {
    Render(V),
    Redirect(Redirect),
}

impl<V> Outcome<V> {
    pub fn redirect(to: Destination) -> Self {
        Outcome::Redirect(Redirect { to, feedback: None })
    }

    pub fn redirect_with(to: Destination, message: &str) -> Self {
        Outcome::Redirect(Redirect {
            to,
            feedback: Some(message.to_string()),
        })
    }

    pub fn view(&self) -> Option<&V> {
        match self {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn into_view(self) -> Option<V> {
        match self {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Outcome::Redirect(redirect) => Some(redirect),
            Outcome::Render(_) => None,
        }
    }
}

/// Messages placed in the feedback slot.
pub mod messages {
    pub const ARTICLE_CREATED: &str = "Article created";
    pub const ARTICLE_UPDATED: &str = "Article updated";
    pub const ARTICLE_DELETED: &str = "Article deleted";

    pub const CREATE_ARTICLE_DENIED: &str = "You are not allowed to create articles";
    pub const EDIT_ARTICLE_DENIED: &str = "You are not allowed to edit an article you do not own";
    pub const DELETE_ARTICLE_DENIED: &str =
        "You are not allowed to delete an article you do not own";

    pub const POST_COMMENT_DENIED: &str = "You are not allowed to post comments";
    pub const EDIT_COMMENT_DENIED: &str = "You are not allowed to edit this comment";
    pub const DELETE_COMMENT_DENIED: &str = "You are not allowed to delete this comment";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_paths() {
        assert_eq!(Destination::ArticleList.path(), "/articles");
        assert_eq!(Destination::ArticleShow(12).path(), "/articles/12");
    }

    #[test]
    fn test_outcome_accessors() {
        let render: Outcome<u8> = Outcome::Render(3);
        assert_eq!(render.view(), Some(&3));
        assert!(render.as_redirect().is_none());

        let redirect: Outcome<u8> = Outcome::redirect_with(Destination::ArticleList, "done");
        assert_eq!(
            redirect.as_redirect().unwrap().feedback.as_deref(),
            Some("done")
        );
        assert!(redirect.into_view().is_none());
    }
}

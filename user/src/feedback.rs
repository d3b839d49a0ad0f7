//! One-shot feedback messages carried across a redirect.
//!
//! The slot lives in the caller's own session, so a message can only ever be
//! read by the session it was written for.

use tower_sessions::Session;
use tracing::debug;

use crate::auth::SessionKeys;
use crate::error::Result;

pub struct FeedbackChannel;

impl FeedbackChannel {
    /// Put a message in the slot, replacing any unread one.
    pub async fn set_once(session: &Session, message: &str) -> Result<()> {
        session.insert(SessionKeys::FEEDBACK, message).await?;
        debug!("Feedback queued: {}", message);
        Ok(())
    }

    /// Remove and return the pending message, if any.
    pub async fn take_if_present(session: &Session) -> Result<Option<String>> {
        Ok(session.remove::<String>(SessionKeys::FEEDBACK).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_message_is_read_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(FeedbackChannel::take_if_present(&session).await.unwrap(), None);

        FeedbackChannel::set_once(&session, "Article created").await.unwrap();
        assert_eq!(
            FeedbackChannel::take_if_present(&session).await.unwrap().as_deref(),
            Some("Article created")
        );
        assert_eq!(FeedbackChannel::take_if_present(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_message_wins() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        FeedbackChannel::set_once(&session, "first").await.unwrap();
        FeedbackChannel::set_once(&session, "second").await.unwrap();
        assert_eq!(
            FeedbackChannel::take_if_present(&session).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_messages() {
        let store = Arc::new(MemoryStore::default());
        let mine = Session::new(None, store.clone(), None);
        let theirs = Session::new(None, store, None);

        FeedbackChannel::set_once(&mine, "for me only").await.unwrap();
        assert_eq!(FeedbackChannel::take_if_present(&theirs).await.unwrap(), None);
        assert!(FeedbackChannel::take_if_present(&mine).await.unwrap().is_some());
    }
}

//! Content source trait — where a session's narrative document comes from.

use async_trait::async_trait;

use crate::error::ContentError;
use crate::session::SessionData;

/// Retrieves the narrative content a session URI points at.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, uri: &str) -> std::result::Result<SessionData, ContentError>;
}

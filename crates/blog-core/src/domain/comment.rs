use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::visibility;

/// Comment entity - a reader's reply to a post, hidden until moderated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub published: bool,
    pub publish_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create an unpublished comment stamped with `now`.
    ///
    /// `publish_date` is taken per instance, never from a shared default.
    pub fn new(
        post_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
            published: false,
            publish_date: now,
            created_at: now,
        }
    }

    /// Whether the comment is publicly visible at `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        visibility::comment_is_published(self, now)
    }
}

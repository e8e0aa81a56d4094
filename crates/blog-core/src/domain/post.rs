use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;
use crate::visibility;

/// Editorial status of a post.
///
/// Stored as an integer: `0` for draft, `1` for publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
}

impl PostStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            PostStatus::Draft => 0,
            PostStatus::Publish => 1,
        }
    }

    /// Unknown codes are treated as draft.
    pub fn from_i16(code: i16) -> Self {
        match code {
            1 => PostStatus::Publish,
            _ => PostStatus::Draft,
        }
    }
}

/// Post entity - a blog article and the tags attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub status: PostStatus,
    pub publish_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Create a new draft post without a publish date.
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        slug: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            slug: slug.into(),
            summary: summary.into(),
            content: content.into(),
            status: PostStatus::Draft,
            publish_date: None,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    /// Mark the post for publication at `date`.
    pub fn scheduled(mut self, status: PostStatus, date: Option<DateTime<Utc>>) -> Self {
        self.status = status;
        self.publish_date = date;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether the post is publicly visible at `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        visibility::post_is_published(self, now)
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }
}

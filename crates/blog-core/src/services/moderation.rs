use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Tag;
use crate::error::DomainError;
use crate::ports::{Clock, CommentRepository, PostRepository, TagRepository};
use crate::visibility::PostFilter;

/// A tag together with the number of currently published posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    pub tag: Tag,
    pub published_posts: u64,
}

impl TagUsage {
    pub fn is_used(&self) -> bool {
        self.published_posts > 0
    }
}

/// Store-level operations backing the moderation surface.
#[derive(Clone)]
pub struct ModerationService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    clock: Arc<dyn Clock>,
}

impl ModerationService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            clock,
        }
    }

    /// Flag the given comments as published. Returns how many were updated.
    pub async fn publish_comments(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        let updated = self.comments.set_published(ids, true).await?;
        tracing::info!(requested = ids.len(), updated, "Comments published");
        Ok(updated)
    }

    /// Clear the published flag on the given comments.
    pub async fn unpublish_comments(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        let updated = self.comments.set_published(ids, false).await?;
        tracing::info!(requested = ids.len(), updated, "Comments unpublished");
        Ok(updated)
    }

    /// Every tag with its count of published posts, ordered by title.
    pub async fn tag_usage(&self) -> Result<Vec<TagUsage>, DomainError> {
        let published = self
            .posts
            .list(&PostFilter::published_at(self.clock.now()), None)
            .await?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for tag in published.iter().flat_map(|p| p.tags.iter()) {
            *counts.entry(tag.id).or_default() += 1;
        }

        Ok(self
            .tags
            .list_all()
            .await?
            .into_iter()
            .map(|tag| TagUsage {
                published_posts: counts.get(&tag.id).copied().unwrap_or(0),
                tag,
            })
            .collect())
    }
}

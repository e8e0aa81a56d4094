use std::sync::Arc;

use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::{Clock, CommentRepository, PostRepository};
use crate::visibility::{self, PostFilter};

/// Read-side queries over published content.
///
/// Every lookup is evaluated against the clock at call time. A post that
/// does not exist and a post that exists but is not visible yield the same
/// [`DomainError::NotFound`].
#[derive(Clone)]
pub struct PostQueryService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl PostQueryService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            clock,
        }
    }

    /// All published posts, newest first, optionally restricted to a tag.
    pub async fn list_published_posts(
        &self,
        tag_slug: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter::published_at(self.clock.now()).with_tag(tag_slug);
        tracing::debug!(tag = ?tag_slug, "Listing published posts");

        Ok(self.posts.list(&filter, None).await?)
    }

    /// One page of published posts, counted and sliced by the store.
    pub async fn list_published_posts_page(
        &self,
        tag_slug: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let filter = PostFilter::published_at(self.clock.now()).with_tag(tag_slug);
        tracing::debug!(
            tag = ?tag_slug,
            limit = request.limit,
            offset = request.offset,
            "Listing page of published posts"
        );

        let count = self.posts.count(&filter).await?;
        let results = if request.offset >= count {
            Vec::new()
        } else {
            self.posts.list(&filter, Some(request)).await?
        };

        Ok(Page::from_window(count, results, request))
    }

    /// A single published post by slug.
    pub async fn get_published_post(&self, slug: &str) -> Result<Post, DomainError> {
        let now = self.clock.now();
        match self.posts.find_by_slug(slug).await? {
            Some(post) if post.is_published(now) => Ok(post),
            _ => {
                tracing::debug!(slug, "Post missing or not published");
                Err(DomainError::NotFound)
            }
        }
    }

    /// Published comments of a published post, newest first.
    pub async fn list_published_comments(
        &self,
        post_slug: &str,
    ) -> Result<Vec<Comment>, DomainError> {
        let post = self.get_published_post(post_slug).await?;
        let now = self.clock.now();

        let mut comments: Vec<Comment> = self
            .comments
            .find_by_post(post.id)
            .await?
            .into_iter()
            .filter(|c| visibility::comment_is_published(c, now))
            .collect();
        visibility::sort_comments_for_listing(&mut comments);

        Ok(comments)
    }
}

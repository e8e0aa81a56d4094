//! Publication-visibility policy.
//!
//! Pure predicates deciding whether a post or comment is readable by
//! anonymous API consumers at a given instant. They are evaluated on every
//! read; nothing here is cached, so a scheduled post appears as soon as its
//! `publish_date` passes without any state change.

use chrono::{DateTime, Utc};

use crate::domain::{Comment, Post, PostStatus};

/// A post is visible when it is marked `Publish` and its publish date has
/// been reached. A post without a publish date is never visible.
pub fn post_is_published(post: &Post, now: DateTime<Utc>) -> bool {
    post.status == PostStatus::Publish && post.publish_date.is_some_and(|date| date <= now)
}

/// A comment is visible once a moderator published it and its publish date
/// has been reached.
pub fn comment_is_published(comment: &Comment, now: DateTime<Utc>) -> bool {
    comment.published && comment.publish_date <= now
}

/// Store-level description of a post listing.
///
/// Repositories either evaluate [`PostFilter::matches`] directly or translate
/// the fields into their own query language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Only posts visible at this instant. `None` lists everything.
    pub visible_at: Option<DateTime<Utc>>,
    /// Only posts carrying the tag with this slug.
    pub tag_slug: Option<String>,
}

impl PostFilter {
    /// All posts, regardless of visibility.
    pub fn all() -> Self {
        Self::default()
    }

    /// Posts visible to the public at `now`.
    pub fn published_at(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            tag_slug: None,
        }
    }

    pub fn with_tag(mut self, tag_slug: Option<&str>) -> Self {
        self.tag_slug = tag_slug.map(str::to_string);
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(now) = self.visible_at {
            if !post_is_published(post, now) {
                return false;
            }
        }
        match &self.tag_slug {
            Some(slug) => post.has_tag(slug),
            None => true,
        }
    }
}

/// Listing order for public post collections: newest `publish_date` first,
/// ties kept in insertion order (`created_at` ascending).
///
/// Posts without a publish date sort last.
pub fn sort_posts_for_listing(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.publish_date
            .cmp(&a.publish_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Listing order for comments: newest `publish_date` first. Stable.
pub fn sort_comments_for_listing(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}

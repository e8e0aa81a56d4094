//! Test fixtures over the in-memory store.
//!
//! Posts are numbered in creation order (`Title N`, `title-N`) and dated
//! relative to the fixture's `now`, one day apart.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use blog_core::domain::{Author, Comment, Post, PostStatus, Tag};
use blog_core::ports::{BaseRepository, Clock};
use blog_core::services::{CommentSubmissionService, ModerationService, PostQueryService};

use super::MemoryDatabase;

pub struct BlogFixture {
    pub db: MemoryDatabase,
    pub author: Author,
    pub now: DateTime<Utc>,
    counter: u32,
}

impl BlogFixture {
    pub async fn new() -> Self {
        Self::at(Utc::now()).await
    }

    pub async fn at(now: DateTime<Utc>) -> Self {
        let db = MemoryDatabase::new();
        let author = db.authors().save(Author::new("testuser")).await.unwrap();
        Self {
            db,
            author,
            now,
            counter: 0,
        }
    }

    /// Create a post with the given status and publish date.
    pub async fn post(&mut self, status: PostStatus, publish_date: Option<DateTime<Utc>>) -> Post {
        let n = self.counter;
        self.counter += 1;

        let mut post = Post::new(
            self.author.id,
            format!("Title {}", n),
            format!("title-{}", n),
            format!("Summary-{}", n),
            format!("Content of post {}", n),
        )
        .scheduled(status, publish_date);
        post.created_at = self.now + Duration::microseconds(i64::from(n));

        self.db.posts().save(post).await.unwrap()
    }

    async fn batch(&mut self, count: u32, status: PostStatus, future: bool) -> Vec<Post> {
        let mut posts = Vec::new();
        for i in 0..count {
            let offset = Duration::days(i64::from(i) + 1);
            let date = if future { self.now + offset } else { self.now - offset };
            posts.push(self.post(status, Some(date)).await);
        }
        posts
    }

    /// Published posts dated 1, 2, ... days before `now`; newest first.
    pub async fn published_posts(&mut self, count: u32) -> Vec<Post> {
        self.batch(count, PostStatus::Publish, false).await
    }

    pub async fn draft_posts_in_past(&mut self, count: u32) -> Vec<Post> {
        self.batch(count, PostStatus::Draft, false).await
    }

    pub async fn published_posts_in_future(&mut self, count: u32) -> Vec<Post> {
        self.batch(count, PostStatus::Publish, true).await
    }

    pub async fn draft_posts_in_future(&mut self, count: u32) -> Vec<Post> {
        self.batch(count, PostStatus::Draft, true).await
    }

    /// One of each hidden kind: past draft, future publish, future draft.
    pub async fn unpublished_posts(&mut self) -> Vec<Post> {
        let mut posts = self.draft_posts_in_past(1).await;
        posts.extend(self.published_posts_in_future(1).await);
        posts.extend(self.draft_posts_in_future(1).await);
        posts
    }

    pub async fn tag(&self, title: &str, slug: &str) -> Tag {
        self.db.tags().save(Tag::new(title, slug)).await.unwrap()
    }

    pub async fn tag_post(&self, post: &Post, tags: &[Tag]) -> Post {
        let mut post = post.clone();
        post.tags.extend(tags.iter().cloned());
        self.db.posts().save(post).await.unwrap()
    }

    pub async fn comment(&self, post: &Post, published: bool, publish_date: DateTime<Utc>) -> Comment {
        let mut comment = Comment::new(
            post.id,
            "Reader",
            "reader@example.com",
            format!("Comment dated {}", publish_date),
            publish_date,
        );
        comment.published = published;
        self.db.comments().save(comment).await.unwrap()
    }

    pub fn query_service(&self, clock: Arc<dyn Clock>) -> PostQueryService {
        PostQueryService::new(
            Arc::new(self.db.posts()),
            Arc::new(self.db.comments()),
            clock,
        )
    }

    pub fn submission_service(&self, clock: Arc<dyn Clock>) -> CommentSubmissionService {
        CommentSubmissionService::new(
            self.query_service(clock.clone()),
            Arc::new(self.db.comments()),
            clock,
        )
    }

    pub fn moderation_service(&self, clock: Arc<dyn Clock>) -> ModerationService {
        ModerationService::new(
            Arc::new(self.db.posts()),
            Arc::new(self.db.comments()),
            Arc::new(self.db.tags()),
            clock,
        )
    }
}

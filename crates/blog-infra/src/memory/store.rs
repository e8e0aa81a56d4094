//! In-memory repositories sharing one state behind an async RwLock.
//!
//! Enforces the same integrity rules as the PostgreSQL schema: unique
//! slugs, titles and usernames, existing references, and cascading deletes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Author, Comment, Post, Tag};
use blog_core::error::RepoError;
use blog_core::pagination::PageRequest;
use blog_core::ports::{
    AuthorRepository, BaseRepository, CommentRepository, PostRepository, TagRepository,
};
use blog_core::visibility::{self, PostFilter};

#[derive(Default)]
struct State {
    authors: Vec<Author>,
    /// Stored without tags; associations live in `post_tags`.
    posts: Vec<Post>,
    post_tags: Vec<(Uuid, Uuid)>,
    comments: Vec<Comment>,
    tags: Vec<Tag>,
}

impl State {
    fn hydrate(&self, post: &Post) -> Post {
        let mut post = post.clone();
        let mut tags: Vec<Tag> = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, tag_id)| self.tags.iter().find(|t| t.id == *tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        post.tags = tags;
        post
    }

    fn matching_posts(&self, filter: &PostFilter) -> Vec<Post> {
        self.posts
            .iter()
            .map(|p| self.hydrate(p))
            .filter(|p| filter.matches(p))
            .collect()
    }

    fn remove_posts(&mut self, doomed: &[Uuid]) {
        self.posts.retain(|p| !doomed.contains(&p.id));
        self.comments.retain(|c| !doomed.contains(&c.post_id));
        self.post_tags.retain(|(post_id, _)| !doomed.contains(post_id));
    }
}

/// Replace the item matched by `same`, or append it.
fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Shared in-memory state. Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<RwLock<State>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authors(&self) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository { db: self.clone() }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository { db: self.clone() }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository { db: self.clone() }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository { db: self.clone() }
    }
}

/// In-memory author repository.
#[derive(Clone)]
pub struct InMemoryAuthorRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.authors.iter().find(|a| a.id == id).cloned())
    }

    async fn save(&self, author: Author) -> Result<Author, RepoError> {
        let mut state = self.db.state.write().await;

        if state
            .authors
            .iter()
            .any(|a| a.id != author.id && a.username == author.username)
        {
            return Err(RepoError::Constraint("Username already exists".to_string()));
        }

        let id = author.id;
        upsert(&mut state.authors, author.clone(), |a| a.id == id);
        Ok(author)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.db.state.write().await;

        let before = state.authors.len();
        state.authors.retain(|a| a.id != id);
        if state.authors.len() == before {
            return Err(RepoError::NotFound);
        }

        let owned: Vec<Uuid> = state
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        state.remove_posts(&owned);
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.authors.iter().find(|a| a.username == username).cloned())
    }
}

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.hydrate(p)))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.db.state.write().await;

        if !state.authors.iter().any(|a| a.id == post.author_id) {
            return Err(RepoError::Constraint("Author does not exist".to_string()));
        }
        if let Some(missing) = post
            .tags
            .iter()
            .find(|t| !state.tags.iter().any(|known| known.id == t.id))
        {
            return Err(RepoError::Constraint(format!(
                "Tag '{}' does not exist",
                missing.slug
            )));
        }
        if state
            .posts
            .iter()
            .any(|p| p.id != post.id && (p.slug == post.slug || p.title == post.title))
        {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }

        let id = post.id;
        let tag_ids: Vec<Uuid> = post.tags.iter().map(|t| t.id).collect();
        let mut row = post;
        row.tags = Vec::new();

        upsert(&mut state.posts, row, |p| p.id == id);
        state.post_tags.retain(|(post_id, _)| *post_id != id);
        for tag_id in tag_ids {
            if !state.post_tags.contains(&(id, tag_id)) {
                state.post_tags.push((id, tag_id));
            }
        }

        tracing::debug!(post_id = %id, "Post stored in memory");

        let stored = state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.hydrate(p))
            .ok_or(RepoError::NotFound)?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.db.state.write().await;

        if !state.posts.iter().any(|p| p.id == id) {
            return Err(RepoError::NotFound);
        }
        state.remove_posts(&[id]);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| state.hydrate(p)))
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.matching_posts(filter).len() as u64)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut posts = {
            let state = self.db.state.read().await;
            state.matching_posts(filter)
        };
        visibility::sort_posts_for_listing(&mut posts);

        Ok(match window {
            Some(window) => posts
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .collect(),
            None => posts,
        })
    }
}

/// In-memory comment repository.
#[derive(Clone)]
pub struct InMemoryCommentRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut state = self.db.state.write().await;

        if !state.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint("Post does not exist".to_string()));
        }

        let id = comment.id;
        upsert(&mut state.comments, comment.clone(), |c| c.id == id);
        tracing::debug!(comment_id = %id, post_id = %comment.post_id, "Comment stored in memory");
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.db.state.write().await;

        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn set_published(&self, ids: &[Uuid], published: bool) -> Result<u64, RepoError> {
        let mut state = self.db.state.write().await;

        let mut updated = 0;
        for comment in state.comments.iter_mut().filter(|c| ids.contains(&c.id)) {
            comment.published = published;
            updated += 1;
        }
        Ok(updated)
    }
}

/// In-memory tag repository.
#[derive(Clone)]
pub struct InMemoryTagRepository {
    db: MemoryDatabase,
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut state = self.db.state.write().await;

        if state.tags.iter().any(|t| t.id != tag.id && t.slug == tag.slug) {
            return Err(RepoError::Constraint("Tag already exists".to_string()));
        }

        let id = tag.id;
        upsert(&mut state.tags, tag.clone(), |t| t.id == id);
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.db.state.write().await;

        let before = state.tags.len();
        state.tags.retain(|t| t.id != id);
        if state.tags.len() == before {
            return Err(RepoError::NotFound);
        }
        state.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let state = self.db.state.read().await;
        Ok(state.tags.iter().find(|t| t.slug == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Tag>, RepoError> {
        let state = self.db.state.read().await;
        let mut tags = state.tags.clone();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Author, Comment, Post, Tag};
use crate::error::RepoError;
use crate::pagination::PageRequest;
use crate::visibility::PostFilter;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError>;
}

/// Post repository. Returned posts always carry their tags.
///
/// Saving a post replaces its tag associations with `post.tags`; deleting a
/// post removes its comments and tag associations.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Posts matching `filter`, newest `publish_date` first with ties in
    /// insertion order, optionally restricted to `window`.
    async fn list(
        &self,
        filter: &PostFilter,
        window: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments of a post, published or not, in no particular order.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Bulk moderation toggle. Returns the number of rows touched.
    async fn set_published(&self, ids: &[Uuid], published: bool) -> Result<u64, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Every tag, ordered by title.
    async fn list_all(&self) -> Result<Vec<Tag>, RepoError>;
}

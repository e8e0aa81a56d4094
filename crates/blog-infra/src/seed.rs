//! Sample content for local runs.

use chrono::{Duration, Utc};
use thiserror::Error;

use blog_core::domain::{Author, Post, PostStatus};
use blog_core::error::RepoError;
use blog_core::ports::{AuthorRepository, BaseRepository, PostRepository};
use blog_core::visibility::PostFilter;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{0} is an invalid positive int value")]
    InvalidQuantity(u32),

    #[error("Posts already exist: {0}")]
    Integrity(String),

    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for SeedError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => SeedError::Integrity(msg),
            other => SeedError::Repo(other),
        }
    }
}

/// Add `quantity` published posts owned by `username`, creating the author
/// when missing.
///
/// Posts are numbered after the ones already stored (`Title N`, `title-N`,
/// `Summary-N`) and dated one day in the past.
pub async fn add_sample_posts(
    authors: &dyn AuthorRepository,
    posts: &dyn PostRepository,
    username: &str,
    quantity: u32,
) -> Result<Vec<Post>, SeedError> {
    if quantity == 0 {
        return Err(SeedError::InvalidQuantity(quantity));
    }

    let author = match authors.find_by_username(username).await? {
        Some(author) => author,
        None => authors.save(Author::new(username)).await?,
    };

    let existing = posts.count(&PostFilter::all()).await?;
    let publish_date = Utc::now() - Duration::days(1);

    let mut created = Vec::with_capacity(quantity as usize);
    for n in existing..existing + u64::from(quantity) {
        let post = Post::new(
            author.id,
            format!("Title {}", n),
            format!("title-{}", n),
            format!("Summary-{}", n),
            format!("Sample content for post {}.", n),
        )
        .scheduled(PostStatus::Publish, Some(publish_date));
        created.push(posts.save(post).await?);
    }

    tracing::info!(
        quantity,
        username,
        "Successfully created sample posts"
    );

    Ok(created)
}

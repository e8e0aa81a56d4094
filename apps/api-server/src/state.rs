//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::PaginationConfig;
use blog_core::ports::{Clock, CommentRepository, PostRepository, RateLimiter};
use blog_core::services::{CommentSubmissionService, PostQueryService};
use blog_infra::{DatabaseConnections, MemoryDatabase, SystemClock, seed};

#[cfg(feature = "postgres")]
use blog_infra::database::{PostgresCommentRepository, PostgresPostRepository};
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "rate-limit")]
use blog_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Owner of the posts created by `SEED_SAMPLE_POSTS`.
const SAMPLE_AUTHOR: &str = "admin";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostQueryService,
    pub comments: CommentSubmissionService,
    pub pagination: PaginationConfig,
    /// Throttles comment submission when set.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    /// Open pool when running on PostgreSQL.
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let rate_limiter = Self::rate_limiter(config);

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    if config.run_migrations {
                        Migrator::up(&connections.main, None).await?;
                        tracing::info!("Migrations applied");
                    }

                    let connections = Arc::new(connections);
                    let posts = Arc::new(PostgresPostRepository::new(connections.main.clone()));
                    let comments =
                        Arc::new(PostgresCommentRepository::new(connections.main.clone()));

                    tracing::info!("Application state initialized (postgres)");
                    return Ok(Self::from_repositories(
                        posts,
                        comments,
                        clock,
                        config.pagination,
                        rate_limiter,
                        Some(connections),
                    ));
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        let db = MemoryDatabase::new();
        if config.seed_sample_posts > 0 {
            let created = seed::add_sample_posts(
                &db.authors(),
                &db.posts(),
                SAMPLE_AUTHOR,
                config.seed_sample_posts,
            )
            .await?;
            tracing::info!(count = created.len(), "Sample posts created");
        }

        tracing::info!("Application state initialized (in-memory)");
        Ok(Self::in_memory(db, clock, config.pagination, rate_limiter))
    }

    /// State over an in-memory store.
    pub fn in_memory(
        db: MemoryDatabase,
        clock: Arc<dyn Clock>,
        pagination: PaginationConfig,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
    ) -> Self {
        Self::from_repositories(
            Arc::new(db.posts()),
            Arc::new(db.comments()),
            clock,
            pagination,
            rate_limiter,
            None,
        )
    }

    fn from_repositories(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
        pagination: PaginationConfig,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let query = PostQueryService::new(posts, comments.clone(), clock.clone());
        let submission = CommentSubmissionService::new(query.clone(), comments, clock);

        Self {
            posts: query,
            comments: submission,
            pagination,
            rate_limiter,
            db,
        }
    }

    #[cfg(feature = "rate-limit")]
    fn rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        Some(Arc::new(InMemoryRateLimiter::new(
            config.comment_rate_limit.clone(),
        )))
    }

    #[cfg(not(feature = "rate-limit"))]
    fn rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        None
    }

    /// Name of the active storage backend.
    pub fn storage(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use blog_infra::FixedClock;
    use blog_infra::memory::fixtures::BlogFixture;

    /// State over the fixture's store with the clock frozen at `fixture.now`.
    pub(crate) fn state_for(fixture: &BlogFixture) -> AppState {
        AppState::in_memory(
            fixture.db.clone(),
            Arc::new(FixedClock::new(fixture.now)),
            PaginationConfig::default(),
            None,
        )
    }

    #[test]
    fn test_in_memory_state_reports_memory_storage() {
        let state = AppState::in_memory(
            MemoryDatabase::new(),
            Arc::new(SystemClock),
            PaginationConfig::default(),
            None,
        );
        assert_eq!(state.storage(), "memory");
        assert!(state.rate_limiter.is_none());
    }
}

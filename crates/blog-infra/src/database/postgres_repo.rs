//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, LoaderTrait, ModelTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Author, Comment, Post, PostStatus, Tag};
use blog_core::error::RepoError;
use blog_core::pagination::PageRequest;
use blog_core::ports::{
    AuthorRepository, BaseRepository, CommentRepository, PostRepository, TagRepository,
};
use blog_core::visibility::PostFilter;

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, upsert, write_err};

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(username, "Finding author by username");

        let result = AuthorEntity::find()
            .filter(author::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_published(&self, ids: &[Uuid], published: bool) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Published, Expr::value(published))
            .filter(comment::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// Written out instead of aliasing the generic base because posts carry
/// their tags through the `post_tags` join table.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn with_tags(&self, model: post::Model) -> Result<Post, RepoError> {
        let tags = model
            .find_related(TagEntity)
            .order_by_asc(tag::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut post: Post = model.into();
        post.tags = tags.into_iter().map(Into::into).collect();
        Ok(post)
    }

    fn filtered(filter: &PostFilter) -> Select<PostEntity> {
        let mut select = PostEntity::find();

        if let Some(now) = filter.visible_at {
            select = select
                .filter(post::Column::Status.eq(PostStatus::Publish.as_i16()))
                .filter(post::Column::PublishDate.is_not_null())
                .filter(post::Column::PublishDate.lte(DateTimeWithTimeZone::from(now)));
        }

        if let Some(slug) = &filter.tag_slug {
            let tagged = PostTagEntity::find()
                .select_only()
                .column(post_tag::Column::PostId)
                .inner_join(TagEntity)
                .filter(tag::Column::Slug.eq(slug.as_str()))
                .into_query();
            select = select.filter(post::Column::Id.in_subquery(tagged));
        }

        select
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        match PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        {
            Some(model) => Ok(Some(self.with_tags(model).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let tags = entity.tags.clone();
        let txn = self.db.begin().await.map_err(query_err)?;

        let active_model: post::ActiveModel = entity.into();
        let model = upsert(active_model, &txn).await?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(model.id))
            .exec(&txn)
            .await
            .map_err(write_err)?;

        if !tags.is_empty() {
            let rows = tags.iter().map(|t| post_tag::ActiveModel {
                post_id: sea_orm::Set(model.id),
                tag_id: sea_orm::Set(t.id),
            });
            PostTagEntity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(write_err)?;
        }

        txn.commit().await.map_err(write_err)?;

        let mut saved: Post = model.into();
        saved.tags = tags;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug, "Finding post by slug");

        match PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?
        {
            Some(model) => Ok(Some(self.with_tags(model).await?)),
            None => Ok(None),
        }
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut select = Self::filtered(filter)
            .order_by_with_nulls(post::Column::PublishDate, Order::Desc, NullOrdering::Last)
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id);

        if let Some(window) = window {
            select = select.limit(window.limit).offset(window.offset);
        }

        let models = select.all(&self.db).await.map_err(query_err)?;
        let tags = models
            .load_many_to_many(TagEntity, PostTagEntity, &self.db)
            .await
            .map_err(query_err)?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, mut tags)| {
                tags.sort_by(|a, b| a.title.cmp(&b.title));
                let mut post: Post = model.into();
                post.tags = tags.into_iter().map(Into::into).collect();
                post
            })
            .collect())
    }
}

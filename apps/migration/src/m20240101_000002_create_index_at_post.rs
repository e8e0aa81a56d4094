use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_blog_tables::{Comment, Post};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing filter: status = publish AND publish_date <= now
        manager
            .create_index(
                Index::create()
                    .table(Post::Table)
                    .name("idx_post_status_publish_date")
                    .col(Post::Status)
                    .col(Post::PublishDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Comment::Table)
                    .name("idx_comment_post_id")
                    .col(Comment::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(Comment::Table)
                    .name("idx_comment_post_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(Post::Table)
                    .name("idx_post_status_publish_date")
                    .to_owned(),
            )
            .await
    }
}

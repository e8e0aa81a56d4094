use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use sea_orm::sea_query::Value;
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, MockExecResult, Statement};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostStatus, Tag};
use blog_core::pagination::PageRequest;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};
use blog_core::visibility::PostFilter;

use crate::database::entity::{comment, post, tag};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};

fn post_model(slug: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: format!("Title {}", slug),
        slug: slug.to_owned(),
        summary: "Summary".to_owned(),
        content: "Content".to_owned(),
        status: PostStatus::Publish.as_i16(),
        publish_date: Some((now - Duration::days(1)).into()),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Every statement the connection ran, in order.
fn statements(db: DbConn) -> Vec<Statement> {
    db.into_transaction_log()
        .iter()
        .flat_map(|t| t.statements().to_vec())
        .collect()
}

fn values(stmt: &Statement) -> Vec<Value> {
    stmt.values.clone().map(|v| v.0).unwrap_or_default()
}

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

#[tokio::test]
async fn test_find_post_by_slug_loads_tags() {
    let model = post_model("title-1");
    let rust = tag::Model {
        id: Uuid::new_v4(),
        title: "Rust".to_owned(),
        slug: "rust".to_owned(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()]])
        .append_query_results(vec![vec![rust.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.find_by_slug("title-1").await.unwrap().unwrap();

    assert_eq!(post.id, model.id);
    assert_eq!(post.status, PostStatus::Publish);
    assert!(post.publish_date.is_some());
    assert_eq!(post.tags.len(), 1);
    assert_eq!(post.tags[0].slug, "rust");
}

#[tokio::test]
async fn test_find_missing_post_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_slug("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_comment_by_id() {
    let comment_id = Uuid::new_v4();
    let post_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: comment_id,
            post_id,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Hello".to_owned(),
            published: false,
            publish_date: now.into(),
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result: Option<Comment> = repo.find_by_id(comment_id).await.unwrap();

    let comment = result.unwrap();
    assert_eq!(comment.post_id, post_id);
    assert!(!comment.published);
}

#[tokio::test]
async fn test_bulk_publish_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let updated = repo
        .set_published(&[Uuid::new_v4(), Uuid::new_v4()], true)
        .await
        .unwrap();

    assert_eq!(updated, 2);
}

#[tokio::test]
async fn test_bulk_publish_with_no_ids_skips_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = PostgresCommentRepository::new(db);
    assert_eq!(repo.set_published(&[], true).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_tag_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![tag::Model {
            id: Uuid::new_v4(),
            title: "Rust".to_owned(),
            slug: "rust".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let tag = repo.find_by_slug("rust").await.unwrap().unwrap();
    assert_eq!(tag.title, "Rust");
}

#[tokio::test]
async fn test_count_applies_visibility_and_tag_filter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(13)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let filter = PostFilter::published_at(Utc::now()).with_tag(Some("rust"));
    assert_eq!(repo.count(&filter).await.unwrap(), 13);

    let log = statements(repo.db);
    assert_eq!(log.len(), 1);
    let sql = &log[0].sql;
    assert!(sql.starts_with("SELECT COUNT(*) AS num_items FROM (SELECT"), "{}", sql);
    assert!(sql.contains(r#""posts"."status" = $1"#), "{}", sql);
    assert!(sql.contains(r#""posts"."publish_date" IS NOT NULL"#), "{}", sql);
    assert!(sql.contains(r#""posts"."publish_date" <= $2"#), "{}", sql);
    assert!(
        sql.contains(r#""posts"."id" IN (SELECT "post_tags"."post_id" FROM "post_tags" INNER JOIN "tags""#),
        "{}",
        sql
    );
    assert!(sql.contains(r#""tags"."slug" = $3"#), "{}", sql);

    let bound = values(&log[0]);
    assert!(bound.contains(&Value::from(PostStatus::Publish.as_i16())));
    assert!(bound.contains(&Value::from("rust")));
}

#[tokio::test]
async fn test_count_without_filter_has_no_where_clause() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(16)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert_eq!(repo.count(&PostFilter::all()).await.unwrap(), 16);

    let log = statements(repo.db);
    assert!(!log[0].sql.contains("WHERE"), "{}", log[0].sql);
}

#[tokio::test]
async fn test_list_orders_newest_first_and_applies_window() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let filter = PostFilter::published_at(Utc::now());
    let posts = repo.list(&filter, Some(PageRequest::new(6, 12))).await.unwrap();
    assert!(posts.is_empty());

    let log = statements(repo.db);
    assert_eq!(log.len(), 1);
    let sql = &log[0].sql;
    assert!(sql.contains(r#""posts"."status" = $1"#), "{}", sql);
    assert!(sql.contains(r#""posts"."publish_date" <= $2"#), "{}", sql);
    assert!(
        sql.contains(
            r#"ORDER BY "posts"."publish_date" DESC NULLS LAST, "posts"."created_at" ASC, "posts"."id" ASC"#
        ),
        "{}",
        sql
    );
    assert!(sql.ends_with("LIMIT $3 OFFSET $4"), "{}", sql);

    let bound = values(&log[0]);
    assert!(bound.contains(&Value::from(6u64)));
    assert!(bound.contains(&Value::from(12u64)));
}

#[tokio::test]
async fn test_list_without_window_is_unbounded() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    repo.list(&PostFilter::all(), None).await.unwrap();

    let log = statements(repo.db);
    assert!(!log[0].sql.contains("LIMIT"), "{}", log[0].sql);
}

#[tokio::test]
async fn test_save_rewrites_tag_links_in_one_transaction() {
    let model = post_model("title-1");
    let rust = Tag {
        id: Uuid::new_v4(),
        title: "Rust".to_owned(),
        slug: "rust".to_owned(),
    };
    let post: Post = model.clone().into();
    let post = post.with_tags(vec![rust.clone()]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()]])
        .append_exec_results(vec![exec_ok(), exec_ok()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = repo.save(post).await.unwrap();
    assert_eq!(saved.id, model.id);
    assert_eq!(saved.tags, vec![rust.clone()]);

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let sql: Vec<&str> = log[0].statements().iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(sql.len(), 5, "{:?}", sql);
    assert_eq!(sql[0], "BEGIN");
    assert!(sql[1].starts_with(r#"UPDATE "posts""#), "{}", sql[1]);
    assert!(sql[2].starts_with(r#"DELETE FROM "post_tags" WHERE "post_tags"."post_id" = $1"#), "{}", sql[2]);
    assert!(sql[3].starts_with(r#"INSERT INTO "post_tags""#), "{}", sql[3]);
    assert_eq!(sql[4], "COMMIT");

    let inserted = values(&log[0].statements()[3]);
    assert!(inserted.contains(&Value::from(model.id)));
    assert!(inserted.contains(&Value::from(rust.id)));
}

#[tokio::test]
async fn test_save_without_tags_only_clears_links() {
    let model = post_model("title-1");
    let post: Post = model.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()]])
        .append_exec_results(vec![exec_ok()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved = repo.save(post).await.unwrap();
    assert!(saved.tags.is_empty());

    let log = statements(repo.db);
    let sql: Vec<&str> = log.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(sql.len(), 4, "{:?}", sql);
    assert!(sql[2].starts_with(r#"DELETE FROM "post_tags""#), "{}", sql[2]);
    assert_eq!(sql[3], "COMMIT");
}

#[tokio::test]
async fn test_comments_of_post_keep_creation_order() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<comment::Model>::new()])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    assert!(repo.find_by_post(post_id).await.unwrap().is_empty());

    let log = statements(repo.db);
    assert!(
        log[0].sql.ends_with(r#"ORDER BY "comments"."created_at" ASC"#),
        "{}",
        log[0].sql
    );
    assert!(values(&log[0]).contains(&Value::from(post_id)));
}

//! Service scenarios exercised against the in-memory store.

use std::sync::Arc;

use chrono::Duration;

use blog_core::domain::PostStatus;
use blog_core::error::DomainError;
use blog_core::pagination::PageRequest;
use blog_core::ports::{BaseRepository, Clock, CommentRepository};
use blog_core::services::CommentSubmission;

use super::fixtures::BlogFixture;
use crate::clock::FixedClock;

fn frozen(fixture: &BlogFixture) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(fixture.now))
}

/// 13 published posts, one past draft, one future publish, one future draft.
async fn listing_fixture() -> (BlogFixture, Vec<String>) {
    let mut fixture = BlogFixture::new().await;
    let published = fixture.published_posts(13).await;
    fixture.unpublished_posts().await;
    let slugs = published.into_iter().map(|p| p.slug).collect();
    (fixture, slugs)
}

#[tokio::test]
async fn test_lists_only_published_posts_newest_first() {
    let (fixture, expected) = listing_fixture().await;
    let query = fixture.query_service(frozen(&fixture));

    let posts = query.list_published_posts(None).await.unwrap();
    let slugs: Vec<String> = posts.iter().map(|p| p.slug.clone()).collect();

    assert_eq!(slugs, expected);
    assert!(posts.iter().all(|p| p.is_published(fixture.now)));
}

#[tokio::test]
async fn test_empty_listing_when_nothing_is_published() {
    let mut fixture = BlogFixture::new().await;
    fixture.unpublished_posts().await;
    let query = fixture.query_service(frozen(&fixture));

    let page = query
        .list_published_posts_page(None, PageRequest::new(6, 0))
        .await
        .unwrap();
    assert_eq!(page.count, 0);
    assert!(page.results.is_empty());
    assert!(page.next.is_none() && page.previous.is_none());
}

#[tokio::test]
async fn test_pages_of_six_over_thirteen_posts() {
    let (fixture, expected) = listing_fixture().await;
    let query = fixture.query_service(frozen(&fixture));

    let first = query
        .list_published_posts_page(None, PageRequest::new(6, 0))
        .await
        .unwrap();
    assert_eq!(first.count, 13);
    assert_eq!(first.results.len(), 6);
    assert_eq!(first.next, Some(PageRequest::new(6, 6)));
    assert_eq!(first.previous, None);

    let last = query
        .list_published_posts_page(None, PageRequest::new(6, 12))
        .await
        .unwrap();
    assert_eq!(last.count, 13);
    assert_eq!(last.results.len(), 1);
    assert_eq!(last.results[0].slug, expected[12]);
    assert_eq!(last.next, None);
    assert_eq!(last.previous, Some(PageRequest::new(6, 6)));

    let beyond = query
        .list_published_posts_page(None, PageRequest::new(6, 30))
        .await
        .unwrap();
    assert!(beyond.results.is_empty());
    assert_eq!(beyond.previous, Some(PageRequest::new(6, 24)));
}

#[tokio::test]
async fn test_following_next_cursors_rebuilds_the_listing() {
    let (fixture, expected) = listing_fixture().await;
    let query = fixture.query_service(frozen(&fixture));

    for limit in [1, 4, 6, 13, 20] {
        let mut seen = Vec::new();
        let mut cursor = Some(PageRequest::new(limit, 0));
        while let Some(request) = cursor {
            let page = query.list_published_posts_page(None, request).await.unwrap();
            seen.extend(page.results.into_iter().map(|p| p.slug));
            cursor = page.next;
        }
        assert_eq!(seen, expected, "limit {}", limit);
    }
}

#[tokio::test]
async fn test_missing_and_hidden_posts_are_indistinguishable() {
    let mut fixture = BlogFixture::new().await;
    let visible = fixture.published_posts(1).await;
    let hidden = fixture.unpublished_posts().await;
    let query = fixture.query_service(frozen(&fixture));

    assert_eq!(
        query.get_published_post(&visible[0].slug).await.unwrap().id,
        visible[0].id
    );
    assert!(matches!(
        query.get_published_post("testtesttest").await,
        Err(DomainError::NotFound)
    ));
    for post in hidden {
        assert!(matches!(
            query.get_published_post(&post.slug).await,
            Err(DomainError::NotFound)
        ));
    }
}

#[tokio::test]
async fn test_post_without_publish_date_stays_hidden() {
    let mut fixture = BlogFixture::new().await;
    let post = fixture.post(PostStatus::Publish, None).await;
    let clock = frozen(&fixture);
    let query = fixture.query_service(clock.clone());

    clock.advance(Duration::days(365));
    assert!(matches!(
        query.get_published_post(&post.slug).await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn test_scheduled_post_appears_when_its_date_passes() {
    let mut fixture = BlogFixture::new().await;
    let scheduled = fixture.published_posts_in_future(1).await.remove(0);
    let clock = frozen(&fixture);
    let query = fixture.query_service(clock.clone());

    assert!(query.list_published_posts(None).await.unwrap().is_empty());

    clock.advance(Duration::days(1));
    let posts = query.list_published_posts(None).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, scheduled.id);
}

#[tokio::test]
async fn test_tag_filter() {
    let mut fixture = BlogFixture::new().await;
    let posts = fixture.published_posts(3).await;
    let draft = fixture.draft_posts_in_past(1).await.remove(0);
    let rust = fixture.tag("Rust", "rust").await;
    fixture.tag_post(&posts[0], &[rust.clone()]).await;
    fixture.tag_post(&posts[2], &[rust.clone()]).await;
    fixture.tag_post(&draft, &[rust]).await;
    let query = fixture.query_service(frozen(&fixture));

    let tagged = query.list_published_posts(Some("rust")).await.unwrap();
    let ids: Vec<_> = tagged.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![posts[0].id, posts[2].id]);
    assert!(tagged.iter().all(|p| p.has_tag("rust")));

    let page = query
        .list_published_posts_page(Some("rust"), PageRequest::new(1, 0))
        .await
        .unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.next, Some(PageRequest::new(1, 1)));

    assert!(query.list_published_posts(Some("unknown")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lists_only_visible_comments_newest_first() {
    let mut fixture = BlogFixture::new().await;
    let post = fixture.published_posts(1).await.remove(0);
    let now = fixture.now;

    let older = fixture.comment(&post, true, now - Duration::days(2)).await;
    let newer = fixture.comment(&post, true, now - Duration::hours(1)).await;
    fixture.comment(&post, false, now - Duration::days(1)).await;
    fixture.comment(&post, true, now + Duration::days(1)).await;

    let query = fixture.query_service(frozen(&fixture));
    let comments = query.list_published_comments(&post.slug).await.unwrap();

    let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn test_comments_of_hidden_post_are_not_found() {
    let mut fixture = BlogFixture::new().await;
    let draft = fixture.draft_posts_in_past(1).await.remove(0);
    fixture.comment(&draft, true, fixture.now - Duration::days(1)).await;
    let query = fixture.query_service(frozen(&fixture));

    assert!(matches!(
        query.list_published_comments(&draft.slug).await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        query.list_published_comments("nope").await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn test_submitted_comment_is_stored_unpublished_at_server_time() {
    let mut fixture = BlogFixture::new().await;
    let post = fixture.published_posts(1).await.remove(0);
    let clock = frozen(&fixture);
    let service = fixture.submission_service(clock.clone());

    let comment = service
        .submit_comment(&post.slug, CommentSubmission::new("Ann", "ann@example.com", "Great read"))
        .await
        .unwrap();

    let stored = fixture
        .db
        .comments()
        .find_by_id(comment.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.published);
    assert_eq!(stored.post_id, post.id);
    assert_eq!(stored.publish_date, clock.now());

    let visible = fixture
        .query_service(clock)
        .list_published_comments(&post.slug)
        .await
        .unwrap();
    assert!(visible.is_empty());
}

#[tokio::test]
async fn test_submitting_to_hidden_post_creates_nothing() {
    let mut fixture = BlogFixture::new().await;
    let hidden = fixture.unpublished_posts().await;
    let service = fixture.submission_service(frozen(&fixture));

    for post in &hidden {
        let result = service
            .submit_comment(&post.slug, CommentSubmission::new("Ann", "ann@example.com", "Hi"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound)));

        // Lookup happens before validation.
        let invalid = service
            .submit_comment(&post.slug, CommentSubmission::default())
            .await;
        assert!(matches!(invalid, Err(DomainError::NotFound)));

        assert!(fixture.db.comments().find_by_post(post.id).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_invalid_submission_creates_nothing() {
    let mut fixture = BlogFixture::new().await;
    let post = fixture.published_posts(1).await.remove(0);
    let service = fixture.submission_service(frozen(&fixture));

    let result = service
        .submit_comment(&post.slug, CommentSubmission::new("Ann", "test", "Hi"))
        .await;
    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.has("email")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(fixture.db.comments().find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_moderation_publishes_comments() {
    let mut fixture = BlogFixture::new().await;
    let post = fixture.published_posts(1).await.remove(0);
    let clock = frozen(&fixture);
    let submitted = fixture
        .submission_service(clock.clone())
        .submit_comment(&post.slug, CommentSubmission::new("Ann", "ann@example.com", "Hi"))
        .await
        .unwrap();

    let moderation = fixture.moderation_service(clock.clone());
    assert_eq!(moderation.publish_comments(&[submitted.id]).await.unwrap(), 1);

    let query = fixture.query_service(clock);
    let comments = query.list_published_comments(&post.slug).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "Hi");

    assert_eq!(moderation.unpublish_comments(&[submitted.id]).await.unwrap(), 1);
    assert!(query.list_published_comments(&post.slug).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tag_usage_counts_published_posts_only() {
    let mut fixture = BlogFixture::new().await;
    let published = fixture.published_posts(2).await;
    let draft = fixture.draft_posts_in_past(1).await.remove(0);
    let rust = fixture.tag("Rust", "rust").await;
    let unused = fixture.tag("Archive", "archive").await;
    fixture.tag_post(&published[0], &[rust.clone()]).await;
    fixture.tag_post(&published[1], &[rust.clone()]).await;
    fixture.tag_post(&draft, &[rust, unused]).await;

    let usage = fixture
        .moderation_service(frozen(&fixture))
        .tag_usage()
        .await
        .unwrap();

    let summary: Vec<_> = usage
        .iter()
        .map(|u| (u.tag.slug.as_str(), u.published_posts, u.is_used()))
        .collect();
    assert_eq!(summary, vec![("archive", 0, false), ("rust", 2, true)]);
}

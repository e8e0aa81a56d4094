//! Comment endpoints of a post.

use actix_web::{HttpResponse, web};

use blog_core::services::CommentSubmission;
use blog_shared::dto::{CommentCreatedResponse, CommentItem, CreateCommentRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Published comments of a published post, newest first.
///
/// GET /api/v1/posts/{slug}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comments = state.posts.list_published_comments(&slug).await?;

    let body: Vec<CommentItem> = comments
        .into_iter()
        .map(|c| CommentItem {
            name: c.name,
            body: c.body,
            publish_date: c.publish_date,
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Submit a comment for moderation.
///
/// POST /api/v1/posts/{slug}/comments
///
/// The post is resolved before the body is looked at, so a hidden post
/// answers 404 whatever the payload.
pub async fn create_comment(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    payload: Result<web::Json<CreateCommentRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    let post = state
        .posts
        .get_published_post(&slug)
        .await
        .map_err(AppError::from)?;

    let CreateCommentRequest { name, email, body } = payload?.into_inner();

    let comment = state
        .comments
        .submit_to_post(&post, CommentSubmission { name, email, body })
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        name: comment.name,
        body: comment.body,
    }))
}

//! Post listing and detail endpoints.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use url::Url;

use blog_core::PageRequest;
use blog_core::domain::{Post, Tag};
use blog_shared::PaginatedResponse;
use blog_shared::dto::{PostDetail, PostListItem, TagSummary};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Query string of the listing. Values stay raw so malformed numbers fall
/// back to defaults instead of failing the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub tag: Option<String>,
}

/// Published posts, newest first.
///
/// GET /api/v1/posts/?limit=&offset=&tag=
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::from_params(
        params.limit.as_deref(),
        params.offset.as_deref(),
        &state.pagination,
    );
    let tag = params.tag.as_deref().filter(|t| !t.is_empty());

    let page = state.posts.list_published_posts_page(tag, request).await?;

    let current = req.full_url();
    let body = PaginatedResponse {
        count: page.count,
        next: page.next.map(|p| page_link(&current, p)),
        previous: page.previous.map(|p| page_link(&current, p)),
        results: page.results.iter().map(list_item).collect(),
    };

    Ok(HttpResponse::Ok().json(body))
}

/// A single published post.
///
/// GET /api/v1/posts/{slug}/
pub async fn get_post(state: web::Data<AppState>, slug: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get_published_post(&slug).await?;

    Ok(HttpResponse::Ok().json(PostDetail {
        title: post.title,
        summary: post.summary,
        content: post.content,
        publish_date: post.publish_date,
        tags: post.tags.iter().map(tag_summary).collect(),
    }))
}

/// The current URL with `limit`/`offset` replaced by `page`.
///
/// Other query parameters are kept. A zero offset is left out.
fn page_link(current: &Url, page: PageRequest) -> String {
    let kept: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(k, _)| k != "limit" && k != "offset")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = current.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept);
        pairs.append_pair("limit", &page.limit.to_string());
        if page.offset > 0 {
            pairs.append_pair("offset", &page.offset.to_string());
        }
    }
    url.to_string()
}

fn list_item(post: &Post) -> PostListItem {
    PostListItem {
        slug: post.slug.clone(),
        title: post.title.clone(),
        summary: post.summary.clone(),
        publish_date: post.publish_date,
        tags: post.tags.iter().map(tag_summary).collect(),
    }
}

fn tag_summary(tag: &Tag) -> TagSummary {
    TagSummary {
        title: tag.title.clone(),
        slug: tag.slug.clone(),
    }
}

//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::datetime;

/// A tag as embedded in post payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub title: String,
    pub slug: String,
}

/// Entry of the post listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListItem {
    pub slug: String,
    pub title: String,
    pub summary: String,
    #[serde(with = "datetime::option")]
    pub publish_date: Option<DateTime<Utc>>,
    pub tags: Vec<TagSummary>,
}

/// Full post body returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(with = "datetime::option")]
    pub publish_date: Option<DateTime<Utc>>,
    pub tags: Vec<TagSummary>,
}

/// A published comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentItem {
    pub name: String,
    pub body: String,
    #[serde(with = "datetime")]
    pub publish_date: DateTime<Utc>,
}

/// Request to submit a comment. Every field is optional on the wire so
/// missing ones can be reported as field errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Echo of an accepted comment. The e-mail address is write-only and
/// moderation state is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub name: String,
    pub body: String,
}
